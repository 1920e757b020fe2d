use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInfo {
    #[serde(rename = "usedMB")]
    pub used_mb: f64,
    #[serde(rename = "totalMB")]
    pub total_mb: f64,
    pub percent: f64,
}

impl MemoryInfo {
    pub fn percent_display(&self) -> String {
        format!("{:.1}%", self.percent)
    }
}
