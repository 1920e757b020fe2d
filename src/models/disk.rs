use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskInfo {
    #[serde(rename = "usedGB")]
    pub used_gb: f64,
    #[serde(rename = "totalGB")]
    pub total_gb: f64,
    pub percent: f64,
}

impl DiskInfo {
    pub fn percent_display(&self) -> String {
        format!("{:.1}%", self.percent)
    }
}
