use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuInfo {
    pub usage_percent: f64,
    pub core_count: u32,
    pub temperature_c: Option<f64>,
}

impl CpuInfo {
    pub fn percent_display(&self) -> String {
        format!("{:.1}%", self.usage_percent)
    }
}
