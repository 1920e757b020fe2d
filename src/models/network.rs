use chrono::{DateTime, Local, Timelike};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    #[serde(rename = "downloadMBps")]
    pub download_mbps: f64,
    #[serde(rename = "uploadMBps")]
    pub upload_mbps: f64,
    pub ping_ms: Option<f64>,
    pub error_rates: Option<ErrorRates>,
}

impl NetworkInfo {
    pub fn throughput_display(&self) -> String {
        format!("↓{:.2} ↑{:.2} MB/s", self.download_mbps, self.upload_mbps)
    }
}

/// Interface error rates as reported by the agent, e.g. `"0.01%"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRates {
    pub rx: Option<String>,
    pub tx: Option<String>,
}

/// One throughput sample kept for the network chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkHistoryPoint {
    pub timestamp: DateTime<Local>,
    #[serde(rename = "downloadMBps")]
    pub download_mbps: f64,
    #[serde(rename = "uploadMBps")]
    pub upload_mbps: f64,
}

impl NetworkHistoryPoint {
    pub fn new(timestamp: DateTime<Local>, download_mbps: f64, upload_mbps: f64) -> Self {
        Self {
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
            download_mbps,
            upload_mbps,
        }
    }

    /// Sample taken now from a normalized network reading.
    pub fn from_reading(network: &NetworkInfo) -> Self {
        Self::new(Local::now(), network.download_mbps, network.upload_mbps)
    }

    // Chart axis label
    pub fn time_display(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}
