use serde_json::Value;

use crate::error::HostError;
use crate::models::MetricsSnapshot;
use crate::utils::json::Section;

mod cpu;
mod network;
mod sensors;
mod storage;
mod system;

/// Turn a raw `/system` payload into a [`MetricsSnapshot`].
///
/// Floating telemetry is rounded to two decimals; core counts, capacity
/// totals and uptime components are kept as reported. Missing optional
/// readings stay `None`. Any missing or non-numeric required field yields
/// [`HostError::MalformedPayload`].
pub fn normalize(raw: &Value) -> Result<MetricsSnapshot, HostError> {
    let root = raw
        .as_object()
        .ok_or_else(|| HostError::malformed("payload is not a JSON object"))?;

    let network = match Section::optional(root, "network")? {
        Some(section) => Some(network::normalize(section)?),
        None => None,
    };
    let uptime = match Section::optional(root, "uptime")? {
        Some(section) => Some(system::normalize_uptime(section)?),
        None => None,
    };

    Ok(MetricsSnapshot {
        cpu: cpu::normalize(Section::required(root, "cpu")?)?,
        memory: storage::normalize_memory(Section::required(root, "memory")?)?,
        disk: storage::normalize_disk(Section::required(root, "disk")?)?,
        network,
        temperature: sensors::normalize_temperature(Section::optional(root, "temperature")?)?,
        fan: sensors::normalize_fan(Section::optional(root, "fan")?)?,
        uptime,
        processes: system::normalize_processes(root.get("processes"))?,
    })
}
