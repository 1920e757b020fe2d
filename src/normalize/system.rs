use serde_json::Value;

use crate::error::HostError;
use crate::models::system::{ProcessInfo, Uptime};
use crate::utils::json::Section;
use crate::utils::round::round2;

/// A reported uptime needs all three components; a partial one is malformed.
pub fn normalize_uptime(uptime: Section<'_>) -> Result<Uptime, HostError> {
    Ok(Uptime {
        days: uptime.count(&["days"])?,
        hours: uptime.count(&["hours"])?,
        minutes: uptime.count(&["minutes"])?,
    })
}

/// Processes keep the agent's order, which is most intensive first.
pub fn normalize_processes(processes: Option<&Value>) -> Result<Vec<ProcessInfo>, HostError> {
    let entries = match processes {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(HostError::malformed("section `processes` is not a list")),
    };

    entries
        .iter()
        .map(|entry| -> Result<ProcessInfo, HostError> {
            let fields = entry
                .as_object()
                .ok_or_else(|| HostError::malformed("process entry is not an object"))?;
            let process = Section::from_fields("processes", fields);
            let name = process
                .optional_text(&["name"])?
                .ok_or_else(|| HostError::malformed("missing field `processes.name`"))?;
            Ok(ProcessInfo {
                name,
                cpu_percent: round2(process.number(&["cpuPercent", "cpu"])?),
                memory_percent: round2(process.number(&["memoryPercent", "memory"])?),
            })
        })
        .collect()
}
