use crate::error::HostError;
use crate::models::cpu::CpuInfo;
use crate::utils::json::Section;
use crate::utils::round::{round2, round2_opt};

pub fn normalize(cpu: Section<'_>) -> Result<CpuInfo, HostError> {
    let core_count = cpu.count(&["coreCount", "cores"])?;
    let core_count = u32::try_from(core_count)
        .map_err(|_| HostError::malformed("field `cpu.coreCount` is out of range"))?;

    Ok(CpuInfo {
        usage_percent: round2(cpu.number(&["usagePercent", "usage"])?),
        core_count,
        temperature_c: round2_opt(cpu.optional_number(&["temperatureC", "temperature"])?),
    })
}
