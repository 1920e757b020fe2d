use crate::error::HostError;
use crate::models::disk::DiskInfo;
use crate::models::memory::MemoryInfo;
use crate::utils::json::Section;
use crate::utils::round::round2;

// Totals are exact capacities and are stored as reported.

pub fn normalize_memory(memory: Section<'_>) -> Result<MemoryInfo, HostError> {
    Ok(MemoryInfo {
        used_mb: round2(memory.number(&["usedMB", "used"])?),
        total_mb: memory.number(&["totalMB", "total"])?,
        percent: round2(memory.number(&["percent"])?),
    })
}

pub fn normalize_disk(disk: Section<'_>) -> Result<DiskInfo, HostError> {
    Ok(DiskInfo {
        used_gb: round2(disk.number(&["usedGB", "used"])?),
        total_gb: disk.number(&["totalGB", "total"])?,
        percent: round2(disk.number(&["percent"])?),
    })
}
