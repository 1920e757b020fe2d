use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::HostError;

pub mod cpu;
pub mod disk;
pub mod memory;
pub mod network;
pub mod sensor;
pub mod system;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    X86,
    Arm,
}

impl FromStr for PlatformKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "x86" | "x86_64" | "amd64" => Ok(PlatformKind::X86),
            "arm" | "arm64" | "aarch64" => Ok(PlatformKind::Arm),
            other => Err(format!("unknown platform `{}`", other)),
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformKind::X86 => write!(f, "x86"),
            PlatformKind::Arm => write!(f, "arm"),
        }
    }
}

/// Key used for every per-host mapping. Hosts are identified by display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct HostId(String);

impl HostId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HostId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A remote machine exposing a metrics endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    pub name: String,
    pub address: String,
    pub platform: PlatformKind,
}

impl Host {
    pub fn new(name: impl Into<String>, address: impl Into<String>, platform: PlatformKind) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            platform,
        }
    }

    pub fn id(&self) -> HostId {
        HostId(self.name.clone())
    }
}

/// One normalized reading of all metrics for one host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub cpu: cpu::CpuInfo,
    pub memory: memory::MemoryInfo,
    pub disk: disk::DiskInfo,
    pub network: Option<network::NetworkInfo>,
    pub temperature: sensor::TemperatureReadings,
    pub fan: sensor::FanSpeeds,
    pub uptime: Option<system::Uptime>,
    pub processes: Vec<system::ProcessInfo>,
}

/// Latest observation for one host, replaced wholesale every poll cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum HostStatus {
    Online(Box<MetricsSnapshot>),
    Offline(HostError),
}

impl HostStatus {
    pub fn is_online(&self) -> bool {
        matches!(self, HostStatus::Online(_))
    }

    pub fn snapshot(&self) -> Option<&MetricsSnapshot> {
        match self {
            HostStatus::Online(snapshot) => Some(&**snapshot),
            HostStatus::Offline(_) => None,
        }
    }

    pub fn error(&self) -> Option<&HostError> {
        match self {
            HostStatus::Online(_) => None,
            HostStatus::Offline(err) => Some(err),
        }
    }
}

impl From<Result<MetricsSnapshot, HostError>> for HostStatus {
    fn from(result: Result<MetricsSnapshot, HostError>) -> Self {
        match result {
            Ok(snapshot) => HostStatus::Online(Box::new(snapshot)),
            Err(err) => HostStatus::Offline(err),
        }
    }
}

// One-line summary used for the log output of each poll cycle
impl fmt::Display for HostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostStatus::Online(snapshot) => {
                write!(
                    f,
                    "CPU {} | MEM {} | DISK {}",
                    snapshot.cpu.percent_display(),
                    snapshot.memory.percent_display(),
                    snapshot.disk.percent_display()
                )?;
                if let Some(network) = &snapshot.network {
                    write!(f, " | NET {}", network.throughput_display())?;
                }
                let temps = snapshot.temperature.display();
                if !temps.is_empty() {
                    write!(f, " | °C: {}", temps)?;
                }
                if let Some(uptime) = &snapshot.uptime {
                    write!(f, " | up {}", uptime)?;
                }
                Ok(())
            }
            HostStatus::Offline(err) => write!(f, "offline ({})", err.kind()),
        }
    }
}
