use serde::Serialize;

/// Temperature sensors in °C. The agent reports a different sensor set per
/// platform; a missing sensor is `None`, never `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "platform", rename_all = "lowercase")]
pub enum TemperatureReadings {
    X86 {
        cpu: Option<f64>,
        gpu: Option<f64>,
        motherboard: Option<f64>,
    },
    Arm {
        cpu: Option<f64>,
        rp1: Option<f64>,
        ssd: Option<f64>,
    },
    Unknown {
        cpu: Option<f64>,
    },
}

impl TemperatureReadings {
    pub fn cpu(&self) -> Option<f64> {
        match self {
            TemperatureReadings::X86 { cpu, .. }
            | TemperatureReadings::Arm { cpu, .. }
            | TemperatureReadings::Unknown { cpu } => *cpu,
        }
    }

    /// Labelled readings in display order, skipping absent sensors.
    pub fn readings(&self) -> Vec<(&'static str, f64)> {
        let labelled: Vec<(&'static str, Option<f64>)> = match self {
            TemperatureReadings::X86 {
                cpu,
                gpu,
                motherboard,
            } => vec![("CPU", *cpu), ("GPU", *gpu), ("MB", *motherboard)],
            TemperatureReadings::Arm { cpu, rp1, ssd } => {
                vec![("CPU", *cpu), ("RP1", *rp1), ("SSD", *ssd)]
            }
            TemperatureReadings::Unknown { cpu } => vec![("CPU", *cpu)],
        };
        labelled
            .into_iter()
            .filter_map(|(label, value)| value.map(|v| (label, v)))
            .collect()
    }

    pub fn display(&self) -> String {
        self.readings()
            .iter()
            .map(|(label, value)| format!("{:.0} {}", value, label))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Fan speeds in RPM.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FanSpeeds {
    pub cpu: Option<f64>,
    pub case1: Option<f64>,
    pub case2: Option<f64>,
}
