use crate::error::HostError;
use crate::models::sensor::{FanSpeeds, TemperatureReadings};
use crate::utils::json::Section;
use crate::utils::round::round2_opt;

const X86_ONLY: [&str; 2] = ["gpu", "motherboard"];
const ARM_ONLY: [&str; 2] = ["rp1", "ssd"];

/// Pick the sensor layout from which keys are present. There is no type tag
/// on the wire, and an unrecognised layout keeps whatever CPU reading it has.
pub fn normalize_temperature(
    temperature: Option<Section<'_>>,
) -> Result<TemperatureReadings, HostError> {
    let Some(temperature) = temperature else {
        return Ok(TemperatureReadings::Unknown { cpu: None });
    };

    let sensor = |name: &'static str| -> Result<Option<f64>, HostError> {
        Ok(round2_opt(temperature.optional_number(&[name])?))
    };

    let readings = if temperature.has_any(&X86_ONLY) {
        TemperatureReadings::X86 {
            cpu: sensor("cpu")?,
            gpu: sensor("gpu")?,
            motherboard: sensor("motherboard")?,
        }
    } else if temperature.has_any(&ARM_ONLY) {
        TemperatureReadings::Arm {
            cpu: sensor("cpu")?,
            rp1: sensor("rp1")?,
            ssd: sensor("ssd")?,
        }
    } else {
        TemperatureReadings::Unknown { cpu: sensor("cpu")? }
    };
    Ok(readings)
}

pub fn normalize_fan(fan: Option<Section<'_>>) -> Result<FanSpeeds, HostError> {
    let Some(fan) = fan else {
        return Ok(FanSpeeds::default());
    };
    Ok(FanSpeeds {
        cpu: round2_opt(fan.optional_number(&["cpu"])?),
        case1: round2_opt(fan.optional_number(&["case1"])?),
        case2: round2_opt(fan.optional_number(&["case2"])?),
    })
}
