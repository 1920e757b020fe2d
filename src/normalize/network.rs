use serde_json::Value;

use crate::error::HostError;
use crate::models::network::{ErrorRates, NetworkInfo};
use crate::utils::json::{loose_f64, Section};
use crate::utils::round::{round2, round2_opt};

pub fn normalize(network: Section<'_>) -> Result<NetworkInfo, HostError> {
    let error_rates = match network.object("errorRates")? {
        Some(rates) => Some(ErrorRates {
            rx: percent_string(&rates, "rx")?,
            tx: percent_string(&rates, "tx")?,
        }),
        None => None,
    };

    Ok(NetworkInfo {
        download_mbps: round2(network.number(&["downloadMBps", "download"])?),
        upload_mbps: round2(network.number(&["uploadMBps", "upload"])?),
        ping_ms: round2_opt(network.optional_number(&["pingMs", "ping"])?),
        error_rates,
    })
}

// Agents send rates as "0.01%"; a bare number is formatted the same way.
fn percent_string(rates: &Section<'_>, name: &'static str) -> Result<Option<String>, HostError> {
    match rates.get(&[name]) {
        Some(value @ Value::Number(_)) => Ok(loose_f64(value).map(|n| format!("{:.2}%", round2(n)))),
        _ => rates.optional_text(&[name]),
    }
}
