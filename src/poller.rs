use futures::future::join_all;
use indexmap::IndexMap;
use log::{debug, warn};
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use crate::client::MetricsClient;
use crate::error::HostError;
use crate::history::HistoryBuffer;
use crate::models::network::NetworkHistoryPoint;
use crate::models::{Host, HostId, HostStatus, MetricsSnapshot};
use crate::normalize::normalize;

/// Runs poll cycles: fetch every host concurrently, normalize, and collect
/// one status per host.
#[derive(Debug, Clone)]
pub struct Poller {
    client: MetricsClient,
}

impl Poller {
    pub fn new(client: MetricsClient) -> Self {
        Self { client }
    }

    /// One full round over `hosts`.
    ///
    /// Every host gets its own request and timeout, so the round takes as
    /// long as the slowest host, not the sum. The result has one
    /// entry per distinct host, in host order; failures become `Offline` statuses.
    /// Hosts reporting network throughput get a sample appended to `history`.
    ///
    /// A host whose id repeats an earlier one is skipped, so each id is
    /// polled once and keeps its first host's status.
    pub async fn poll_once(
        &self,
        hosts: &[Host],
        history: &mut HistoryBuffer,
    ) -> IndexMap<HostId, HostStatus> {
        let start = Instant::now();

        let mut seen = HashSet::with_capacity(hosts.len());
        let unique: Vec<&Host> = hosts
            .iter()
            .filter(|host| {
                let first = seen.insert(host.id());
                if !first {
                    warn!("Skipping duplicate host {} ({})", host.name, host.address);
                }
                first
            })
            .collect();

        let outcomes = join_all(unique.iter().map(|host| self.poll_host(host))).await;

        let mut statuses = IndexMap::with_capacity(unique.len());
        for (host, outcome) in unique.into_iter().zip(outcomes) {
            let id = host.id();
            if let Ok(snapshot) = &outcome {
                if let Some(network) = &snapshot.network {
                    history.append(&id, NetworkHistoryPoint::from_reading(network));
                }
            }
            statuses.insert(id, HostStatus::from(outcome));
        }

        debug!(
            "poll_once ({} hosts) took: {} ms",
            hosts.len(),
            start.elapsed().as_millis()
        );
        statuses
    }

    async fn poll_host(&self, host: &Host) -> Result<MetricsSnapshot, HostError> {
        let result = match self.client.fetch(host).await {
            Ok(raw) => isolate(|| normalize(&raw)),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            warn!("{} ({}): {}", host.name, host.address, err);
        }
        result
    }
}

// A panic while normalizing one payload must not take the whole cycle down
fn isolate<F>(normalizer: F) -> Result<MetricsSnapshot, HostError>
where
    F: FnOnce() -> Result<MetricsSnapshot, HostError>,
{
    panic::catch_unwind(AssertUnwindSafe(normalizer))
        .unwrap_or_else(|_| Err(HostError::malformed("normalizer panicked")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_isolate_turns_panic_into_malformed_payload() {
        let result = isolate(|| panic!("unexpected payload shape"));
        assert_eq!(
            result.unwrap_err(),
            HostError::MalformedPayload("normalizer panicked".to_string())
        );
    }

    #[test]
    fn test_isolate_passes_results_through() {
        let raw = json!({"cpu": {"usage": 1}});
        assert_eq!(isolate(|| normalize(&raw)).unwrap_err().kind(), "malformed-payload");

        let raw = json!({
            "cpu": {"usage": 1, "cores": 1},
            "memory": {"used": 1, "total": 2, "percent": 50},
            "disk": {"used": 1, "total": 2, "percent": 50}
        });
        assert!(isolate(|| normalize(&raw)).is_ok());
    }
}
