use log::debug;
use std::collections::{HashMap, VecDeque};

use crate::models::network::NetworkHistoryPoint;
use crate::models::HostId;

pub const DEFAULT_HISTORY_CAPACITY: usize = 30;

/// Per-host FIFO of recent network samples feeding the throughput charts.
///
/// Each host has its own bounded queue; there is no global cap.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    capacity: usize,
    hosts: HashMap<HostId, VecDeque<NetworkHistoryPoint>>,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            hosts: HashMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a sample, evicting the oldest ones once the host is at capacity.
    pub fn append(&mut self, host: &HostId, point: NetworkHistoryPoint) {
        let capacity = self.capacity;
        let history = self
            .hosts
            .entry(host.clone())
            .or_insert_with(|| VecDeque::with_capacity(capacity));
        history.push_back(point);
        while history.len() > capacity {
            history.pop_front();
        }
    }

    /// Trim one host back to capacity. No-op when already within it.
    pub fn prune(&mut self, host: &HostId) {
        if let Some(history) = self.hosts.get_mut(host) {
            let excess = history.len().saturating_sub(self.capacity);
            if excess > 0 {
                history.drain(..excess);
                debug!("Pruned {} history points for {}", excess, host);
            }
        }
    }

    pub fn prune_all(&mut self) {
        let hosts: Vec<HostId> = self.hosts.keys().cloned().collect();
        for host in &hosts {
            self.prune(host);
        }
    }

    /// Samples for `host`, oldest first. Unknown hosts yield an empty list.
    pub fn read(&self, host: &HostId) -> Vec<NetworkHistoryPoint> {
        self.hosts
            .get(host)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self, host: &HostId) -> usize {
        self.hosts.get(host).map_or(0, VecDeque::len)
    }

    pub fn is_empty(&self, host: &HostId) -> bool {
        self.len(host) == 0
    }

    pub fn host_ids(&self) -> impl Iterator<Item = &HostId> {
        self.hosts.keys()
    }

    #[cfg(test)]
    fn push_untrimmed(&mut self, host: &HostId, point: NetworkHistoryPoint) {
        self.hosts.entry(host.clone()).or_default().push_back(point);
    }
}
