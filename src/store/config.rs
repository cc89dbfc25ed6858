const DEFAULT_SNAPSHOT_FREQUENCY: u64 = 100;
const DEFAULT_MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

/// Store tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    snapshot_frequency: u64,
    max_payload_bytes: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            snapshot_frequency: DEFAULT_SNAPSHOT_FREQUENCY,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take an automatic snapshot every `frequency` committed events.
    /// Clamped to a minimum of 1.
    pub fn with_snapshot_frequency(mut self, frequency: u64) -> Self {
        self.snapshot_frequency = frequency.max(1);
        self
    }

    /// Reject event payloads larger than `bytes`.
    pub fn with_max_payload_bytes(mut self, bytes: usize) -> Self {
        self.max_payload_bytes = bytes;
        self
    }

    pub fn snapshot_frequency(&self) -> u64 {
        self.snapshot_frequency
    }

    pub fn max_payload_bytes(&self) -> usize {
        self.max_payload_bytes
    }
}
