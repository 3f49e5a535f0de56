use crate::domain::{ErrorCounter, ErrorCountsSnapshot};

/// Registry of the transport error counters.
///
/// Shared by every tunnel of the process, so implementations must not lose
/// concurrent increments.
pub trait ErrorMetricsPort: Send + Sync {
    fn increment(&self, counter: ErrorCounter);

    fn snapshot(&self) -> ErrorCountsSnapshot;
}
