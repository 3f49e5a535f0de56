use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use crate::domain::{ErrorCounter, ErrorCountsSnapshot};
use crate::ports::ErrorMetricsPort;

static GLOBAL: OnceLock<Arc<AtomicErrorCounters>> = OnceLock::new();

/// Lock-free transport error counters.
pub struct AtomicErrorCounters {
    proxyserver_read_err: AtomicU64,
    proxyserver_write_err: AtomicU64,
    directserver_read_err: AtomicU64,
    directserver_write_err: AtomicU64,
}

impl AtomicErrorCounters {
    pub fn new() -> Self {
        Self {
            proxyserver_read_err: AtomicU64::new(0),
            proxyserver_write_err: AtomicU64::new(0),
            directserver_read_err: AtomicU64::new(0),
            directserver_write_err: AtomicU64::new(0),
        }
    }

    /// Process-wide instance, for binaries that do not need isolated counters.
    pub fn global() -> Arc<AtomicErrorCounters> {
        GLOBAL.get_or_init(|| Arc::new(AtomicErrorCounters::new())).clone()
    }

    fn counter(&self, counter: ErrorCounter) -> &AtomicU64 {
        match counter {
            ErrorCounter::ProxyServerRead => &self.proxyserver_read_err,
            ErrorCounter::ProxyServerWrite => &self.proxyserver_write_err,
            ErrorCounter::DirectServerRead => &self.directserver_read_err,
            ErrorCounter::DirectServerWrite => &self.directserver_write_err,
        }
    }

    pub fn get(&self, counter: ErrorCounter) -> u64 {
        self.counter(counter).load(Ordering::Relaxed)
    }
}

impl Default for AtomicErrorCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorMetricsPort for AtomicErrorCounters {
    fn increment(&self, counter: ErrorCounter) {
        self.counter(counter).fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> ErrorCountsSnapshot {
        ErrorCountsSnapshot {
            proxyserver_read_err: self.get(ErrorCounter::ProxyServerRead),
            proxyserver_write_err: self.get(ErrorCounter::ProxyServerWrite),
            directserver_read_err: self.get(ErrorCounter::DirectServerRead),
            directserver_write_err: self.get(ErrorCounter::DirectServerWrite),
        }
    }
}
