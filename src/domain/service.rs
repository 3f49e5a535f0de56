use std::sync::Arc;
use tracing::debug;

use super::{CopyError, EndpointRole, ErrorCounter, TransportError};
use crate::ports::ErrorMetricsPort;

/// Picks the counter for a transport error.
///
/// Both read and write failures are charged to the source role of the
/// direction: a failed write to `directserver` while relaying from
/// `proxyserver` counts as a `proxyserver` write error.
pub fn classify(err: &TransportError, src_role: &EndpointRole) -> Option<ErrorCounter> {
    ErrorCounter::for_role(src_role, err.op)
}

/// Whether a transport error between these roles gets a debug line.
pub fn is_diagnosed(dst_role: &EndpointRole, src_role: &EndpointRole) -> bool {
    src_role.is_recognized() || dst_role.is_recognized()
}

#[derive(Clone)]
pub struct ErrorClassifier {
    metrics: Arc<dyn ErrorMetricsPort>,
}

impl ErrorClassifier {
    pub fn new(metrics: Arc<dyn ErrorMetricsPort>) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &Arc<dyn ErrorMetricsPort> {
        &self.metrics
    }

    /// Logs and counts the terminal error of a directional copy.
    ///
    /// Only transport errors are considered; clean termination and capture sink
    /// failures leave the counters untouched. Returns the counter that was
    /// incremented, if any.
    pub fn record(
        &self,
        err: Option<&CopyError>,
        dst_role: &EndpointRole,
        src_role: &EndpointRole,
    ) -> Option<ErrorCounter> {
        let operr = err?.as_transport()?;

        if is_diagnosed(dst_role, src_role) {
            debug!(
                "{} -> {}: op={} net={} addr={} err={}",
                src_role,
                dst_role,
                operr.op,
                operr.net,
                operr.addr_display(),
                operr.source
            );
        }

        let counter = classify(operr, src_role)?;
        self.metrics.increment(counter);
        Some(counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCountsSnapshot, OpKind};
    use std::io;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockMetrics {
        seen: Mutex<Vec<ErrorCounter>>,
    }

    impl ErrorMetricsPort for MockMetrics {
        fn increment(&self, counter: ErrorCounter) {
            self.seen.lock().unwrap().push(counter);
        }

        fn snapshot(&self) -> ErrorCountsSnapshot {
            ErrorCountsSnapshot::default()
        }
    }

    fn transport(op: OpKind) -> CopyError {
        CopyError::Transport(TransportError::new(
            op,
            "tcp",
            None,
            io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer"),
        ))
    }

    #[test]
    fn test_read_error_counts_against_source() {
        let metrics = Arc::new(MockMetrics::default());
        let classifier = ErrorClassifier::new(metrics.clone());

        let counter = classifier.record(
            Some(&transport(OpKind::Read)),
            &EndpointRole::DirectServer,
            &EndpointRole::ProxyServer,
        );

        assert_eq!(counter, Some(ErrorCounter::ProxyServerRead));
        assert_eq!(*metrics.seen.lock().unwrap(), vec![ErrorCounter::ProxyServerRead]);
    }

    #[test]
    fn test_write_error_counts_against_source() {
        let metrics = Arc::new(MockMetrics::default());
        let classifier = ErrorClassifier::new(metrics.clone());

        let counter = classifier.record(
            Some(&transport(OpKind::Write)),
            &EndpointRole::DirectServer,
            &EndpointRole::ProxyServer,
        );

        assert_eq!(counter, Some(ErrorCounter::ProxyServerWrite));
        assert_eq!(*metrics.seen.lock().unwrap(), vec![ErrorCounter::ProxyServerWrite]);
    }

    #[test]
    fn test_write_error_from_directserver_source() {
        let metrics = Arc::new(MockMetrics::default());
        let classifier = ErrorClassifier::new(metrics.clone());

        let counter = classifier.record(
            Some(&transport(OpKind::Write)),
            &EndpointRole::ProxyServer,
            &EndpointRole::DirectServer,
        );

        assert_eq!(counter, Some(ErrorCounter::DirectServerWrite));
        assert_eq!(*metrics.seen.lock().unwrap(), vec![ErrorCounter::DirectServerWrite]);
    }

    #[test]
    fn test_diagnostic_needs_a_recognized_role() {
        let client = EndpointRole::Other("client".into());
        let upstream = EndpointRole::Other("upstream".into());

        assert!(is_diagnosed(&EndpointRole::DirectServer, &EndpointRole::ProxyServer));
        assert!(is_diagnosed(&EndpointRole::DirectServer, &client));
        assert!(is_diagnosed(&upstream, &EndpointRole::ProxyServer));
        assert!(!is_diagnosed(&upstream, &client));
    }

    #[test]
    fn test_unclassified_outcomes() {
        let metrics = Arc::new(MockMetrics::default());
        let classifier = ErrorClassifier::new(metrics.clone());
        let capture = CopyError::Capture(io::Error::new(io::ErrorKind::Other, "disk full"));

        assert_eq!(classifier.record(None, &EndpointRole::DirectServer, &EndpointRole::ProxyServer), None);
        assert_eq!(
            classifier.record(Some(&capture), &EndpointRole::DirectServer, &EndpointRole::ProxyServer),
            None
        );
        assert_eq!(
            classifier.record(
                Some(&transport(OpKind::Read)),
                &EndpointRole::ProxyServer,
                &EndpointRole::Other("client".into()),
            ),
            None
        );
        assert!(metrics.seen.lock().unwrap().is_empty());
    }
}
