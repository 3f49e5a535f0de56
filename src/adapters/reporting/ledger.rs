use crate::domain::{Result, SessionReport};
use crate::ports::SessionReportPort;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio::time::interval;
use tracing::info;

/// In-memory record of recent captured sessions
///
/// Expired reports are dropped on every `report` and `get_reports` call.
/// `start_cleanup` additionally prunes in the background between calls.
pub struct SessionLedger {
    reports: Arc<RwLock<Vec<SessionReport>>>,
    retention: Duration,
}

impl SessionLedger {
    pub fn new(retention: Duration) -> Self {
        Self {
            reports: Arc::new(RwLock::new(Vec::new())),
            retention,
        }
    }

    /// Start background cleanup task
    pub fn start_cleanup(&self) -> tokio::task::JoinHandle<()> {
        let reports = self.reports.clone();
        let retention = self.retention;

        tokio::spawn(async move {
            let mut ticker = interval(Duration::from_millis(250));

            loop {
                ticker.tick().await;
                prune(&mut *reports.write().await, Instant::now(), retention);
            }
        })
    }
}

fn prune(reports: &mut Vec<SessionReport>, now: Instant, retention: Duration) {
    reports.retain(|report| now.duration_since(report.finished_at) < retention);
}

#[async_trait]
impl SessionReportPort for SessionLedger {
    async fn report(&self, report: SessionReport) -> Result<()> {
        let outcome = report.error.as_deref().unwrap_or("clean");
        match &report.capture_path {
            Some(path) => info!(
                "{} -> {}: {} bytes, {} (capture {})",
                report.src_role,
                report.dst_role,
                report.bytes,
                outcome,
                path.display()
            ),
            None => info!("{} -> {}: {} bytes, {}", report.src_role, report.dst_role, report.bytes, outcome),
        }

        let mut reports = self.reports.write().await;
        prune(&mut reports, Instant::now(), self.retention);
        reports.push(report);

        Ok(())
    }

    async fn get_reports(&self) -> Result<Vec<SessionReport>> {
        let mut reports = self.reports.write().await;
        prune(&mut reports, Instant::now(), self.retention);
        Ok(reports.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EndpointRole;

    fn report(bytes: u64) -> SessionReport {
        SessionReport::new(EndpointRole::ProxyServer, EndpointRole::DirectServer, bytes)
    }

    #[tokio::test]
    async fn test_reports_are_kept_in_order() {
        let ledger = SessionLedger::new(Duration::from_secs(4));

        ledger.report(report(1)).await.unwrap();
        ledger
            .report(report(2).with_error(Some("read tcp: reset".to_string())))
            .await
            .unwrap();

        let reports = ledger.get_reports().await.unwrap();
        assert_eq!(reports.iter().map(|r| r.bytes).collect::<Vec<_>>(), vec![1, 2]);
        assert!(reports[0].is_clean());
        assert!(!reports[1].is_clean());
    }

    #[tokio::test]
    async fn test_expired_reports_drop_without_cleanup_task() {
        let ledger = SessionLedger::new(Duration::from_millis(50));

        ledger.report(report(1)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        ledger.report(report(2)).await.unwrap();

        let reports = ledger.get_reports().await.unwrap();
        assert_eq!(reports.iter().map(|r| r.bytes).collect::<Vec<_>>(), vec![2]);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(ledger.get_reports().await.unwrap().is_empty());
    }

    #[test]
    fn test_prune_drops_expired_reports() {
        let retention = Duration::from_secs(4);
        let mut reports = vec![report(1), report(2)];
        let later = reports[0].finished_at + Duration::from_secs(5);
        reports[1].finished_at = later;

        prune(&mut reports, later, retention);

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].bytes, 2);
    }
}
