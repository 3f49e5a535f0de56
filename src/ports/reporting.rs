use crate::domain::{Result, SessionReport};
use async_trait::async_trait;

/// Port receiving the outcome of captured sessions
#[async_trait]
pub trait SessionReportPort: Send + Sync {
    /// Record the outcome of one captured directional copy
    async fn report(&self, report: SessionReport) -> Result<()>;

    /// Get the reports still retained
    async fn get_reports(&self) -> Result<Vec<SessionReport>>;
}
