pub mod metrics;
pub mod relay;
pub mod reporting;
pub mod tunnel;

pub use metrics::ErrorMetricsPort;
pub use relay::{RelayPort, SharedStream, Tunnel};
pub use reporting::SessionReportPort;
pub use tunnel::TunnelStream;
