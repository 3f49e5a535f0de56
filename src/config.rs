use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::adapters::{CaptureRelay, DirectRelay, DEFAULT_BUFFER_SIZE};
use crate::domain::{CaptureFaultPolicy, RelayError, RelayMode, Result};
use crate::ports::{ErrorMetricsPort, RelayPort, SessionReportPort};

const APP_NAME: &str = "anyproxy";
const CONFIG_NAME: &str = "relay";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub mode: RelayMode,
    /// Where capture mode writes its session files.
    pub capture_dir: PathBuf,
    pub buffer_size: usize,
    pub capture_fault_policy: CaptureFaultPolicy,
    /// How long session reports stay queryable.
    pub report_retention_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            mode: RelayMode::Direct,
            capture_dir: PathBuf::from("."),
            buffer_size: DEFAULT_BUFFER_SIZE,
            capture_fault_policy: CaptureFaultPolicy::Abort,
            report_retention_secs: 4,
        }
    }
}

impl RelayConfig {
    /// Load from `path`, or from the platform config directory when none is given.
    ///
    /// A missing file is created with default values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: RelayConfig = match path {
            Some(path) => confy::load_path(path),
            None => confy::load(APP_NAME, CONFIG_NAME),
        }
        .map_err(|e| RelayError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(RelayError::Config("buffer_size must be greater than zero".to_string()));
        }
        if self.mode == RelayMode::Capture && !self.capture_dir.is_dir() {
            return Err(RelayError::CaptureFile(format!(
                "capture directory {} does not exist",
                self.capture_dir.display()
            )));
        }
        Ok(())
    }

    pub fn report_retention(&self) -> Duration {
        Duration::from_secs(self.report_retention_secs)
    }

    /// Build the relay strategy every tunnel of this process will use.
    pub fn build_relay(
        &self,
        metrics: Arc<dyn ErrorMetricsPort>,
        reporter: Arc<dyn SessionReportPort>,
    ) -> Arc<dyn RelayPort> {
        info!("relay mode: {:?}", self.mode);
        match self.mode {
            RelayMode::Direct => Arc::new(DirectRelay::new(metrics).with_buffer_size(self.buffer_size)),
            RelayMode::Capture => Arc::new(
                CaptureRelay::new(metrics, reporter, self.capture_dir.clone())
                    .with_buffer_size(self.buffer_size)
                    .with_fault_policy(self.capture_fault_policy),
            ),
        }
    }
}
