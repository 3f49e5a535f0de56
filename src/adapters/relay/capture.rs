use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, warn};

use super::pump::{close_both, pump, require_streams, DEFAULT_BUFFER_SIZE};
use crate::domain::naming::{now_millis, session_file_path};
use crate::domain::{CaptureFaultPolicy, EndpointRole, ErrorClassifier, SessionReport};
use crate::ports::{ErrorMetricsPort, RelayPort, SessionReportPort, SharedStream};

const MAX_NAME_ATTEMPTS: u32 = 64;

/// Relay that also writes the source side of every direction to a session file.
///
/// Meant for debugging: each directional copy gets its own
/// `<millis><role>_src.stream` file in the capture directory, and a
/// [`SessionReport`] is sent once the copy ends.
pub struct CaptureRelay {
    classifier: ErrorClassifier,
    reporter: Arc<dyn SessionReportPort>,
    capture_dir: PathBuf,
    buffer_size: usize,
    fault_policy: CaptureFaultPolicy,
}

impl CaptureRelay {
    pub fn new(
        metrics: Arc<dyn ErrorMetricsPort>,
        reporter: Arc<dyn SessionReportPort>,
        capture_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            classifier: ErrorClassifier::new(metrics),
            reporter,
            capture_dir: capture_dir.into(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            fault_policy: CaptureFaultPolicy::default(),
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_fault_policy(mut self, policy: CaptureFaultPolicy) -> Self {
        self.fault_policy = policy;
        self
    }

    pub fn capture_dir(&self) -> &Path {
        &self.capture_dir
    }

    fn capture_fault(&self, action: &str, path: &Path, err: &io::Error) {
        match self.fault_policy {
            CaptureFaultPolicy::Abort => {
                error!("failed to {} capture file {}: {}", action, path.display(), err);
                std::process::abort();
            }
            CaptureFaultPolicy::Passthrough => {
                warn!("failed to {} capture file {}, relaying without capture: {}", action, path.display(), err);
            }
        }
    }
}

/// Creates a fresh session file, moving the timestamp forward while the name is taken.
async fn create_session_file(dir: &Path, src_role: &EndpointRole) -> io::Result<(PathBuf, File)> {
    let mut millis = now_millis();
    for _ in 0..MAX_NAME_ATTEMPTS {
        let path = session_file_path(dir, millis, src_role);
        match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => millis += 1,
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free session file name for {} in {}", src_role, dir.display()),
    ))
}

#[async_trait]
impl RelayPort for CaptureRelay {
    async fn copy_directional(
        &self,
        dst: Option<SharedStream>,
        src: Option<SharedStream>,
        dst_role: EndpointRole,
        src_role: EndpointRole,
    ) {
        let Some((dst, src)) = require_streams(dst, src) else {
            return;
        };

        let (capture_path, mut file) = match create_session_file(&self.capture_dir, &src_role).await {
            Ok((path, file)) => {
                debug!("writing capture file {}", path.display());
                (Some(path), Some(file))
            }
            Err(e) => {
                self.capture_fault("create", &self.capture_dir, &e);
                (None, None)
            }
        };

        let outcome = pump(dst.as_ref(), src.as_ref(), self.buffer_size, file.as_mut()).await;

        if let (Some(mut file), Some(path)) = (file, capture_path.as_deref()) {
            if let Err(e) = file.flush().await {
                self.capture_fault("close", path, &e);
            }
        }

        self.classifier.record(outcome.error.as_ref(), &dst_role, &src_role);

        let report = SessionReport::new(src_role, dst_role, outcome.bytes)
            .with_error(outcome.error.as_ref().map(|e| e.to_string()))
            .with_capture_path(capture_path);
        if let Err(e) = self.reporter.report(report).await {
            warn!("{}", e);
        }

        close_both(&dst, &src).await;
    }
}
