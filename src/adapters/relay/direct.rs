use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs::File;
use tracing::debug;

use super::pump::{close_both, pump, require_streams, DEFAULT_BUFFER_SIZE};
use crate::domain::{EndpointRole, ErrorClassifier};
use crate::ports::{ErrorMetricsPort, RelayPort, SharedStream};

/// Relay that only forwards bytes.
pub struct DirectRelay {
    classifier: ErrorClassifier,
    buffer_size: usize,
}

impl DirectRelay {
    pub fn new(metrics: Arc<dyn ErrorMetricsPort>) -> Self {
        Self {
            classifier: ErrorClassifier::new(metrics),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }
}

#[async_trait]
impl RelayPort for DirectRelay {
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

        let outcome = pump::<File>(dst.as_ref(), src.as_ref(), self.buffer_size, None).await;
        debug!("{} -> {}: {} bytes relayed", src_role, dst_role, outcome.bytes);

        self.classifier.record(outcome.error.as_ref(), &dst_role, &src_role);
        close_both(&dst, &src).await;
    }
}
