use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::domain::CopyError;
use crate::ports::{SharedStream, TunnelStream};

pub const DEFAULT_BUFFER_SIZE: usize = 32 * 1024;

pub(crate) struct CopyOutcome {
    pub bytes: u64,
    pub error: Option<CopyError>,
}

impl CopyOutcome {
    fn ended(bytes: u64, error: Option<CopyError>) -> Self {
        Self { bytes, error }
    }
}

/// Unwraps both streams of a directional copy, logging which one is missing.
pub(crate) fn require_streams(
    dst: Option<SharedStream>,
    src: Option<SharedStream>,
) -> Option<(SharedStream, SharedStream)> {
    match (dst, src) {
        (None, _) => {
            debug!("copy: destination stream is missing, nothing to relay");
            None
        }
        (_, None) => {
            debug!("copy: source stream is missing, nothing to relay");
            None
        }
        (Some(dst), Some(src)) => Some((dst, src)),
    }
}

/// Moves bytes from `src` to `dst` until end-of-stream or the first error.
///
/// Every chunk goes to `dst` first, then to `tee` when one is given, so both
/// sinks see the source bytes in read order.
pub(crate) async fn pump<W>(
    dst: &dyn TunnelStream,
    src: &dyn TunnelStream,
    buffer_size: usize,
    mut tee: Option<&mut W>,
) -> CopyOutcome
where
    W: AsyncWrite + Unpin + Send + ?Sized,
{
    let mut buf = vec![0u8; buffer_size.max(1)];
    let mut bytes = 0u64;

    loop {
        let n = match src.read(&mut buf).await {
            Ok(0) => return CopyOutcome::ended(bytes, None),
            Ok(n) => n,
            Err(e) => return CopyOutcome::ended(bytes, Some(e.into())),
        };

        if let Err(e) = dst.write_all(&buf[..n]).await {
            return CopyOutcome::ended(bytes, Some(e.into()));
        }

        if let Some(sink) = tee.as_mut() {
            if let Err(e) = sink.write_all(&buf[..n]).await {
                return CopyOutcome::ended(bytes + n as u64, Some(CopyError::Capture(e)));
            }
        }

        bytes += n as u64;
    }
}

/// Destination first, then source.
pub(crate) async fn close_both(dst: &SharedStream, src: &SharedStream) {
    dst.close().await;
    src.close().await;
}
