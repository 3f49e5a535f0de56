use crate::domain::TransportError;
use async_trait::async_trait;

/// One endpoint of a tunnel, shared by the two directional copies.
///
/// Every method takes `&self`: one task reads the stream while the mirrored task
/// writes it, and either may close it.
#[async_trait]
pub trait TunnelStream: Send + Sync {
    /// Read into `buf`, returning 0 on end-of-stream.
    async fn read(&self, buf: &mut [u8]) -> Result<usize, TransportError>;

    /// Write the whole buffer.
    async fn write_all(&self, buf: &[u8]) -> Result<(), TransportError>;

    /// Close the stream. Idempotent.
    ///
    /// Any read or write pending on the stream, in any task, must fail promptly
    /// once this is called. Tunnel teardown relies on it.
    async fn close(&self);

    fn is_closed(&self) -> bool;
}
