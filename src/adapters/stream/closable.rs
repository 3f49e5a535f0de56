use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, DuplexStream, ReadHalf, WriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{watch, Mutex};
use tracing::debug;

use crate::domain::{OpKind, TransportError};
use crate::ports::TunnelStream;

/// Tunnel stream over any tokio byte stream.
///
/// The stream is split so that one task can read while another writes. A watch
/// flag raced against every read and write makes `close` interrupt operations
/// already in flight in other tasks.
pub struct ClosableStream<T> {
    net: &'static str,
    addr: Option<SocketAddr>,
    reader: Mutex<ReadHalf<T>>,
    writer: Mutex<WriteHalf<T>>,
    closed: watch::Sender<bool>,
}

impl<T> ClosableStream<T>
where
    T: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    pub fn new(io: T, net: &'static str, addr: Option<SocketAddr>) -> Self {
        let (reader, writer) = tokio::io::split(io);
        let (closed, _) = watch::channel(false);
        Self {
            net,
            addr,
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
            closed,
        }
    }

    pub fn net(&self) -> &'static str {
        self.net
    }

    pub fn addr(&self) -> Option<SocketAddr> {
        self.addr
    }

    async fn until_closed(&self) {
        let mut closed = self.closed.subscribe();
        let _ = closed.wait_for(|closed| *closed).await;
    }

    fn op_error(&self, op: OpKind, source: std::io::Error) -> TransportError {
        TransportError::new(op, self.net, self.addr, source)
    }
}

impl ClosableStream<TcpStream> {
    pub fn tcp(stream: TcpStream) -> Self {
        let addr = stream.peer_addr().ok();
        Self::new(stream, "tcp", addr)
    }
}

impl ClosableStream<DuplexStream> {
    pub fn pipe(stream: DuplexStream) -> Self {
        Self::new(stream, "pipe", None)
    }
}

#[async_trait]
impl<T> TunnelStream for ClosableStream<T>
where
    T: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    async fn read(&self, buf: &mut [u8]) -> Result<usize, TransportError> {
        tokio::select! {
            biased;
            _ = self.until_closed() => Err(TransportError::closed(OpKind::Read, self.net, self.addr)),
            res = async { self.reader.lock().await.read(buf).await } => {
                res.map_err(|e| self.op_error(OpKind::Read, e))
            }
        }
    }

    async fn write_all(&self, buf: &[u8]) -> Result<(), TransportError> {
        tokio::select! {
            biased;
            _ = self.until_closed() => Err(TransportError::closed(OpKind::Write, self.net, self.addr)),
            res = async { self.writer.lock().await.write_all(buf).await } => {
                res.map_err(|e| self.op_error(OpKind::Write, e))
            }
        }
    }

    async fn close(&self) {
        if self.closed.send_replace(true) {
            return;
        }

        // Pending writers drop the lock as soon as they observe the flag.
        let mut writer = self.writer.lock().await;
        if let Err(e) = writer.shutdown().await {
            debug!("{} {:?}: shutdown failed: {}", self.net, self.addr, e);
        }
    }

    fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }
}
