use std::fmt;
use std::io;
use std::net::SocketAddr;

use super::OpKind;

/// A failed read or write on a live tunnel stream.
///
/// Carries enough context (operation, transport family, peer address) to be
/// classified and logged without holding on to the stream itself.
#[derive(Debug)]
pub struct TransportError {
    pub op: OpKind,
    pub net: &'static str,
    pub addr: Option<SocketAddr>,
    pub source: io::Error,
}

impl TransportError {
    pub fn new(op: OpKind, net: &'static str, addr: Option<SocketAddr>, source: io::Error) -> Self {
        Self { op, net, addr, source }
    }

    /// Error returned by operations attempted on a stream after it was closed.
    pub fn closed(op: OpKind, net: &'static str, addr: Option<SocketAddr>) -> Self {
        Self::new(
            op,
            net,
            addr,
            io::Error::new(io::ErrorKind::NotConnected, "use of closed tunnel stream"),
        )
    }

    pub fn addr_display(&self) -> String {
        self.addr.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string())
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}: {}", self.op, self.net, self.addr_display(), self.source)
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Terminal error of one directional copy loop.
#[derive(Debug)]
pub enum CopyError {
    /// Read from the source or write to the destination failed.
    Transport(TransportError),
    /// The capture sink rejected a write. Never classified as a transport error.
    Capture(io::Error),
}

impl CopyError {
    pub fn as_transport(&self) -> Option<&TransportError> {
        match self {
            CopyError::Transport(e) => Some(e),
            CopyError::Capture(_) => None,
        }
    }
}

impl fmt::Display for CopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyError::Transport(e) => write!(f, "transport error: {}", e),
            CopyError::Capture(e) => write!(f, "capture write failed: {}", e),
        }
    }
}

impl std::error::Error for CopyError {}

impl From<TransportError> for CopyError {
    fn from(e: TransportError) -> Self {
        CopyError::Transport(e)
    }
}

#[derive(Debug, Clone)]
pub enum RelayError {
    Config(String),
    CaptureFile(String),
    ReportFailed(String),
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
            RelayError::CaptureFile(msg) => write!(f, "Capture file error: {}", msg),
            RelayError::ReportFailed(msg) => write!(f, "Session report failed: {}", msg),
        }
    }
}

impl std::error::Error for RelayError {}

pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_error_display() {
        let err = TransportError::closed(OpKind::Read, "tcp", Some("127.0.0.1:80".parse().unwrap()));
        assert_eq!(err.to_string(), "read tcp 127.0.0.1:80: use of closed tunnel stream");
        assert_eq!(err.source.kind(), io::ErrorKind::NotConnected);
    }

    #[test]
    fn test_capture_error_is_not_transport() {
        let err = CopyError::Capture(io::Error::new(io::ErrorKind::Other, "disk full"));
        assert!(err.as_transport().is_none());

        let err: CopyError = TransportError::closed(OpKind::Write, "pipe", None).into();
        assert_eq!(err.as_transport().map(|e| e.op), Some(OpKind::Write));
    }
}
