use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Read,
    Write,
}

impl OpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Read => "read",
            OpKind::Write => "write",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of a tunnel a stream represents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EndpointRole {
    /// Client-facing side.
    ProxyServer,
    /// Upstream-facing side.
    DirectServer,
    Other(String),
}

impl EndpointRole {
    pub fn as_str(&self) -> &str {
        match self {
            EndpointRole::ProxyServer => "proxyserver",
            EndpointRole::DirectServer => "directserver",
            EndpointRole::Other(s) => s.as_str(),
        }
    }

    pub fn from_label(s: &str) -> Self {
        match s {
            "proxyserver" => EndpointRole::ProxyServer,
            "directserver" => EndpointRole::DirectServer,
            other => EndpointRole::Other(other.to_string()),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, EndpointRole::Other(_))
    }
}

impl fmt::Display for EndpointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EndpointRole {
    fn from(s: &str) -> Self {
        EndpointRole::from_label(s)
    }
}

/// The four transport error counters, keyed by role and operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCounter {
    ProxyServerRead,
    ProxyServerWrite,
    DirectServerRead,
    DirectServerWrite,
}

impl ErrorCounter {
    pub const ALL: [ErrorCounter; 4] = [
        ErrorCounter::ProxyServerRead,
        ErrorCounter::ProxyServerWrite,
        ErrorCounter::DirectServerRead,
        ErrorCounter::DirectServerWrite,
    ];

    /// Counter for an operation failing in a direction sourced from `role`, if
    /// that role is counted at all.
    pub fn for_role(role: &EndpointRole, op: OpKind) -> Option<Self> {
        match (role, op) {
            (EndpointRole::ProxyServer, OpKind::Read) => Some(ErrorCounter::ProxyServerRead),
            (EndpointRole::ProxyServer, OpKind::Write) => Some(ErrorCounter::ProxyServerWrite),
            (EndpointRole::DirectServer, OpKind::Read) => Some(ErrorCounter::DirectServerRead),
            (EndpointRole::DirectServer, OpKind::Write) => Some(ErrorCounter::DirectServerWrite),
            (EndpointRole::Other(_), _) => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorCounter::ProxyServerRead => "proxyserver_read_err",
            ErrorCounter::ProxyServerWrite => "proxyserver_write_err",
            ErrorCounter::DirectServerRead => "directserver_read_err",
            ErrorCounter::DirectServerWrite => "directserver_write_err",
        }
    }
}

impl fmt::Display for ErrorCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorCountsSnapshot {
    pub proxyserver_read_err: u64,
    pub proxyserver_write_err: u64,
    pub directserver_read_err: u64,
    pub directserver_write_err: u64,
}

impl ErrorCountsSnapshot {
    pub fn get(&self, counter: ErrorCounter) -> u64 {
        match counter {
            ErrorCounter::ProxyServerRead => self.proxyserver_read_err,
            ErrorCounter::ProxyServerWrite => self.proxyserver_write_err,
            ErrorCounter::DirectServerRead => self.directserver_read_err,
            ErrorCounter::DirectServerWrite => self.directserver_write_err,
        }
    }

    pub fn total(&self) -> u64 {
        ErrorCounter::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

impl fmt::Display for ErrorCountsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={} {}={} {}={} {}={}",
            ErrorCounter::ProxyServerRead,
            self.proxyserver_read_err,
            ErrorCounter::ProxyServerWrite,
            self.proxyserver_write_err,
            ErrorCounter::DirectServerRead,
            self.directserver_read_err,
            ErrorCounter::DirectServerWrite,
            self.directserver_write_err,
        )
    }
}

/// Which relay strategy tunnels are built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayMode {
    #[default]
    Direct,
    Capture,
}

/// What the capture relay does when its capture file cannot be created or flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureFaultPolicy {
    /// Log and abort the process.
    #[default]
    Abort,
    /// Log and keep relaying without capture.
    Passthrough,
}

/// Outcome of one captured directional copy.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub id: uuid::Uuid,
    pub src_role: EndpointRole,
    pub dst_role: EndpointRole,
    pub error: Option<String>,
    pub bytes: u64,
    pub capture_path: Option<PathBuf>,
    pub finished_at: std::time::Instant,
}

impl SessionReport {
    pub fn new(src_role: EndpointRole, dst_role: EndpointRole, bytes: u64) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            src_role,
            dst_role,
            error: None,
            bytes,
            capture_path: None,
            finished_at: std::time::Instant::now(),
        }
    }

    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }

    pub fn with_capture_path(mut self, path: Option<PathBuf>) -> Self {
        self.capture_path = path;
        self
    }

    pub fn is_clean(&self) -> bool {
        self.error.is_none()
    }
}
