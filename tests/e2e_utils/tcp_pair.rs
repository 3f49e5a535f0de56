#![cfg(test)]
#![allow(dead_code)]

use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};

/// Two ends of one loopback TCP connection.
pub struct TcpPair {
    /// Accepted side, handed to the relay.
    pub local: TcpStream,
    /// Connecting side, driven by the test.
    pub remote: TcpStream,
}

impl TcpPair {
    pub async fn connect() -> Result<Self, Box<dyn std::error::Error>> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;

        let (remote, accepted) = tokio::join!(TcpStream::connect(addr), listener.accept());
        let (local, _) = accepted?;

        Ok(Self { local, remote: remote? })
    }
}
