#![cfg(test)]
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyproxy::adapters::{AtomicErrorCounters, ClosableStream, SessionLedger};
use anyproxy::config::RelayConfig;
use anyproxy::domain::{EndpointRole, RelayMode};
use anyproxy::ports::{RelayPort, SharedStream, Tunnel};
use tokio::net::TcpStream;

use super::TcpPair;

/// A relay built from configuration, with its own counters and ledger.
pub struct RelayFixture {
    pub relay: Arc<dyn RelayPort>,
    pub metrics: Arc<AtomicErrorCounters>,
    pub ledger: Arc<SessionLedger>,
}

impl RelayFixture {
    pub fn new(config: &RelayConfig) -> Self {
        let metrics = Arc::new(AtomicErrorCounters::new());
        let ledger = Arc::new(SessionLedger::new(Duration::from_secs(60)));
        let relay = config.build_relay(metrics.clone(), ledger.clone());
        Self { relay, metrics, ledger }
    }

    pub fn direct() -> Self {
        Self::new(&RelayConfig::default())
    }

    pub fn capture(dir: PathBuf) -> Self {
        Self::new(&RelayConfig {
            mode: RelayMode::Capture,
            capture_dir: dir,
            ..RelayConfig::default()
        })
    }

    /// Relay `proxy` (client-facing) and `direct` (upstream-facing) as one tunnel.
    pub fn tunnel(&self, proxy: TcpStream, direct: TcpStream) -> (Tunnel, SharedStream, SharedStream) {
        let proxy_side: SharedStream = Arc::new(ClosableStream::tcp(proxy));
        let direct_side: SharedStream = Arc::new(ClosableStream::tcp(direct));
        let tunnel = self.relay.clone().spawn_duplex(
            Some(proxy_side.clone()),
            Some(direct_side.clone()),
            EndpointRole::ProxyServer,
            EndpointRole::DirectServer,
        );
        (tunnel, proxy_side, direct_side)
    }

    pub async fn tcp_tunnel(&self) -> Result<(Tunnel, TcpStream, TcpStream), Box<dyn std::error::Error>> {
        let client = TcpPair::connect().await?;
        let upstream = TcpPair::connect().await?;
        let (tunnel, _, _) = self.tunnel(client.local, upstream.local);
        Ok((tunnel, client.remote, upstream.remote))
    }
}

pub fn capture_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("anyproxy_e2e_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("Failed to create capture dir");
    dir
}
