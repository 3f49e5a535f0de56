use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use anyproxy::adapters::{AtomicErrorCounters, ClosableStream, SessionLedger};
use anyproxy::config::RelayConfig;
use anyproxy::domain::{EndpointRole, RelayMode};
use anyproxy::ports::{ErrorMetricsPort, RelayPort, SessionReportPort, SharedStream};

#[derive(Parser, Debug)]
#[clap(version = env!("ANYPROXY_VERSION"), author = env!("CARGO_PKG_AUTHORS"))]
pub struct Opts {
    /// Upstream server every accepted connection is relayed to
    #[clap(long, short = 'u')]
    upstream: String,

    /// listen on this network adress
    #[clap(long, short = 'b', default_value = "127.0.0.1:8889")]
    bind: String,

    /// Configuration file (defaults to the platform config directory)
    #[clap(long, short = 'c')]
    config: Option<PathBuf>,

    /// Write every session to capture files, whatever the configured mode
    #[clap(long)]
    capture: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let opts = Opts::parse();

    if let Err(e) = rlimit::increase_nofile_limit(u64::MAX) {
        warn!("failed to raise open file limit: {}", e);
    }

    let mut config = RelayConfig::load(opts.config.as_deref())?;
    if opts.capture {
        config.mode = RelayMode::Capture;
        config.validate()?;
    }

    let metrics = AtomicErrorCounters::global();
    let ledger = Arc::new(SessionLedger::new(config.report_retention()));
    ledger.start_cleanup();
    let reporter: Arc<dyn SessionReportPort> = ledger.clone();
    let relay = config.build_relay(metrics.clone(), reporter);

    let listener = TcpListener::bind(&opts.bind).await?;
    info!("Listening on: {} (upstream {})", listener.local_addr()?, opts.upstream);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (inbound, remote) = match accepted {
                    Ok(v) => v,
                    Err(e) => {
                        error!("accept failed: {}", e);
                        continue;
                    }
                };
                let relay = relay.clone();
                let upstream = opts.upstream.clone();
                tokio::spawn(async move {
                    let outbound = match TcpStream::connect(&upstream).await {
                        Ok(stream) => stream,
                        Err(e) => {
                            error!("Failed to connect to {} for {}: {}", upstream, remote, e);
                            return;
                        }
                    };
                    let proxy_side: SharedStream = Arc::new(ClosableStream::tcp(inbound));
                    let direct_side: SharedStream = Arc::new(ClosableStream::tcp(outbound));
                    let tunnel = relay.spawn_duplex(
                        Some(proxy_side),
                        Some(direct_side),
                        EndpointRole::ProxyServer,
                        EndpointRole::DirectServer,
                    );
                    info!("{} -> {} (tunnel {})", remote, upstream, tunnel.id());
                });
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down, transport errors: {}", metrics.snapshot());
                return Ok(());
            }
        }
    }
}
