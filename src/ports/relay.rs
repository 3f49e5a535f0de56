use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::TunnelStream;
use crate::domain::EndpointRole;

pub type SharedStream = Arc<dyn TunnelStream>;

/// Port for relaying bytes between the two endpoints of a tunnel
#[async_trait]
pub trait RelayPort: Send + Sync + 'static {
    /// Copy `src` into `dst` until end-of-stream or error, then close both.
    ///
    /// A missing stream makes the call a no-op. Errors never reach the caller:
    /// they are classified and counted, then the streams are closed.
    async fn copy_directional(
        &self,
        dst: Option<SharedStream>,
        src: Option<SharedStream>,
        dst_role: EndpointRole,
        src_role: EndpointRole,
    );

    /// Start both directions of a tunnel and return without waiting.
    ///
    /// Each direction closes both streams when it ends, which in turn fails the
    /// other direction's pending read or write: there is no other cancellation.
    fn spawn_duplex(
        self: Arc<Self>,
        a: Option<SharedStream>,
        b: Option<SharedStream>,
        role_a: EndpointRole,
        role_b: EndpointRole,
    ) -> Tunnel {
        let id = Uuid::new_v4();
        debug!("tunnel {}: {} <-> {}", id, role_a, role_b);

        let relay = self.clone();
        let (a_dst, b_src) = (a.clone(), b.clone());
        let (a_role, b_role) = (role_a.clone(), role_b.clone());
        let b_to_a = tokio::spawn(async move { relay.copy_directional(a_dst, b_src, a_role, b_role).await });

        let a_to_b = tokio::spawn(async move { self.copy_directional(b, a, role_b, role_a).await });

        Tunnel { id, a_to_b, b_to_a }
    }
}

/// Handle on the two directional copies of a tunnel.
///
/// Dropping it leaves both copies running.
pub struct Tunnel {
    id: Uuid,
    a_to_b: JoinHandle<()>,
    b_to_a: JoinHandle<()>,
}

impl Tunnel {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_finished(&self) -> bool {
        self.a_to_b.is_finished() && self.b_to_a.is_finished()
    }

    /// Wait for both directions to terminate.
    ///
    /// A direction whose task panicked or was cancelled is logged; the other
    /// direction is still awaited.
    pub async fn wait(self) {
        let (a_to_b, b_to_a) = tokio::join!(self.a_to_b, self.b_to_a);
        for (direction, outcome) in [("a->b", a_to_b), ("b->a", b_to_a)] {
            match outcome {
                Ok(()) => {}
                Err(e) if e.is_panic() => error!("tunnel {} {}: direction task panicked: {}", self.id, direction, e),
                Err(e) => warn!("tunnel {} {}: direction task failed: {}", self.id, direction, e),
            }
        }
    }
}
