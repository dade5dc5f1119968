//! Node wiring: in-memory state, minute clock and the debug API server.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::node::config::NodeConfig;
use crate::node::service_handle::ServiceHandle;
use crate::rpc::{AppState, AuthConfig, RpcServer};
use crate::state::InMemNodeState;

pub struct Node {
    cfg: NodeConfig,
    state: InMemNodeState,
}

impl Node {
    pub fn new(cfg: NodeConfig) -> Result<Self> {
        let state = InMemNodeState::from_config(cfg.clone())?;
        Ok(Self { cfg, state })
    }

    /// Spawn the node services and return the handle used to stop them.
    pub async fn start(self) -> Result<ServiceHandle> {
        let (mut svc, shutdown_rx) = ServiceHandle::new();

        if self.cfg.node.minute_secs > 0 {
            let period = Duration::from_secs(self.cfg.node.minute_secs);
            svc.spawn(run_minute_clock(self.state.clone(), period, shutdown_rx.clone()));
        }

        let auth = AuthConfig::from_config(&self.cfg)?;
        if !auth.enabled {
            warn!("rpc.user/rpc.password not set; debug API accepts unauthenticated callers");
        }
        let addr = self.cfg.bind_addr()?;
        let app = Arc::new(AppState::new(Arc::new(self.state.clone()), auth));
        let server = RpcServer::new(addr, app);
        let rx = shutdown_rx.clone();
        svc.spawn(async move { server.start(rx).await.map_err(anyhow::Error::from) });

        info!(
            "Node started, network: {} ({}), debug API: {}",
            self.cfg.network.name, self.cfg.network.number, addr
        );
        Ok(svc)
    }
}

async fn run_minute_clock(
    state: InMemNodeState,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<()> {
    let mut ticker = tokio::time::interval(period);
    // first tick completes immediately
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let (height, minute) = state.advance_minute();
                debug!(height, minute, "minute advanced");
            }
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }
    info!("minute clock stopped");
    Ok(())
}
