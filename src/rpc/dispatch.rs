//! Method dispatch: name -> handler lookup, invocation, outcome normalisation.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::rpc::envelope::{Params, RpcError, RpcRequest, RpcResponse};
use crate::rpc::handlers::{self, DebugResult, HandlerResult};
use crate::state::NodeState;

/// A debug method implementation.
pub type Handler = Box<dyn Fn(&dyn NodeState, &Params) -> HandlerResult + Send + Sync>;

/// Method name -> handler. Built once at startup, read-only afterwards.
#[derive(Default)]
pub struct MethodTable {
    handlers: HashMap<&'static str, Handler>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full debug method set.
    pub fn standard() -> Self {
        Self::new()
            .register("audit-servers", handlers::handle_audit_servers)
            .register("configuration", handlers::handle_config)
            .register("current-minute", handlers::handle_current_minute)
            .register("drop-rate", handlers::handle_drop_rate)
            .register("federated-servers", handlers::handle_fed_servers)
            .register("holding-queue", handlers::handle_holding_queue)
            .register("network-info", handlers::handle_network_info)
            .register("node-status", handlers::handle_node_status)
            .register("predictive-fer", handlers::handle_predictive_fer)
    }

    /// Add a handler. A later registration under the same name replaces the earlier one.
    pub fn register<F>(mut self, method: &'static str, handler: F) -> Self
    where
        F: Fn(&dyn NodeState, &Params) -> HandlerResult + Send + Sync + 'static,
    {
        self.handlers.insert(method, Box::new(handler));
        self
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, method: &str) -> Option<&Handler> {
        self.handlers.get(method)
    }

    /// Registered method names, sorted.
    pub fn methods(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

/// Receives one record per successful dispatch.
pub trait DispatchObserver: Send + Sync {
    fn dispatched(&self, method: &str, params: &Params);
}

/// Default observer: one `info` line per successful call.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl DispatchObserver for TracingObserver {
    fn dispatched(&self, method: &str, params: &Params) {
        info!(method = %method, params = %params, "debug API method");
    }
}

/// Routes decoded requests to handlers.
pub struct Dispatcher {
    table: MethodTable,
    observer: Arc<dyn DispatchObserver>,
}

impl Dispatcher {
    pub fn new(table: MethodTable, observer: Arc<dyn DispatchObserver>) -> Self {
        Self { table, observer }
    }

    /// Standard method table reporting to the tracing log.
    pub fn standard() -> Self {
        Self::new(MethodTable::standard(), Arc::new(TracingObserver))
    }

    pub fn table(&self) -> &MethodTable {
        &self.table
    }

    /// Run `req` against `state`.
    ///
    /// Unknown methods yield method-not-found without running anything.
    /// Handler errors are returned as-is. Only successful calls reach the
    /// observer, after the handler has produced its result.
    pub fn dispatch(
        &self,
        state: &dyn NodeState,
        req: &RpcRequest,
    ) -> Result<RpcResponse<DebugResult>, RpcError> {
        let handler = self
            .table
            .get(&req.method)
            .ok_or_else(RpcError::method_not_found)?;
        let result = handler(state, &req.params)?;
        self.observer.dispatched(&req.method, &req.params);
        Ok(RpcResponse::new(req.id.clone(), result))
    }
}
