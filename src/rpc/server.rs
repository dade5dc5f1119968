use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::rpc::auth::{require_basic_auth, AuthConfig};
use crate::rpc::dispatch::Dispatcher;
use crate::rpc::envelope::{decode_request, RpcError, RpcReply, METHOD_NOT_FOUND};
use crate::rpc::handlers::DebugResult;
use crate::state::{NodeState, StateHandle};
use crate::utils::metrics::{
    MetricsRegistry, HANDLER_ERROR_TOTAL, INVALID_REQUEST_TOTAL, METHOD_NOT_FOUND_TOTAL,
    REQUESTS_TOTAL, SUCCESS_TOTAL,
};
use crate::utils::{NodeError, METRICS};

/// Everything a debug request needs, shared by all connections.
pub struct AppState {
    pub state: StateHandle,
    pub dispatcher: Dispatcher,
    pub auth: AuthConfig,
    pub metrics: MetricsRegistry,
}

impl AppState {
    /// Standard dispatcher and the process-wide metrics registry.
    pub fn new(state: Arc<dyn NodeState>, auth: AuthConfig) -> Self {
        Self {
            state: StateHandle::new(state),
            dispatcher: Dispatcher::standard(),
            auth,
            metrics: METRICS.clone(),
        }
    }

    pub fn with_metrics(mut self, metrics: MetricsRegistry) -> Self {
        self.metrics = metrics;
        self
    }

    /// Decode, dispatch and build the reply for one authenticated body.
    pub fn handle_body(&self, body: &[u8]) -> RpcReply<DebugResult> {
        self.metrics.inc_counter(REQUESTS_TOTAL);
        let req = match decode_request(body) {
            Ok(req) => req,
            Err(e) => {
                self.metrics.inc_counter(INVALID_REQUEST_TOTAL);
                return RpcReply::failure(None, e);
            }
        };

        let state = self.state.current();
        match self.dispatcher.dispatch(state.as_ref(), &req) {
            Ok(resp) => {
                self.metrics.inc_counter(SUCCESS_TOTAL);
                RpcReply::Success(resp)
            }
            Err(e) => {
                self.metrics.inc_counter(if e.code == METHOD_NOT_FOUND {
                    METHOD_NOT_FOUND_TOTAL
                } else {
                    HANDLER_ERROR_TOTAL
                });
                RpcReply::failure(Some(req.id), e)
            }
        }
    }
}

/// Routes: `POST /debug` behind the credential gate, plus `/health` and `/metrics`.
pub fn router(app: Arc<AppState>) -> Router {
    let debug = Router::new()
        .route("/debug", post(debug_endpoint))
        .route_layer(middleware::from_fn_with_state(app.clone(), require_basic_auth));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/metrics", get(metrics_handler))
        .merge(debug)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app)
}

async fn debug_endpoint(
    State(app): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let reply = match body {
        Ok(body) => app.handle_body(&body),
        Err(e) => {
            debug!("failed to read debug request body: {}", e);
            app.metrics.inc_counter(INVALID_REQUEST_TOTAL);
            RpcReply::failure(None, RpcError::invalid_request())
        }
    };
    json_response(reply.to_bytes())
}

async fn metrics_handler(State(app): State<Arc<AppState>>) -> String {
    app.metrics.render()
}

fn json_response(bytes: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        bytes,
    )
        .into_response()
}

/// Binds the debug endpoint and serves it until shutdown is signalled.
pub struct RpcServer {
    addr: SocketAddr,
    app: Arc<AppState>,
}

impl RpcServer {
    pub fn new(addr: SocketAddr, app: Arc<AppState>) -> Self {
        Self { addr, app }
    }

    pub async fn start(self, mut shutdown_rx: watch::Receiver<bool>) -> crate::utils::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        info!("Starting debug API server on {}", listener.local_addr()?);

        let app = router(self.app).into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                while !*shutdown_rx.borrow() {
                    if shutdown_rx.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await
            .map_err(|e| NodeError::RpcServerError(e.to_string()))?;
        info!("debug API server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::config::NodeConfig;
    use crate::rpc::envelope::INVALID_REQUEST;
    use crate::state::InMemNodeState;
    use serde_json::{json, Value};

    fn app() -> (AppState, InMemNodeState, MetricsRegistry) {
        let st = InMemNodeState::from_config(NodeConfig::default()).unwrap();
        let metrics = MetricsRegistry::new();
        let app = AppState::new(Arc::new(st.clone()), AuthConfig::disabled())
            .with_metrics(metrics.clone());
        (app, st, metrics)
    }

    fn reply_json(app: &AppState, body: &[u8]) -> Value {
        serde_json::from_slice(&app.handle_body(body).to_bytes()).unwrap()
    }

    #[test]
    fn handle_body_success() {
        let (app, st, metrics) = app();
        st.set_current_minute(4);
        let v = reply_json(&app, br#"{"method":"current-minute","id":1}"#);
        assert_eq!(v, json!({"jsonrpc":"2.0","id":1,"result":4}));
        assert_eq!(metrics.counter(SUCCESS_TOTAL), 1);
    }

    #[test]
    fn handle_body_unknown_method() {
        let (app, _st, metrics) = app();
        let v = reply_json(&app, br#"{"method":"bogus","id":2}"#);
        assert_eq!(v["id"], json!(2));
        assert_eq!(v["error"]["code"], json!(METHOD_NOT_FOUND));
        assert!(v.get("result").is_none());
        assert_eq!(metrics.counter(METHOD_NOT_FOUND_TOTAL), 1);
    }

    #[test]
    fn handle_body_not_json() {
        let (app, _st, metrics) = app();
        let v = reply_json(&app, b"not-json");
        assert_eq!(v["id"], Value::Null);
        assert_eq!(v["error"]["code"], json!(INVALID_REQUEST));
        assert_eq!(metrics.counter(INVALID_REQUEST_TOTAL), 1);
        assert_eq!(metrics.counter(SUCCESS_TOTAL), 0);
    }

    #[test]
    fn state_swap_is_seen_by_next_request() {
        let (app, _st, _m) = app();
        let replacement = InMemNodeState::new(NodeConfig::default());
        replacement.set_drop_rate(77);
        app.state.replace(Arc::new(replacement));
        let v = reply_json(&app, br#"{"method":"drop-rate","id":"x"}"#);
        assert_eq!(v["result"], json!(77));
    }
}
