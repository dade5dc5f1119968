//! Debug RPC module
//!
//! - `POST /debug`: authenticated JSON-RPC style introspection of node state
//! - Diagnostic endpoints: /health, /metrics
//! - HTTP Basic credential gate (disabled when no credentials are configured)
//!
//! Request flow: credential gate -> envelope decoder -> method dispatcher ->
//! handler -> response encoder.

pub mod auth;
pub mod dispatch;
pub mod envelope;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use dispatch::{DispatchObserver, Dispatcher, MethodTable, TracingObserver};
pub use envelope::{decode_request, Params, RpcError, RpcReply, RpcRequest, RpcResponse};
pub use handlers::DebugResult;
pub use server::{router, AppState, RpcServer};
