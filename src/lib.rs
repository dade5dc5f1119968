//! Authenticated JSON-RPC debug gateway for a running node.
//!
//! A caller passes the credential gate, sends one `{id, method, params}`
//! envelope to `POST /debug`, and gets back a read-only view of live node
//! state (`current-minute`, `federated-servers`, `holding-queue`, ...).

pub mod messages;
pub mod node;
pub mod rpc;
pub mod state;
pub mod utils;
