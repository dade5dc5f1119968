//! Debug method handlers.
//!
//! Each handler is a side-effect-free projection of `NodeState` into a result
//! shape. Params are accepted and ignored by every method.

use serde::Serialize;

use crate::messages::Message;
use crate::node::config::NodeConfig;
use crate::rpc::envelope::{Params, RpcError};
use crate::state::{NodeState, Server};

pub type HandlerResult = Result<DebugResult, RpcError>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditServersResult {
    #[serde(rename = "AuditServers")]
    pub audit_servers: Vec<Server>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FedServersResult {
    #[serde(rename = "FederatedServers")]
    pub federated_servers: Vec<Server>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingQueueResult {
    #[serde(rename = "Messages")]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkInfoResult {
    #[serde(rename = "NetworkNumber")]
    pub network_number: i32,
    #[serde(rename = "NetworkName")]
    pub network_name: String,
    #[serde(rename = "NetworkID")]
    pub network_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeStatusResult {
    #[serde(rename = "Status")]
    pub status: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictiveFerResult {
    #[serde(rename = "PredictiveFER")]
    pub predictive_fer: u64,
}

/// Result payload of a debug method, one variant per method.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DebugResult {
    AuditServers(AuditServersResult),
    Configuration(NodeConfig),
    CurrentMinute(i32),
    DropRate(i32),
    FederatedServers(FedServersResult),
    HoldingQueue(HoldingQueueResult),
    NetworkInfo(NetworkInfoResult),
    NodeStatus(NodeStatusResult),
    PredictiveFer(PredictiveFerResult),
}

pub fn handle_audit_servers(state: &dyn NodeState, _params: &Params) -> HandlerResult {
    let audit_servers = state.audit_servers(state.leader_height());
    Ok(DebugResult::AuditServers(AuditServersResult { audit_servers }))
}

pub fn handle_config(state: &dyn NodeState, _params: &Params) -> HandlerResult {
    Ok(DebugResult::Configuration(state.config()))
}

pub fn handle_current_minute(state: &dyn NodeState, _params: &Params) -> HandlerResult {
    Ok(DebugResult::CurrentMinute(state.current_minute()))
}

pub fn handle_drop_rate(state: &dyn NodeState, _params: &Params) -> HandlerResult {
    Ok(DebugResult::DropRate(state.drop_rate()))
}

pub fn handle_fed_servers(state: &dyn NodeState, _params: &Params) -> HandlerResult {
    let federated_servers = state.fed_servers(state.leader_height());
    Ok(DebugResult::FederatedServers(FedServersResult { federated_servers }))
}

pub fn handle_holding_queue(state: &dyn NodeState, _params: &Params) -> HandlerResult {
    Ok(DebugResult::HoldingQueue(HoldingQueueResult {
        messages: state.holding_messages(),
    }))
}

pub fn handle_network_info(state: &dyn NodeState, _params: &Params) -> HandlerResult {
    Ok(DebugResult::NetworkInfo(NetworkInfoResult {
        network_number: state.network_number(),
        network_name: state.network_name(),
        network_id: state.network_id(),
    }))
}

pub fn handle_node_status(state: &dyn NodeState, _params: &Params) -> HandlerResult {
    Ok(DebugResult::NodeStatus(NodeStatusResult { status: state.status() }))
}

pub fn handle_predictive_fer(state: &dyn NodeState, _params: &Params) -> HandlerResult {
    Ok(DebugResult::PredictiveFer(PredictiveFerResult {
        predictive_fer: state.predictive_fer(),
    }))
}
