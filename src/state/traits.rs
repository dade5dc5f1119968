use serde::{Deserialize, Serialize};

use crate::messages::Message;
use crate::node::config::NodeConfig;

/// A federated or audit server entry in the process list at some height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    #[serde(
        rename = "ChainID",
        serialize_with = "crate::utils::serde_helpers::as_hex",
        deserialize_with = "crate::utils::serde_helpers::from_hex"
    )]
    pub chain_id: [u8; 32],
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Online")]
    pub online: bool,
}

impl Server {
    pub fn new(chain_id: [u8; 32], name: impl Into<String>, online: bool) -> Self {
        Self { chain_id, name: name.into(), online }
    }
}

/// Read-only view of live node state consumed by the debug handlers.
///
/// Implementations own their own consistency under concurrent reads; the
/// gateway never writes through this trait.
pub trait NodeState: Send + Sync + 'static {
    fn leader_height(&self) -> u32;

    fn audit_servers(&self, height: u32) -> Vec<Server>;

    fn fed_servers(&self, height: u32) -> Vec<Server>;

    fn config(&self) -> NodeConfig;

    fn current_minute(&self) -> i32;

    fn drop_rate(&self) -> i32;

    /// Every message currently in the holding map, in map iteration order.
    fn holding_messages(&self) -> Vec<Message>;

    fn network_number(&self) -> i32;

    fn network_name(&self) -> String;

    fn network_id(&self) -> u32;

    fn status(&self) -> Vec<String>;

    fn predictive_fer(&self) -> u64;
}
