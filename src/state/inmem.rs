//! In-memory node state.
//! - Backs the debug gateway for local/dev nodes and tests
//! - Minute clock: ten minutes per block, the leader height advances on wrap
//! - Process lists keyed by height; a new height inherits the previous list

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::messages::Message;
use crate::node::config::NodeConfig;
use crate::state::traits::{NodeState, Server};

pub const MINUTES_PER_BLOCK: i32 = 10;

#[derive(Debug, Clone, Default)]
struct ProcessList {
    fed: Vec<Server>,
    audit: Vec<Server>,
}

#[derive(Debug, Default)]
struct StateData {
    config: NodeConfig,
    leader_height: u32,
    current_minute: i32,
    drop_rate: i32,
    predictive_fer: u64,
    process_lists: BTreeMap<u32, ProcessList>,
    holding: HashMap<[u8; 32], Message>,
}

/// Shared in-memory state. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemNodeState {
    inner: Arc<RwLock<StateData>>,
}

impl InMemNodeState {
    pub fn new(config: NodeConfig) -> Self {
        let data = StateData {
            drop_rate: config.node.drop_rate,
            predictive_fer: config.node.predictive_fer,
            config,
            ..Default::default()
        };
        Self { inner: Arc::new(RwLock::new(data)) }
    }

    /// Build state from config with this node as the only federated server at height 0.
    pub fn from_config(config: NodeConfig) -> crate::utils::Result<Self> {
        let chain_id = config.identity_chain()?;
        let state = Self::new(config);
        state.set_servers(0, vec![Server::new(chain_id, "self", true)], vec![]);
        Ok(state)
    }

    pub fn set_leader_height(&self, height: u32) {
        self.inner.write().leader_height = height;
    }

    pub fn set_current_minute(&self, minute: i32) {
        self.inner.write().current_minute = minute;
    }

    pub fn set_drop_rate(&self, rate: i32) {
        self.inner.write().drop_rate = rate;
    }

    pub fn set_predictive_fer(&self, fer: u64) {
        self.inner.write().predictive_fer = fer;
    }

    pub fn set_servers(&self, height: u32, fed: Vec<Server>, audit: Vec<Server>) {
        self.inner
            .write()
            .process_lists
            .insert(height, ProcessList { fed, audit });
    }

    pub fn add_holding(&self, msg: Message) {
        self.inner.write().holding.insert(msg.hash, msg);
    }

    pub fn remove_holding(&self, hash: &[u8; 32]) -> Option<Message> {
        self.inner.write().holding.remove(hash)
    }

    /// Step the minute clock. Returns the new (height, minute).
    pub fn advance_minute(&self) -> (u32, i32) {
        let mut d = self.inner.write();
        d.current_minute += 1;
        if d.current_minute >= MINUTES_PER_BLOCK {
            d.current_minute = 0;
            let prev = d.leader_height;
            d.leader_height = prev.saturating_add(1);
            if !d.process_lists.contains_key(&d.leader_height) {
                let carried = process_list_at(&d.process_lists, prev);
                let next = d.leader_height;
                d.process_lists.insert(next, carried);
            }
        }
        (d.leader_height, d.current_minute)
    }
}

/// Latest process list at or below `height`.
fn process_list_at(lists: &BTreeMap<u32, ProcessList>, height: u32) -> ProcessList {
    lists
        .range(..=height)
        .next_back()
        .map(|(_, pl)| pl.clone())
        .unwrap_or_default()
}

impl NodeState for InMemNodeState {
    fn leader_height(&self) -> u32 {
        self.inner.read().leader_height
    }

    fn audit_servers(&self, height: u32) -> Vec<Server> {
        process_list_at(&self.inner.read().process_lists, height).audit
    }

    fn fed_servers(&self, height: u32) -> Vec<Server> {
        process_list_at(&self.inner.read().process_lists, height).fed
    }

    fn config(&self) -> NodeConfig {
        self.inner.read().config.clone()
    }

    fn current_minute(&self) -> i32 {
        self.inner.read().current_minute
    }

    fn drop_rate(&self) -> i32 {
        self.inner.read().drop_rate
    }

    fn holding_messages(&self) -> Vec<Message> {
        self.inner.read().holding.values().cloned().collect()
    }

    fn network_number(&self) -> i32 {
        self.inner.read().config.network.number
    }

    fn network_name(&self) -> String {
        self.inner.read().config.network.name.clone()
    }

    fn network_id(&self) -> u32 {
        self.inner.read().config.network.id
    }

    fn status(&self) -> Vec<String> {
        let d = self.inner.read();
        let fed = process_list_at(&d.process_lists, d.leader_height).fed;
        vec![
            format!("Network: {}", d.config.network.name),
            format!("Leader height: {}", d.leader_height),
            format!("Minute: {}", d.current_minute),
            format!("Federated servers: {}", fed.len()),
            format!("Holding: {}", d.holding.len()),
        ]
    }

    fn predictive_fer(&self) -> u64 {
        self.inner.read().predictive_fer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::MessageType;

    #[test]
    fn from_config_seeds_self_as_federated() {
        let cfg = NodeConfig::default();
        let chain = cfg.identity_chain().unwrap();
        let st = InMemNodeState::from_config(cfg).unwrap();
        let fed = st.fed_servers(st.leader_height());
        assert_eq!(fed.len(), 1);
        assert_eq!(fed[0].chain_id, chain);
        assert!(st.audit_servers(0).is_empty());
    }

    #[test]
    fn minute_wrap_advances_height_and_carries_process_list() {
        let st = InMemNodeState::new(NodeConfig::default());
        st.set_servers(0, vec![Server::new([1; 32], "a", true)], vec![Server::new([2; 32], "b", false)]);
        for _ in 0..9 {
            st.advance_minute();
        }
        assert_eq!((st.leader_height(), st.current_minute()), (0, 9));
        assert_eq!(st.advance_minute(), (1, 0));
        assert_eq!(st.fed_servers(1)[0].name, "a");
        assert_eq!(st.audit_servers(1)[0].name, "b");
    }

    #[test]
    fn lookup_falls_back_to_lower_height() {
        let st = InMemNodeState::new(NodeConfig::default());
        st.set_servers(5, vec![Server::new([5; 32], "five", true)], vec![]);
        assert!(st.fed_servers(4).is_empty());
        assert_eq!(st.fed_servers(9)[0].name, "five");
    }

    #[test]
    fn holding_map_is_keyed_by_hash() {
        let st = InMemNodeState::new(NodeConfig::default());
        st.add_holding(Message::new(MessageType::Ack, [7; 32], 1));
        st.add_holding(Message::new(MessageType::Ack, [7; 32], 2));
        st.add_holding(Message::new(MessageType::Eom, [8; 32], 3));
        assert_eq!(st.holding_messages().len(), 2);
        assert!(st.remove_holding(&[7; 32]).is_some());
        assert_eq!(st.holding_messages().len(), 1);
    }

    #[test]
    fn network_identity_comes_from_config() {
        let st = InMemNodeState::new(NodeConfig::default());
        assert_eq!(st.network_name(), "LOCAL");
        assert_eq!(st.network_number(), 2);
        assert_eq!(st.network_id(), 0xFA92_E5A4);
        assert_eq!(st.predictive_fer(), 1000);
    }
}
