use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utils::{NodeError, Result};

/// Node configuration loaded from a TOML file.
///
/// This is also the object reported by the `configuration` debug method, so
/// the RPC password is never serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub rpc: RpcSection,
    pub network: NetworkSection,
    pub node: NodeSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcSection {
    /// listen address of the debug endpoint (host:port)
    pub bind: String,
    pub user: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub log_level: String,
}

impl Default for RpcSection {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8088".to_string(),
            user: None,
            password: None,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSection {
    pub name: String,
    pub number: i32,
    pub id: u32,
}

impl Default for NetworkSection {
    fn default() -> Self {
        Self { name: "LOCAL".to_string(), number: 2, id: 0xFA92_E5A4 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSection {
    /// hex-encoded 32 byte identity chain of this node
    pub identity_chain_id: String,
    pub drop_rate: i32,
    pub predictive_fer: u64,
    /// seconds per block minute; 0 freezes the minute clock
    pub minute_secs: u64,
}

impl Default for NodeSection {
    fn default() -> Self {
        Self {
            identity_chain_id: "38bab1455b7bd7e5efd15c53c777c79d0c988e9210f1da49a99d95b3a6417be9"
                .to_string(),
            drop_rate: 0,
            predictive_fer: 1000,
            minute_secs: 60,
        }
    }
}

impl NodeConfig {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        let cfg = Self::parse(&data)
            .map_err(|e| NodeError::ConfigError(format!("{}: {}", path.display(), e)))?;
        Ok(cfg)
    }

    /// Parse and validate configuration from TOML text.
    pub fn parse(data: &str) -> Result<Self> {
        let cfg: NodeConfig =
            toml::from_str(data).map_err(|e| NodeError::ConfigError(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;
        self.identity_chain()?;
        if let Some((user, password)) = self.rpc_credentials() {
            if user.is_empty() || password.is_empty() {
                return Err(NodeError::ConfigError(
                    "rpc.user and rpc.password must be set together".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.rpc
            .bind
            .parse()
            .map_err(|e| NodeError::ConfigError(format!("rpc.bind {:?}: {}", self.rpc.bind, e)))
    }

    pub fn identity_chain(&self) -> Result<[u8; 32]> {
        let raw = hex::decode(&self.node.identity_chain_id)
            .map_err(|e| NodeError::ConfigError(format!("node.identity_chain_id: {}", e)))?;
        raw.try_into().map_err(|v: Vec<u8>| {
            NodeError::ConfigError(format!("node.identity_chain_id: expected 32 bytes, got {}", v.len()))
        })
    }

    /// The configured RPC user/password pair, or `None` when neither is set.
    /// A missing half is reported as the empty string.
    pub fn rpc_credentials(&self) -> Option<(&str, &str)> {
        let user = self.rpc.user.as_deref().unwrap_or("");
        let password = self.rpc.password.as_deref().unwrap_or("");
        if user.is_empty() && password.is_empty() {
            return None;
        }
        Some((user, password))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| NodeError::ConfigError(e.to_string()))
    }
}
