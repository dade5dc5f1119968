use serde::{Deserialize, Serialize};

/// Kinds of inbound node messages that can sit in the holding queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    #[serde(rename = "EOM")]
    Eom,
    Ack,
    FullServerFault,
    CommitChain,
    CommitEntry,
    RevealEntry,
    DirectoryBlockSignature,
    FactoidTransaction,
    Heartbeat,
    MissingMsg,
    MissingMsgResponse,
    SignatureTimeout,
}

impl MessageType {
    pub fn name(&self) -> &'static str {
        match self {
            MessageType::Eom => "EOM",
            MessageType::Ack => "Ack",
            MessageType::FullServerFault => "FullServerFault",
            MessageType::CommitChain => "CommitChain",
            MessageType::CommitEntry => "CommitEntry",
            MessageType::RevealEntry => "RevealEntry",
            MessageType::DirectoryBlockSignature => "DirectoryBlockSignature",
            MessageType::FactoidTransaction => "FactoidTransaction",
            MessageType::Heartbeat => "Heartbeat",
            MessageType::MissingMsg => "MissingMsg",
            MessageType::MissingMsgResponse => "MissingMsgResponse",
            MessageType::SignatureTimeout => "SignatureTimeout",
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An inbound message as held by the node while it waits to be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "Type")]
    pub msg_type: MessageType,
    #[serde(
        rename = "Hash",
        serialize_with = "crate::utils::serde_helpers::as_hex",
        deserialize_with = "crate::utils::serde_helpers::from_hex"
    )]
    pub hash: [u8; 32],
    /// milliseconds since the unix epoch
    #[serde(rename = "Timestamp")]
    pub timestamp: u64,
    #[serde(rename = "VMIndex")]
    pub vm_index: u32,
}

impl Message {
    pub fn new(msg_type: MessageType, hash: [u8; 32], timestamp: u64) -> Self {
        Self { msg_type, hash, timestamp, vm_index: 0 }
    }

    pub fn msg_type(&self) -> MessageType {
        self.msg_type
    }
}
