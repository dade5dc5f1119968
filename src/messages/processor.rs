//! Per-type message processing entry points.

use crate::messages::message::{Message, MessageType};
use crate::utils::{NodeError, Result};

/// Routes inbound messages to type-specific processing.
///
/// Holds no state; every entry point is a pure check on the message.
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageProcessor;

impl MessageProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Accept a signature-timeout message. Anything else is rejected with
    /// `NodeError::InvalidMessageType`.
    pub fn process_signature_timeout(&self, msg: &Message) -> Result<()> {
        expect_type(msg, MessageType::SignatureTimeout)
    }
}

/// Fails unless `msg` carries the `expected` type tag.
pub fn expect_type(msg: &Message, expected: MessageType) -> Result<()> {
    if msg.msg_type() != expected {
        return Err(NodeError::InvalidMessageType {
            expected: expected.to_string(),
            actual: msg.msg_type().to_string(),
        });
    }
    Ok(())
}
