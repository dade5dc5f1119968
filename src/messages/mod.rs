//! Inbound message model and the per-type processing guards.

pub mod message;
pub mod processor;

pub use message::{Message, MessageType};
pub use processor::MessageProcessor;
