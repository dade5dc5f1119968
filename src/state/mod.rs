//! Node state as seen by the debug gateway.
//! - `NodeState`: the read-only capability the handlers depend on
//! - `InMemNodeState`: in-memory implementation for local nodes and tests
//! - `StateHandle`: mutex-guarded handle to the current state object

pub mod handle;
pub mod inmem;
pub mod traits;

pub use handle::StateHandle;
pub use inmem::InMemNodeState;
pub use traits::{NodeState, Server};
