use std::sync::Arc;

use parking_lot::Mutex;

use crate::state::traits::NodeState;

/// Shared handle through which requests reach the current state object.
///
/// The lock is held only long enough to clone the `Arc`; handler work runs
/// against the clone with the lock released.
pub struct StateHandle<S: ?Sized = dyn NodeState> {
    current: Mutex<Arc<S>>,
}

impl<S: NodeState + ?Sized> StateHandle<S> {
    pub fn new(state: Arc<S>) -> Self {
        Self { current: Mutex::new(state) }
    }

    pub fn current(&self) -> Arc<S> {
        self.current.lock().clone()
    }

    /// Swap in a new state object. In-flight requests keep the one they read.
    pub fn replace(&self, state: Arc<S>) -> Arc<S> {
        std::mem::replace(&mut *self.current.lock(), state)
    }
}
