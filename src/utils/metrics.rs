use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::Mutex;

pub const REQUESTS_TOTAL: &str = "debug_api_requests_total";
pub const UNAUTHORIZED_TOTAL: &str = "debug_api_unauthorized_total";
pub const INVALID_REQUEST_TOTAL: &str = "debug_api_invalid_request_total";
pub const METHOD_NOT_FOUND_TOTAL: &str = "debug_api_method_not_found_total";
pub const HANDLER_ERROR_TOTAL: &str = "debug_api_handler_error_total";
pub const SUCCESS_TOTAL: &str = "debug_api_success_total";

/// Counter registry rendered in Prometheus text format.
#[derive(Clone, Default)]
pub struct MetricsRegistry {
    counters: Arc<Mutex<BTreeMap<String, u64>>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_counter(&self, name: &str) {
        *self.counters.lock().entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.lock().get(name).copied().unwrap_or(0)
    }

    /// Render every counter as `# TYPE` + sample lines, sorted by name.
    pub fn render(&self) -> String {
        let counters = self.counters.lock();
        let mut out = String::new();
        for (name, value) in counters.iter() {
            let _ = writeln!(out, "# TYPE {} counter", name);
            let _ = writeln!(out, "{} {}", name, value);
        }
        out
    }
}

lazy_static! {
    pub static ref METRICS: MetricsRegistry = MetricsRegistry::new();
}
