//! Fault Reporting Module
//!
//! Receives descriptions of bookkeeping faults the caches detect and repair.

use std::fmt::Debug;

use tracing::warn;

// == Fault Reporter ==
/// Sink for internal cache faults.
///
/// A fault never reaches the caller: the cache reports it here, repairs its
/// bookkeeping and carries on as if the operation had missed.
pub trait FaultReporter: Debug + Send + Sync {
    fn report(&self, operation: &'static str, detail: &str);
}

/// Default reporter, forwards faults to `tracing` at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFaultReporter;

impl FaultReporter for TracingFaultReporter {
    fn report(&self, operation: &'static str, detail: &str) {
        warn!(operation, detail, "Cache bookkeeping fault");
    }
}

/// Discards every fault.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFaultReporter;

impl FaultReporter for NullFaultReporter {
    fn report(&self, _operation: &'static str, _detail: &str) {}
}
