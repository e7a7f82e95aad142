//! Shared pacing state.

use tokio::time::Instant;

/// The mutable pacing state of a gate.
///
/// Every field participates in the per-call wait decision. The whole record
/// sits behind a single lock owned by the gate and is read and written as
/// one critical section per call.
#[derive(Debug, Default)]
pub(crate) struct GateState {
    /// Completion instant of the previous call. Unset before the first call.
    pub(crate) last_call: Option<Instant>,
    /// Calls accumulated in the current burst window (greedy policy only).
    pub(crate) batch_count: u32,
    /// Instant the current burst window opened (greedy policy only).
    pub(crate) batch_start: Option<Instant>,
}

impl GateState {
    /// Whether no call has committed through this gate yet.
    pub(crate) fn is_first_call(&self) -> bool {
        self.last_call.is_none()
    }
}
