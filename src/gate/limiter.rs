//! Core pacing gate implementation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace};

use crate::config::GateConfig;
use crate::error::{RateGateError, Result};

use super::policy::PacingPolicy;
use super::state::GateState;

/// A shared gate that paces callers to a configured ceiling.
///
/// One gate coordinates all callers for one throttled resource. Each caller
/// awaits [`RateGate::wait`] before performing a unit of work; the gate
/// pauses it just long enough to keep the long-run rate at or below
/// `max_count` calls per window. Share the gate across tasks via `Arc`.
///
/// The pause happens while the state lock is held, so callers pass through
/// the gate strictly one at a time. Count and spacing guarantees are
/// aggregate; arrival order across concurrent callers is not preserved.
pub struct RateGate {
    /// Quota size: calls allowed per window
    max_count: u32,
    /// Window length
    per: Duration,
    /// Minimum spacing between calls under the steady policy
    min_interval: Duration,
    /// Selected pacing policy
    policy: PacingPolicy,
    /// Completed calls. Mutated only inside the critical section; read
    /// lock-free by [`RateGate::count`].
    call_count: AtomicU64,
    /// Pacing state, one record under one lock
    state: Mutex<GateState>,
}

impl RateGate {
    /// Create a steady-spacing gate allowing `max_count` calls per
    /// `per_seconds` seconds.
    pub fn new(max_count: u32, per_seconds: f64) -> Result<Self> {
        Self::with_policy(max_count, per_seconds, PacingPolicy::Steady)
    }

    /// Create a gate with an explicit pacing policy.
    pub fn with_policy(max_count: u32, per_seconds: f64, policy: PacingPolicy) -> Result<Self> {
        Self::from_config(&GateConfig {
            max_count,
            per_seconds,
            policy,
        })
    }

    /// Create a gate from a configuration record.
    ///
    /// Fails with [`RateGateError::Config`](crate::error::RateGateError) if
    /// the configuration does not validate; no gate is produced.
    pub fn from_config(config: &GateConfig) -> Result<Self> {
        config.validate()?;

        let per = Duration::try_from_secs_f64(config.per_seconds)
            .map_err(|e| RateGateError::Config(format!("per_seconds out of range: {}", e)))?;
        let min_interval = per.div_f64(config.max_count as f64);

        Ok(Self {
            max_count: config.max_count,
            per,
            min_interval,
            policy: config.policy,
            call_count: AtomicU64::new(0),
            state: Mutex::new(GateState::default()),
        })
    }

    /// Pause the caller until it may perform one unit of rate-limited work.
    ///
    /// Returns the duration this particular call was paused, or
    /// `Duration::ZERO` when no pause was needed. When it returns, the
    /// caller is authorized to proceed immediately.
    ///
    /// State commits only after the pause completes: dropping the returned
    /// future mid-pause cancels the call without counting it.
    pub async fn wait(&self) -> Duration {
        let mut state = self.state.lock().await;

        let now = Instant::now();
        let deadline = if state.is_first_call() {
            // The first call through the gate proceeds immediately.
            None
        } else {
            match self.policy {
                PacingPolicy::Steady => state.last_call.map(|prev| prev + self.min_interval),
                PacingPolicy::Greedy => {
                    state.batch_count += 1;
                    if state.batch_count >= self.max_count {
                        // Window quota exhausted: close it and sleep out the
                        // remainder of the window.
                        state.batch_count = 0;
                        state.batch_start.map(|opened| opened + self.per)
                    } else {
                        None
                    }
                }
            }
        };

        let paused = match deadline {
            Some(deadline) if deadline > now => {
                let pause = deadline - now;
                debug!(
                    policy = %self.policy,
                    pause_ms = pause.as_millis() as u64,
                    "Pausing caller until next slot"
                );
                sleep_until(deadline).await;
                pause
            }
            // A deadline in the past means the caller arrived late; it owes
            // nothing.
            _ => Duration::ZERO,
        };

        let now = Instant::now();
        state.last_call = Some(now);
        if self.policy.is_greedy() && state.batch_count == 0 {
            // A fresh window opens at the post-pause instant.
            state.batch_start = Some(now);
        }
        let committed = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;

        trace!(
            policy = %self.policy,
            call = committed,
            paused_ms = paused.as_millis() as u64,
            "Call committed"
        );

        paused
    }

    /// Total completed [`RateGate::wait`] calls.
    ///
    /// The counter is committed inside the critical section, so a read never
    /// observes a mid-update value.
    pub fn count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Quota size: calls allowed per window.
    pub fn max_count(&self) -> u32 {
        self.max_count
    }

    /// Window length.
    pub fn per(&self) -> Duration {
        self.per
    }

    /// Minimum spacing between calls under the steady policy.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Effective ceiling in calls per second.
    pub fn rate(&self) -> f64 {
        self.max_count as f64 / self.per.as_secs_f64()
    }

    /// Selected pacing policy.
    pub fn policy(&self) -> PacingPolicy {
        self.policy
    }
}
