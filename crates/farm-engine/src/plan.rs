//! Decision logic and wait-time computation
//!
//! Pure functions over the server-reported state and timestamps. The
//! polling cadence follows the server's own completion timestamp instead
//! of a fixed interval: one poll shortly after the cycle finishes, plus a
//! safety margin so the poll lands after the server-side completion
//! instant.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use fintopio_api::FarmState;

/// Poll delay when no usable completion timestamp exists.
pub const POLL_DELAY: Duration = Duration::from_secs(5);

/// Added on top of a finish-based wait so the next poll lands after the
/// server-side completion instant.
pub const SAFETY_MARGIN: Duration = Duration::from_secs(5);

/// Backoff after any failed iteration before retrying the same account.
pub const ERROR_BACKOFF: Duration = Duration::from_secs(300);

/// Current wall-clock time in epoch milliseconds, the unit the server
/// reports `finish` in.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// What one iteration should do after reading the farming state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    /// Claim the finished reward, then start a fresh cycle.
    ClaimThenStart,
    /// Start a fresh cycle, nothing to claim.
    Start,
    /// Leave the cycle running (or do nothing for unrecognized states).
    Idle,
}

/// Derive the next action from the reported state and timestamps.
///
/// `farming` only becomes claimable once a reported `finish` is strictly in
/// the past; with no `finish` at all the cycle is left alone.
pub fn decide(state: &FarmState, finish: Option<u64>, now_ms: u64) -> NextAction {
    match state {
        FarmState::Farmed => NextAction::ClaimThenStart,
        FarmState::Idling => NextAction::Start,
        FarmState::Farming => match finish {
            Some(finish) if now_ms > finish => NextAction::ClaimThenStart,
            _ => NextAction::Idle,
        },
        FarmState::Other(_) => NextAction::Idle,
    }
}

/// Sleep schedule until the next iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPlan {
    /// Sleep past the reported completion instant (`finish - now` plus
    /// [`SAFETY_MARGIN`]).
    Until { sleep: Duration },
    /// No usable completion timestamp; poll again after [`POLL_DELAY`].
    Poll,
}

impl WaitPlan {
    /// Compute the plan from the last reported finish timestamp.
    ///
    /// Absent, zero, or non-future timestamps all degrade to `Poll` — the
    /// scheduler never sees a negative delay.
    pub fn compute(finish: Option<u64>, now_ms: u64) -> WaitPlan {
        match finish {
            Some(finish) if finish > now_ms => WaitPlan::Until {
                sleep: Duration::from_millis(finish - now_ms) + SAFETY_MARGIN,
            },
            _ => WaitPlan::Poll,
        }
    }

    /// Actual sleep duration for the scheduler.
    pub fn delay(&self) -> Duration {
        match self {
            WaitPlan::Until { sleep } => *sleep,
            WaitPlan::Poll => POLL_DELAY,
        }
    }
}
