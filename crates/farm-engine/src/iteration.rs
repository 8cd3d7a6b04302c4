//! One pass of the farming loop
//!
//! Sequencing per iteration: profile (display), daily check-in, state
//! fetch, then claim/start per [`decide`], then the wait computation. Any
//! error propagates to the runner, which applies the uniform backoff.

use chrono::{Local, TimeZone};
use fintopio_api::FarmState;
use tracing::{debug, info};

use crate::error::Result;
use crate::jitter::JitterSource;
use crate::plan::{NextAction, WaitPlan, decide, now_ms};
use crate::session::FarmSession;

/// Run one iteration against an authenticated session.
///
/// Returns the wait plan for the sleep before the next iteration. The
/// daily check-in is deliberately load-bearing: a check-in failure aborts
/// the whole iteration and lands on the generic backoff path.
pub async fn run_iteration(
    session: &dyn FarmSession,
    jitter: &dyn JitterSource,
) -> Result<WaitPlan> {
    let profile = session.fetch_profile().await?;
    info!(balance = %profile.balance, "balance");

    session.daily_check_in().await?;
    info!("daily check-in successful");

    let state = session.farming_state().await?;
    let mut finish = state.finish();

    match decide(&state.state, finish, now_ms()) {
        NextAction::ClaimThenStart => {
            session.claim_farming().await?;
            info!("farm claimed");

            let pause = jitter.restart_delay();
            debug!(pause_ms = pause.as_millis() as u64, "pausing before restart");
            tokio::time::sleep(pause).await;

            finish = start_cycle(session).await?;
        }
        NextAction::Start => {
            finish = start_cycle(session).await?;
        }
        NextAction::Idle => match (&state.state, finish) {
            (FarmState::Farming, Some(finish)) => {
                info!(completion = %format_finish(finish), "farming in progress");
            }
            (FarmState::Other(raw), _) => {
                debug!(state = %raw, "unrecognized farming state, no action");
            }
            _ => {}
        },
    }

    Ok(WaitPlan::compute(finish, now_ms()))
}

/// Start a new cycle and re-fetch the state for its completion timestamp.
///
/// The start response carries a finish timestamp too, but the re-fetch is
/// what the loop trusts for the wait computation.
async fn start_cycle(session: &dyn FarmSession) -> Result<Option<u64>> {
    match session.start_farming().await? {
        Some(finish) => info!(completion = %format_finish(finish), "farming started"),
        None => info!("farming started, no completion time reported"),
    }

    let state = session.farming_state().await?;
    Ok(state.finish())
}

fn format_finish(finish_ms: u64) -> String {
    Local
        .timestamp_millis_opt(finish_ms as i64)
        .single()
        .map(|dt| dt.format("%B %d, %Y at %I:%M %p").to_string())
        .unwrap_or_else(|| finish_ms.to_string())
}
