//! Farming control loop for Fintopio accounts
//!
//! The core of the workspace: decides per poll whether to claim, start, or
//! wait based on the server-reported farming state, sequences the
//! claim → jitter → start transition, and keeps every account's loop alive
//! indefinitely through a fixed error backoff.
//!
//! Account lifecycle:
//! 1. Scheduler loads all enrolled accounts once and spawns one runner each
//! 2. Runner derives a query credential through the bridge (one per run)
//! 3. Runner exchanges it for a bearer token and enters the poll loop
//! 4. Each iteration claims/starts per [`plan::decide`] and computes the
//!    next wait from the server's completion timestamp
//! 5. Any iteration error logs and backs off five minutes, then retries
//!    with the same token
//! 6. A cancellation token from process shutdown stops every sleep point

pub mod error;
pub mod iteration;
pub mod jitter;
pub mod plan;
pub mod runner;
pub mod scheduler;
pub mod session;
pub mod store;

pub use error::{Error, Result};
pub use iteration::run_iteration;
pub use jitter::{FixedJitter, JitterSource, ThreadRngJitter};
pub use plan::{ERROR_BACKOFF, NextAction, POLL_DELAY, SAFETY_MARGIN, WaitPlan, decide, now_ms};
pub use runner::run_account;
pub use scheduler::run_accounts;
pub use session::{ApiSession, FarmSession};
pub use store::{AccountRecord, AccountStore};
