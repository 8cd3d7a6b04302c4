//! Fintopio remote API client
//!
//! Typed wrappers around the game's HTTP endpoints: bearer-token exchange,
//! profile fetch, daily check-in, and the three farming operations. Every
//! request carries the fixed browser-mimicking header set and is optionally
//! routed through a per-account forward proxy.
//!
//! The client performs no retries — failure policy belongs to the farming
//! loop, which treats any error here as iteration-fatal and backs off.

pub mod client;
pub mod constants;
pub mod error;
pub mod models;

pub use client::ApiClient;
pub use constants::BASE_URL;
pub use error::{Error, Result};
pub use models::{FarmState, FarmingState, Profile, Timings};
