//! Account scheduler
//!
//! Loads the account list once, spawns one independent runner task per
//! record, and waits for all of them. Runners never naturally terminate;
//! returning means shutdown was requested or every account aborted during
//! setup. A panic in one runner is logged and never touches its siblings.

use std::sync::Arc;

use telegram_bridge::CredentialBridge;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::jitter::JitterSource;
use crate::runner::run_account;
use crate::store::AccountRecord;

/// Spawn one farming runner per account and run them to completion.
pub async fn run_accounts(
    records: Vec<AccountRecord>,
    base_url: &str,
    bridge: Arc<dyn CredentialBridge>,
    jitter: Arc<dyn JitterSource>,
    shutdown: CancellationToken,
) {
    if records.is_empty() {
        warn!("no accounts enrolled, nothing to farm");
        return;
    }

    let mut runners = JoinSet::new();
    for record in records {
        runners.spawn(run_account(
            record,
            base_url.to_owned(),
            bridge.clone(),
            jitter.clone(),
            shutdown.child_token(),
        ));
    }
    info!(accounts = runners.len(), "account runners started");

    while let Some(result) = runners.join_next().await {
        if let Err(e) = result {
            if e.is_panic() {
                error!(error = %e, "account runner panicked");
            }
        }
    }
    info!("all account runners stopped");
}
