//! Per-account farming runner
//!
//! One runner owns one account for the life of the process: derive a query
//! credential, exchange it for a bearer token, then iterate forever. Every
//! sleep and long await races against the shutdown token so cancellation
//! is prompt.

use std::sync::Arc;
use std::time::Duration;

use fintopio_api::ApiClient;
use telegram_bridge::{CredentialBridge, extract_identity};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::iteration::run_iteration;
use crate::jitter::JitterSource;
use crate::plan::{ERROR_BACKOFF, WaitPlan};
use crate::session::ApiSession;
use crate::store::AccountRecord;

/// Run one account's farming loop until shutdown.
///
/// Failure to derive a credential or extract an identity aborts this
/// account only; the function returns and siblings keep running.
pub async fn run_account(
    record: AccountRecord,
    base_url: String,
    bridge: Arc<dyn CredentialBridge>,
    jitter: Arc<dyn JitterSource>,
    shutdown: CancellationToken,
) {
    let credential = tokio::select! {
        _ = shutdown.cancelled() => return,
        credential = bridge.derive_query_credential(&record.phone_number, &record.session) => credential,
    };
    let Some(credential) = credential else {
        warn!(
            phone = %record.phone_number,
            "failed to get query credential, skipping account"
        );
        return;
    };

    let identity = match extract_identity(&credential) {
        Ok(identity) => identity,
        Err(e) => {
            warn!(phone = %record.phone_number, error = %e, "unusable query credential");
            return;
        }
    };

    let span = info_span!("account", user = identity.user_id);
    farm_loop(&record, &base_url, &credential, jitter, shutdown)
        .instrument(span)
        .await;
}

async fn farm_loop(
    record: &AccountRecord,
    base_url: &str,
    credential: &str,
    jitter: Arc<dyn JitterSource>,
    shutdown: CancellationToken,
) {
    let client = match ApiClient::new(base_url, record.proxy.as_deref()) {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "cannot build API client for account");
            return;
        }
    };

    // One auth exchange per run. The bearer token is reused for every
    // iteration afterwards, including after errors; an invalidated token
    // keeps retrying on the backoff path rather than re-deriving a
    // credential.
    let session = loop {
        let attempt = tokio::select! {
            _ = shutdown.cancelled() => return,
            attempt = client.authenticate(credential) => attempt,
        };
        match attempt {
            Ok(token) => {
                info!("authenticated");
                break ApiSession::new(client.clone(), token);
            }
            Err(e) => {
                warn!(error = %e, "authentication failed, backing off");
                if !sleep_or_shutdown(ERROR_BACKOFF, &shutdown).await {
                    return;
                }
            }
        }
    };

    loop {
        let outcome = tokio::select! {
            _ = shutdown.cancelled() => return,
            outcome = run_iteration(&session, jitter.as_ref()) => outcome,
        };

        let delay = match outcome {
            Ok(plan) => {
                match plan {
                    WaitPlan::Until { sleep } => {
                        debug!(sleep_ms = sleep.as_millis() as u64, "sleeping until completion");
                    }
                    WaitPlan::Poll => {
                        info!("no valid waiting time, continuing shortly");
                    }
                }
                plan.delay()
            }
            Err(e) => {
                warn!(error = %e, "farm iteration failed, backing off");
                ERROR_BACKOFF
            }
        };

        if !sleep_or_shutdown(delay, &shutdown).await {
            return;
        }
    }
}

/// Sleep unless shutdown arrives first. Returns false on shutdown.
async fn sleep_or_shutdown(delay: Duration, shutdown: &CancellationToken) -> bool {
    tokio::select! {
        _ = shutdown.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Bridge double that fails credential derivation.
    struct NoneBridge {
        attempts: AtomicUsize,
    }

    impl CredentialBridge for NoneBridge {
        fn derive_query_credential<'a>(
            &'a self,
            _phone_number: &'a str,
            _session: &'a str,
        ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { None })
        }
    }

    fn record() -> AccountRecord {
        AccountRecord {
            id: 1,
            phone_number: "+15550100".into(),
            session: "blob".into(),
            proxy: None,
        }
    }

    #[tokio::test]
    async fn credential_failure_aborts_without_retry() {
        let bridge = Arc::new(NoneBridge {
            attempts: AtomicUsize::new(0),
        });
        run_account(
            record(),
            "http://127.0.0.1:9".into(),
            bridge.clone(),
            Arc::new(crate::jitter::FixedJitter(Duration::ZERO)),
            CancellationToken::new(),
        )
        .await;

        // No retry within the run: one derivation attempt, then abort.
        assert_eq!(bridge.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn garbage_credential_aborts_account() {
        struct GarbageBridge;
        impl CredentialBridge for GarbageBridge {
            fn derive_query_credential<'a>(
                &'a self,
                _phone_number: &'a str,
                _session: &'a str,
            ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
                Box::pin(async { Some("auth_date=1&hash=nouser".into()) })
            }
        }

        // Returns promptly instead of looping: no identity, no farm loop.
        run_account(
            record(),
            "http://127.0.0.1:9".into(),
            Arc::new(GarbageBridge),
            Arc::new(crate::jitter::FixedJitter(Duration::ZERO)),
            CancellationToken::new(),
        )
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn failed_iteration_backs_off_and_reuses_credentials() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        /// Bridge double that counts derivations and hands out one fixed
        /// credential.
        struct CountingBridge {
            derivations: AtomicUsize,
        }

        impl CredentialBridge for CountingBridge {
            fn derive_query_credential<'a>(
                &'a self,
                _phone_number: &'a str,
                _session: &'a str,
            ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
                self.derivations.fetch_add(1, Ordering::SeqCst);
                Box::pin(async { Some("user=%7B%22id%22%3A42%7D&hash=deadbeef".into()) })
            }
        }

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/telegram"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": "jwt-token"
            })))
            .expect(1)
            .mount(&server)
            .await;
        // Every iteration dies at the profile fetch.
        Mock::given(method("GET"))
            .and(path("/referrals/data"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let bridge = Arc::new(CountingBridge {
            derivations: AtomicUsize::new(0),
        });
        let shutdown = CancellationToken::new();
        let started = tokio::time::Instant::now();
        let runner = tokio::spawn(run_account(
            record(),
            server.uri(),
            bridge.clone(),
            Arc::new(crate::jitter::FixedJitter(Duration::ZERO)),
            shutdown.clone(),
        ));

        // Three failed iterations means two backoff sleeps in between.
        loop {
            let profile_calls = server
                .received_requests()
                .await
                .map(|reqs| {
                    reqs.iter()
                        .filter(|r| r.url.path() == "/referrals/data")
                        .count()
                })
                .unwrap_or(0);
            if profile_calls >= 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        assert!(
            started.elapsed() >= 2 * ERROR_BACKOFF,
            "retries came back before the backoff elapsed: {:?}",
            started.elapsed()
        );
        // One derivation, one auth exchange: errors retry with the same
        // bearer token (the auth mock's expect(1) verifies on drop).
        assert_eq!(bridge.derivations.load(Ordering::SeqCst), 1);

        shutdown.cancel();
        runner.await.unwrap();
    }

    #[tokio::test]
    async fn shutdown_interrupts_sleep() {
        let token = CancellationToken::new();
        token.cancel();
        assert!(!sleep_or_shutdown(Duration::from_secs(3600), &token).await);
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_completes_without_shutdown() {
        let token = CancellationToken::new();
        assert!(sleep_or_shutdown(Duration::from_secs(3600), &token).await);
    }
}
