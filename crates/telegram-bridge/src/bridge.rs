//! Credential bridge trait and helper-process implementation
//!
//! The trait is dyn-compatible (boxed futures) so runners can share one
//! bridge behind `Arc<dyn CredentialBridge>`.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Produces one short-lived query credential per farming run.
///
/// `None` means the handshake could not produce a usable credential; the
/// caller must abort that account's run without touching other accounts.
pub trait CredentialBridge: Send + Sync {
    fn derive_query_credential<'a>(
        &'a self,
        phone_number: &'a str,
        session: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>>;
}

/// Bridge that runs an external helper command for the platform handshake.
///
/// Invocation contract: the configured command is run with its configured
/// arguments plus the account's phone number appended as the final argument.
/// The session blob is written to the helper's stdin (never argv, so it
/// stays out of the process table). The last non-empty stdout line is the
/// credential. Helper stderr is relayed to the log, except lines carrying
/// the platform's transient handshake noise markers.
pub struct HelperBridge {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl HelperBridge {
    pub fn new(command: String, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            command,
            args,
            timeout,
        }
    }

    async fn run_helper(&self, phone_number: &str, session: &str) -> Result<String> {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .arg(phone_number)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|e| Error::Spawn(format!("{}: {e}", self.command)))?;

        if let Some(mut stdin) = child.stdin.take() {
            let written = async {
                stdin.write_all(session.as_bytes()).await?;
                stdin.write_all(b"\n").await?;
                stdin.shutdown().await
            }
            .await;
            // stdin drops here, closing the pipe so the helper sees EOF.
            written.map_err(|e| Error::Handshake(format!("writing session to helper: {e}")))?;
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| Error::Timeout(self.timeout.as_secs()))?
            .map_err(|e| Error::Spawn(format!("waiting for helper: {e}")))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            if is_transient_noise(line) {
                debug!(line, "suppressed transient handshake noise");
            } else {
                warn!(line, "helper stderr");
            }
        }

        if !output.status.success() {
            return Err(Error::Handshake(format!(
                "helper exited with {}",
                output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let credential = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(str::to_owned);

        credential.ok_or_else(|| Error::Handshake("helper produced no credential".into()))
    }
}

impl CredentialBridge for HelperBridge {
    fn derive_query_credential<'a>(
        &'a self,
        phone_number: &'a str,
        session: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        Box::pin(async move {
            match self.run_helper(phone_number, session).await {
                Ok(credential) => Some(credential),
                Err(e) => {
                    warn!(error = %e, "credential derivation failed");
                    None
                }
            }
        })
    }
}

/// Expected transient noise from the platform handshake; suppressed from
/// warning-level logs during credential derivation.
fn is_transient_noise(line: &str) -> bool {
    line.contains("TIMEOUT") || line.contains("CastError")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_marker_is_transient_noise() {
        assert!(is_transient_noise("Telegram authentication error: TIMEOUT"));
        assert!(is_transient_noise("CastError: cannot cast peer"));
        assert!(!is_transient_noise("FLOOD_WAIT_420"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn helper_receives_session_and_phone() {
        // Helper echoes a credential derived from stdin plus its last argument.
        let bridge = HelperBridge::new(
            "sh".into(),
            vec![
                "-c".into(),
                "read session; echo \"hash=$session&phone=$1\"".into(),
                "helper".into(),
            ],
            Duration::from_secs(5),
        );

        let credential = bridge
            .derive_query_credential("+15550100", "session-blob")
            .await;
        assert_eq!(
            credential.as_deref(),
            Some("hash=session-blob&phone=+15550100")
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_helper_yields_none() {
        let bridge = HelperBridge::new(
            "sh".into(),
            vec!["-c".into(), "exit 3".into(), "helper".into()],
            Duration::from_secs(5),
        );

        let credential = bridge.derive_query_credential("+15550100", "blob").await;
        assert_eq!(credential, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn empty_stdout_yields_none() {
        let bridge = HelperBridge::new(
            "sh".into(),
            vec!["-c".into(), "exit 0".into(), "helper".into()],
            Duration::from_secs(5),
        );

        let credential = bridge.derive_query_credential("+15550100", "blob").await;
        assert_eq!(credential, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn hung_helper_times_out() {
        let bridge = HelperBridge::new(
            "sh".into(),
            vec!["-c".into(), "read session; sleep 30".into(), "helper".into()],
            Duration::from_millis(200),
        );

        let err = bridge.run_helper("+15550100", "blob").await.unwrap_err();
        assert!(matches!(err, Error::Timeout(_)), "got: {err}");
    }

    #[tokio::test]
    async fn missing_helper_command_yields_none() {
        let bridge = HelperBridge::new(
            "/nonexistent/helper-binary".into(),
            vec![],
            Duration::from_secs(1),
        );

        let credential = bridge.derive_query_credential("+15550100", "blob").await;
        assert_eq!(credential, None);
    }
}
