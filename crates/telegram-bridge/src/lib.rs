//! Telegram credential bridge
//!
//! The farming API authenticates with a short-lived "query credential": the
//! form-urlencoded data blob Telegram embeds in a bot webview URL. Producing
//! it requires a full MTProto session handshake, which this workspace treats
//! as a black box behind the [`CredentialBridge`] trait.
//!
//! [`HelperBridge`] is the production implementation: it delegates the
//! handshake to an external helper command that holds the platform client,
//! passing the stored session over stdin and reading the credential from
//! stdout. A `None` result means the account cannot proceed this run.
//!
//! [`identity::extract_identity`] is the only parsing this crate does
//! itself: pulling the embedded user id/name out of a credential to build a
//! human-readable log prefix.

pub mod bridge;
pub mod error;
pub mod identity;

pub use bridge::{CredentialBridge, HelperBridge};
pub use error::{Error, Result};
pub use identity::{AccountIdentity, extract_identity};
