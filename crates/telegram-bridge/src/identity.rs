//! Account identity extraction from a query credential
//!
//! The credential is a form-urlencoded pair list whose `user` value is a
//! JSON document describing the Telegram account. Only the id and username
//! are kept; they exist purely to label log lines per account.

use serde::Deserialize;

use crate::error::{Error, Result};

/// External identity embedded in a query credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountIdentity {
    pub user_id: i64,
    pub username: Option<String>,
}

#[derive(Deserialize)]
struct EmbeddedUser {
    id: i64,
    #[serde(default)]
    username: Option<String>,
}

/// Parse the `user` field out of a query credential.
///
/// Pure function: percent-decoding and pair splitting via `form_urlencoded`,
/// then a JSON decode of the `user` value.
pub fn extract_identity(query_credential: &str) -> Result<AccountIdentity> {
    let user_json = url::form_urlencoded::parse(query_credential.as_bytes())
        .find(|(key, _)| key == "user")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| Error::Identity("no user field in credential".into()))?;

    let user: EmbeddedUser = serde_json::from_str(&user_json)
        .map_err(|e| Error::Identity(format!("user field is not valid JSON: {e}")))?;

    Ok(AccountIdentity {
        user_id: user.id,
        username: user.username,
    })
}
