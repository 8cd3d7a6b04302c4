//! Fixed request parameters for the Fintopio API
//!
//! The header set mimics the Telegram in-app browser on iOS. The service
//! rejects requests that look like plain HTTP clients, so every call sends
//! the full set, not just User-Agent.

/// Base path of the remote API.
pub const BASE_URL: &str = "https://fintopio-tg.fintopio.com/api";

/// Referer the embedded webview would send.
pub const REFERER: &str = "https://fintopio-tg.fintopio.com/";

/// Mobile Safari user agent (iPhone, iOS 15).
pub const USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 15_0 like Mac OS X) \
AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.0 Mobile/15E148 Safari/604.1";

/// Client-hint brand list matching the user agent above.
pub const SEC_CH_UA: &str =
    "\"Not/A)Brand\";v=\"8\", \"Chromium\";v=\"126\", \"Mobile Safari\";v=\"605.1.15\"";

/// Client-hint mobile flag.
pub const SEC_CH_UA_MOBILE: &str = "?1";

/// Client-hint platform.
pub const SEC_CH_UA_PLATFORM: &str = "\"iOS\"";

/// `Webapp` header value sent on the auth exchange.
pub const WEBAPP_AUTH: &str = "true";

/// `Webapp` header value sent on the profile fetch.
pub const WEBAPP_PROFILE: &str = "false, true";
