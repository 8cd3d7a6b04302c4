//! Authenticated session seam between the loop and the API client
//!
//! The iteration logic runs against `dyn FarmSession` so tests can script
//! server behavior without a network. [`ApiSession`] is the production
//! implementation: an [`ApiClient`] plus the bearer token it obtained,
//! owned exclusively by one account's runner.

use std::future::Future;
use std::pin::Pin;

use common::Secret;
use fintopio_api::{ApiClient, FarmingState, Profile};

/// Boxed future alias for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One account's authenticated view of the farming API.
pub trait FarmSession: Send + Sync {
    fn fetch_profile(&self) -> BoxFuture<'_, fintopio_api::Result<Profile>>;
    fn daily_check_in(&self) -> BoxFuture<'_, fintopio_api::Result<()>>;
    fn farming_state(&self) -> BoxFuture<'_, fintopio_api::Result<FarmingState>>;
    fn start_farming(&self) -> BoxFuture<'_, fintopio_api::Result<Option<u64>>>;
    fn claim_farming(&self) -> BoxFuture<'_, fintopio_api::Result<()>>;
}

/// Production session: API client plus the bearer token from the auth
/// exchange. The token has no visible expiry; it is used until a request
/// fails.
pub struct ApiSession {
    client: ApiClient,
    token: Secret<String>,
}

impl ApiSession {
    pub fn new(client: ApiClient, token: String) -> Self {
        Self {
            client,
            token: token.into(),
        }
    }
}

impl FarmSession for ApiSession {
    fn fetch_profile(&self) -> BoxFuture<'_, fintopio_api::Result<Profile>> {
        Box::pin(self.client.fetch_profile(self.token.expose()))
    }

    fn daily_check_in(&self) -> BoxFuture<'_, fintopio_api::Result<()>> {
        Box::pin(self.client.daily_check_in(self.token.expose()))
    }

    fn farming_state(&self) -> BoxFuture<'_, fintopio_api::Result<FarmingState>> {
        Box::pin(self.client.fetch_farming_state(self.token.expose()))
    }

    fn start_farming(&self) -> BoxFuture<'_, fintopio_api::Result<Option<u64>>> {
        Box::pin(self.client.start_farming(self.token.expose()))
    }

    fn claim_farming(&self) -> BoxFuture<'_, fintopio_api::Result<()>> {
        Box::pin(self.client.claim_farming(self.token.expose()))
    }
}
