//! Shared types for the Fintopio farmer workspace

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
