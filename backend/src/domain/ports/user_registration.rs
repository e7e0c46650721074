//! Driving port for account creation.

use async_trait::async_trait;

use crate::domain::{Credentials, Error, User};

/// Domain use-case port for registering accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRegistration: Send + Sync {
    /// Create an account, failing with `Conflict` when the email is taken.
    async fn register(&self, credentials: &Credentials) -> Result<User, Error>;
}
