//! Driving ports for reading accounts.
//!
//! The profile route needs the caller's own record; the collaborator picker
//! needs everyone else.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Looks up the signed-in user's own record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Fails with `NotFound` if the account was deleted after sign-in.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error>;
}

/// Lists candidate collaborators.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every registered user except `requester`.
    async fn list_users(&self, requester: &UserId) -> Result<Vec<User>, Error>;
}
