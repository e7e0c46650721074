//! Account domain service.
//!
//! Implements registration, login and the user read ports on top of the user
//! repository and a password hasher. Hashing is CPU-bound and runs on Tokio's
//! blocking pool.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task;
use tracing::{error, info};
use zeroize::Zeroizing;

use crate::domain::ports::{
    LoginService, PasswordHashError, PasswordHasher, StoredCredentials, UserPersistenceError,
    UserProfileQuery, UserRegistration, UserRepository, UsersQuery,
};
use crate::domain::{Credentials, Error, User, UserId};

const INVALID_CREDENTIALS: &str = "invalid credentials";

fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            error!(%message, "user repository unavailable");
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            error!(%message, "user repository query failed");
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("email already registered: {email}"))
                .with_details(serde_json::json!({ "field": "email", "code": "duplicate_email" }))
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    error!(error = %error, "password hashing failed");
    Error::internal("password hashing failed")
}

/// Account service implementing the user-facing driving ports.
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> AccountService<U, H> {
    /// Create a service over a user repository and password hasher.
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

impl<U, H> AccountService<U, H>
where
    H: PasswordHasher + 'static,
{
    /// Run a hasher call off the async workers.
    async fn with_hasher<T, F>(&self, job: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&H) -> Result<T, PasswordHashError> + Send + 'static,
    {
        let hasher = Arc::clone(&self.hasher);
        task::spawn_blocking(move || job(&hasher))
            .await
            .map_err(|join_error| {
                error!(error = %join_error, "password hashing task failed");
                Error::internal("password hashing failed")
            })?
            .map_err(map_hash_error)
    }
}

#[async_trait]
impl<U, H> UserRegistration for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn register(&self, credentials: &Credentials) -> Result<User, Error> {
        let password = Zeroizing::new(credentials.password().to_owned());
        let hash = self
            .with_hasher(move |hasher| hasher.hash(&password))
            .await?;
        let user = User::new(UserId::random(), credentials.email().clone());
        self.users
            .insert(&user, &hash)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user.id(), "account registered");
        Ok(user)
    }
}

#[async_trait]
impl<U, H> LoginService for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn authenticate(&self, credentials: &Credentials) -> Result<User, Error> {
        let Some(StoredCredentials {
            user,
            password_hash,
        }) = self
            .users
            .find_credentials(credentials.email())
            .await
            .map_err(map_user_persistence_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let password = Zeroizing::new(credentials.password().to_owned());
        let matches = self
            .with_hasher(move |hasher| hasher.verify(&password, &password_hash))
            .await?;
        if !matches {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(user)
    }
}

#[async_trait]
impl<U, H> UsersQuery for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn list_users(&self, authenticated_user: &UserId) -> Result<Vec<User>, Error> {
        self.users
            .list_except(authenticated_user)
            .await
            .map_err(map_user_persistence_error)
    }
}

#[async_trait]
impl<U, H> UserProfileQuery for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
