//! actix-web adapter for the `/users` and `/projects` routes.
//!
//! Handlers read the caller from [`session::SessionContext`], call a driving
//! port held in [`state::HttpState`] and let [`crate::domain::Error`] render
//! failures.

pub mod error;
pub mod health;
pub mod projects;
mod projects_dto;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;
