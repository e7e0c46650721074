//! PostgreSQL adapters for the user and project repositories.
//!
//! Diesel rows (`models`) and the table definitions (`schema`) stay private;
//! repositories hand out domain types only. A project's members live in a
//! `uuid[]` column whose first element is the owner, and membership changes
//! are single `UPDATE` statements. Unique-index violations come back as
//! `DuplicateName` or `DuplicateEmail`.
//!
//! ```ignore
//! let pool = DbPool::new(PoolConfig::new("postgres://collab@localhost/collab")).await?;
//! let projects = DieselProjectRepository::new(pool.clone());
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_project_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_project_repository::DieselProjectRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
