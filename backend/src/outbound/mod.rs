//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory_store**: process-local repositories used when no database is
//!   configured and in tests
//! - **argon2_hasher**: password hashing
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod argon2_hasher;
pub mod memory_store;
pub mod persistence;

pub use argon2_hasher::Argon2PasswordHasher;
pub use memory_store::InMemoryStore;
