//! Actix middleware wrapping every route.
//!
//! [`Trace`] opens a request span and scopes a fresh [`crate::TraceId`].

pub mod trace;

pub use trace::Trace;
