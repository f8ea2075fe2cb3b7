//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM, no Axum).
//! Only trait definitions, domain types and the ownership predicate.

pub mod errors;
pub mod ownership;
pub mod repositories;

pub use errors::DomainError;
pub use repositories::*;
