//! Domain ports for the hexagonal boundary.
//!
//! Ports describe how the domain expects to talk to driven adapters. Each
//! trait exposes a strongly typed error so adapters map their failures into
//! predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod user_repository;

#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
