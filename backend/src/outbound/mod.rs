//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: process-local repository used when no database is configured
//!
//! Adapters only translate between domain types and storage representations.

pub mod memory;
pub mod persistence;

pub use memory::InMemoryUserRepository;
