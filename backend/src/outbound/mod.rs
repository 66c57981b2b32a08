//! Outbound adapters implementing the domain repository ports.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM.
//! - **memory**: process-local repositories for development and tests.

pub mod memory;
pub mod persistence;
