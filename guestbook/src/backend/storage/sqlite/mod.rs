//! # SQLite Storage Module
//!
//! Relational storage: a single `messages` table in an embedded SQLite file.
//!
//! ## Components
//!
//! - **connection.rs** - Database location, schema setup, per-operation connections
//! - **repositories/** - SQLite-based repository implementations

pub mod connection;
pub mod repositories;

// Re-export the main types for external use
pub use connection::DbConnection;
pub use repositories::SqliteMessageRepository;
