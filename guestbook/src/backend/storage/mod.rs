//! # Storage Module
//!
//! Handles all data persistence for the guestbook.
//!
//! The domain layer only sees the [`MessageStorage`] trait; which backend sits
//! behind it is decided once at startup.
//!
//! ## Backends
//!
//! - **json**: one JSON document, rewritten wholesale on every mutation, with a
//!   persisted id counter so records keep a stable identity
//! - **sqlite**: one `messages` table with AUTOINCREMENT ids and timestamps,
//!   opening a fresh connection per operation
//!
//! Both backends implement every operation, so edit, delete and search behave
//! the same no matter which one is selected.
//!
//! ## Other persisted state
//!
//! - **settings_repository**: the INI `config.conf` file

pub mod json;
pub mod settings_repository;
pub mod sqlite;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use json::{JsonConnection, JsonMessageRepository};
pub use settings_repository::SettingsRepository;
pub use sqlite::{DbConnection, SqliteMessageRepository};
pub use traits::MessageStorage;
