//! # Storage Traits
//!
//! This module defines the storage abstraction that allows the JSON and SQLite
//! backends to be used interchangeably by the domain layer.

use anyhow::Result;
use async_trait::async_trait;
use shared::Message;

/// Trait defining the interface for guestbook message storage
///
/// Every backend implements the full set of operations, so the daemon never
/// has to know which one it was handed. Lookups by id that find nothing are
/// reported as `None` / `false`, never as errors.
#[async_trait]
pub trait MessageStorage: Send + Sync {
    /// Type name of the backend, shown in the "saved" status message
    fn backend_name(&self) -> &'static str;

    /// Store a new message and return it with its assigned id
    async fn store_message(&self, text: &str) -> Result<Message>;

    /// Retrieve a specific message by ID
    async fn get_message(&self, id: i64) -> Result<Option<Message>>;

    /// Get the message with the highest ID
    async fn get_latest_message(&self) -> Result<Option<Message>>;

    /// List all messages in insertion order (ascending ID)
    async fn list_messages(&self) -> Result<Vec<Message>>;

    /// List messages whose text contains `term` (literal, ASCII case-insensitive)
    async fn search_messages(&self, term: &str) -> Result<Vec<Message>>;

    /// Overwrite the text of a message
    /// Returns true if the message was found and updated, false otherwise
    async fn update_message(&self, id: i64, text: &str) -> Result<bool>;

    /// Delete a single message
    /// Returns true if the message was found and deleted, false otherwise
    async fn delete_message(&self, id: i64) -> Result<bool>;

    /// Delete every message and restart the ID sequence at 1
    async fn clear_messages(&self) -> Result<()>;
}
