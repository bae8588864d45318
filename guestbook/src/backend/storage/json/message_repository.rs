//! # JSON Message Repository
//!
//! File-based message storage using a single JSON document that is read in
//! full and rewritten in full on every mutation.
//!
//! ## Document Format
//!
//! ```json
//! {
//!   "next_id": 3,
//!   "messages": [
//!     { "id": 1, "text": "Welcome!", "created_at": "2025-01-21 19:30:00" },
//!     { "id": 2, "text": "Thanks!", "created_at": "2025-01-21 19:35:00" }
//!   ]
//! }
//! ```
//!
//! `next_id` is the persisted sequence counter that gives records a durable
//! identity. Documents written in the older positional format (a bare array of
//! `{ "text": ... }` objects) are still readable; their records are numbered
//! by position starting at 1 and the document is upgraded on the next write.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use shared::Message;
use std::sync::{Arc, Mutex};

use super::connection::JsonConnection;
use crate::backend::storage::traits::MessageStorage;

/// Timestamp layout shared with SQLite's `CURRENT_TIMESTAMP`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct MessageDocument {
    #[serde(default = "first_id")]
    next_id: i64,
    #[serde(default)]
    messages: Vec<Message>,
}

impl Default for MessageDocument {
    fn default() -> Self {
        Self {
            next_id: first_id(),
            messages: Vec::new(),
        }
    }
}

fn first_id() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
struct LegacyRecord {
    #[serde(alias = "viesti")]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredDocument {
    Current(MessageDocument),
    Legacy(Vec<LegacyRecord>),
}

impl From<StoredDocument> for MessageDocument {
    fn from(stored: StoredDocument) -> Self {
        match stored {
            StoredDocument::Current(mut document) => {
                // Never hand out an id that is already taken
                let max_id = document.messages.iter().map(|m| m.id).max().unwrap_or(0);
                document.next_id = document.next_id.max(max_id + 1);
                document
            }
            StoredDocument::Legacy(records) => {
                let messages: Vec<Message> = records
                    .into_iter()
                    .enumerate()
                    .map(|(index, record)| Message {
                        id: index as i64 + 1,
                        text: record.text,
                        created_at: None,
                    })
                    .collect();
                MessageDocument {
                    next_id: messages.len() as i64 + 1,
                    messages,
                }
            }
        }
    }
}

/// JSON-backed implementation of [`MessageStorage`]
#[derive(Clone)]
pub struct JsonMessageRepository {
    connection: JsonConnection,
    // Serializes read-modify-write cycles within this process
    write_lock: Arc<Mutex<()>>,
}

impl JsonMessageRepository {
    /// Create a new JSON message repository
    pub fn new(connection: JsonConnection) -> Self {
        Self {
            connection,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Get the message at a zero-based position of the full listing
    pub async fn get_message_at(&self, index: usize) -> Result<Option<Message>> {
        let document = self.load_document()?;
        Ok(document.messages.get(index).cloned())
    }

    fn load_document(&self) -> Result<MessageDocument> {
        let Some(content) = self.connection.read()? else {
            return Ok(MessageDocument::default());
        };

        let stored: StoredDocument = serde_json::from_str(&content).with_context(|| {
            format!(
                "Failed to parse message document {}",
                self.connection.file_path().display()
            )
        })?;
        Ok(stored.into())
    }

    fn save_document(&self, document: &MessageDocument) -> Result<()> {
        let content = serde_json::to_string_pretty(document)?;
        self.connection.write(&content)
    }

    /// Run a read-modify-write cycle under the write lock
    fn modify<T>(&self, f: impl FnOnce(&mut MessageDocument) -> T) -> Result<T> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("Message document lock poisoned"))?;

        let mut document = self.load_document()?;
        let result = f(&mut document);
        self.save_document(&document)?;
        Ok(result)
    }
}

#[async_trait]
impl MessageStorage for JsonMessageRepository {
    fn backend_name(&self) -> &'static str {
        "JsonMessageRepository"
    }

    async fn store_message(&self, text: &str) -> Result<Message> {
        let created_at = Utc::now().format(TIMESTAMP_FORMAT).to_string();
        let message = self.modify(|document| {
            let message = Message {
                id: document.next_id,
                text: text.to_string(),
                created_at: Some(created_at),
            };
            document.next_id += 1;
            document.messages.push(message.clone());
            message
        })?;

        debug!("Stored message {} in {}", message.id, self.connection.file_path().display());
        Ok(message)
    }

    async fn get_message(&self, id: i64) -> Result<Option<Message>> {
        let document = self.load_document()?;
        Ok(document.messages.into_iter().find(|m| m.id == id))
    }

    async fn get_latest_message(&self) -> Result<Option<Message>> {
        let document = self.load_document()?;
        Ok(document.messages.into_iter().max_by_key(|m| m.id))
    }

    async fn list_messages(&self) -> Result<Vec<Message>> {
        let document = self.load_document()?;
        debug!("Loaded {} messages", document.messages.len());
        Ok(document.messages)
    }

    /// Substring match, case-insensitive for ASCII like the SQLite backend
    async fn search_messages(&self, term: &str) -> Result<Vec<Message>> {
        let document = self.load_document()?;
        let needle = term.to_ascii_lowercase();
        let matches: Vec<Message> = document
            .messages
            .into_iter()
            .filter(|m| m.text.to_ascii_lowercase().contains(&needle))
            .collect();

        debug!("Search for '{}' matched {} messages", term, matches.len());
        Ok(matches)
    }

    async fn update_message(&self, id: i64, text: &str) -> Result<bool> {
        // Leave the file untouched when there is nothing to change
        if self.get_message(id).await?.is_none() {
            debug!("Update skipped, message {} not found", id);
            return Ok(false);
        }

        self.modify(|document| match document.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.text = text.to_string();
                true
            }
            None => false,
        })
    }

    async fn delete_message(&self, id: i64) -> Result<bool> {
        if self.get_message(id).await?.is_none() {
            debug!("Delete skipped, message {} not found", id);
            return Ok(false);
        }

        self.modify(|document| {
            let before = document.messages.len();
            document.messages.retain(|m| m.id != id);
            document.messages.len() != before
        })
    }

    async fn clear_messages(&self) -> Result<()> {
        self.modify(|document| *document = MessageDocument::default())?;
        info!("Cleared all messages in {}", self.connection.file_path().display());
        Ok(())
    }
}
