use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use shared::Message;
use sqlx::sqlite::SqliteRow;
use sqlx::{Connection, Row};

use crate::backend::storage::sqlite::connection::DbConnection;
use crate::backend::storage::traits::MessageStorage;

/// Repository for guestbook messages in SQLite
#[derive(Clone)]
pub struct SqliteMessageRepository {
    db: DbConnection,
}

impl SqliteMessageRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn to_message(row: &SqliteRow) -> Message {
        Message {
            id: row.get("id"),
            text: row.get("text"),
            created_at: row.get("created_at"),
        }
    }
}

/// Escape `LIKE` metacharacters so the term is matched literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl MessageStorage for SqliteMessageRepository {
    fn backend_name(&self) -> &'static str {
        "SqliteMessageRepository"
    }

    /// Store a message; id and timestamp come from the engine
    async fn store_message(&self, text: &str) -> Result<Message> {
        let mut conn = self.db.connect().await?;
        let row = sqlx::query(
            r#"
            INSERT INTO messages (text)
            VALUES (?)
            RETURNING id, text, created_at
            "#,
        )
        .bind(text)
        .fetch_one(&mut conn)
        .await?;
        conn.close().await?;

        let message = Self::to_message(&row);
        debug!("Stored message {}", message.id);
        Ok(message)
    }

    async fn get_message(&self, id: i64) -> Result<Option<Message>> {
        let mut conn = self.db.connect().await?;
        let row = sqlx::query(
            r#"
            SELECT id, text, created_at
            FROM messages
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut conn)
        .await?;
        conn.close().await?;

        Ok(row.as_ref().map(Self::to_message))
    }

    async fn get_latest_message(&self) -> Result<Option<Message>> {
        let mut conn = self.db.connect().await?;
        let row = sqlx::query(
            r#"
            SELECT id, text, created_at
            FROM messages
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&mut conn)
        .await?;
        conn.close().await?;

        Ok(row.as_ref().map(Self::to_message))
    }

    async fn list_messages(&self) -> Result<Vec<Message>> {
        let mut conn = self.db.connect().await?;
        let rows = sqlx::query(
            r#"
            SELECT id, text, created_at
            FROM messages
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&mut conn)
        .await?;
        conn.close().await?;

        debug!("Loaded {} messages", rows.len());
        Ok(rows.iter().map(Self::to_message).collect())
    }

    /// Substring match, case-insensitive for ASCII (SQLite `LIKE`); wildcards
    /// in the term are escaped so it matches literally
    async fn search_messages(&self, term: &str) -> Result<Vec<Message>> {
        let mut conn = self.db.connect().await?;
        let rows = sqlx::query(
            r#"
            SELECT id, text, created_at
            FROM messages
            WHERE text LIKE '%' || ? || '%' ESCAPE '\'
            ORDER BY id ASC
            "#,
        )
        .bind(escape_like(term))
        .fetch_all(&mut conn)
        .await?;
        conn.close().await?;

        debug!("Search for '{}' matched {} messages", term, rows.len());
        Ok(rows.iter().map(Self::to_message).collect())
    }

    async fn update_message(&self, id: i64, text: &str) -> Result<bool> {
        let mut conn = self.db.connect().await?;
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET text = ?
            WHERE id = ?
            "#,
        )
        .bind(text)
        .bind(id)
        .execute(&mut conn)
        .await?;
        conn.close().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_message(&self, id: i64) -> Result<bool> {
        let mut conn = self.db.connect().await?;
        let result = sqlx::query(
            r#"
            DELETE FROM messages WHERE id = ?
            "#,
        )
        .bind(id)
        .execute(&mut conn)
        .await?;
        conn.close().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete all rows and reset the AUTOINCREMENT counter in one transaction
    async fn clear_messages(&self) -> Result<()> {
        let mut conn = self.db.connect().await?;
        let mut tx = conn.begin().await?;

        sqlx::query("DELETE FROM messages")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM sqlite_sequence WHERE name = 'messages'")
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        conn.close().await?;

        info!("Cleared all messages in {}", self.db.path().display());
        Ok(())
    }
}
