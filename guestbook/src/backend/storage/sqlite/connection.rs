use anyhow::{Context, Result};
use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use std::path::{Path, PathBuf};

/// DbConnection knows how to reach the guestbook database file
///
/// No connection is kept open: every repository operation calls
/// [`DbConnection::connect`] and closes the connection when it is done.
#[derive(Clone, Debug)]
pub struct DbConnection {
    path: PathBuf,
    options: SqliteConnectOptions,
}

impl DbConnection {
    /// Create a new database handle, creating the file and schema if needed
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);

        let db = Self { path, options };

        let mut conn = db.connect().await?;
        Self::setup_schema(&mut conn).await?;
        conn.close().await?;

        info!("Database ready at {}", db.path.display());
        Ok(db)
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a fresh connection scoped to a single operation
    pub async fn connect(&self) -> Result<SqliteConnection> {
        debug!("Opening connection to {}", self.path.display());
        self.options
            .connect()
            .await
            .with_context(|| format!("Failed to open database {}", self.path.display()))
    }

    /// Set up the required database schema
    async fn setup_schema(conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                text TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}
