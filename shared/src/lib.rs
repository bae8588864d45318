use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single guestbook entry as returned by every storage backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Identifier assigned at insert time, strictly increasing per backend
    pub id: i64,
    /// The visitor's message text
    pub text: String,
    /// Insertion time in `YYYY-MM-DD HH:MM:SS` (UTC); absent for records
    /// imported from the legacy positional JSON format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Which storage backend the application was built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Single JSON document rewritten on every mutation
    Json,
    /// Embedded SQLite database file
    Sqlite,
}

impl StorageKind {
    /// File name of the backing store inside the data directory
    pub fn data_file_name(&self) -> &'static str {
        match self {
            StorageKind::Json => "data.json",
            StorageKind::Sqlite => "data.db",
        }
    }
}

/// UI colour scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ThemeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(ThemeParseError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeParseError(pub String);

impl fmt::Display for ThemeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown theme '{}', expected 'dark' or 'light'", self.0)
    }
}

impl std::error::Error for ThemeParseError {}

/// Application settings read once at startup from the `SETTINGS` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Plaintext administrator password guarding the bulk clear
    pub password: String,
    pub theme: Theme,
    /// Locale code selecting `lang_<code>.json`
    pub language: String,
}

impl Settings {
    pub const DEFAULT_PASSWORD: &'static str = "1234";
    pub const DEFAULT_LANGUAGE: &'static str = "en";
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            password: Self::DEFAULT_PASSWORD.to_string(),
            theme: Theme::Dark,
            language: Self::DEFAULT_LANGUAGE.to_string(),
        }
    }
}
