//! # Localizer
//!
//! Resolves opaque keys to display strings for one language.
//!
//! Translations live in `<locales_dir>/lang_<code>.json` as a flat JSON
//! object. The table grows lazily: when a key is requested that the file
//! doesn't know yet, the caller's default text is returned and written into
//! the file so translators can find it. In a packaged (read-only) distribution
//! nothing is ever written; missing keys just fall back to the default.
//!
//! Loading never fails. An unreadable or malformed file is logged and
//! treated as an empty table.

use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Whether newly seen keys may be written back to the language file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleMode {
    Writable,
    /// Bundled resources can't be rewritten
    ReadOnly,
}

/// Lifecycle of the language file backing a localizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleState {
    /// No language file exists yet; lookups return caller defaults
    Fresh,
    /// The language file exists and was parsed (or is at least readable)
    Loaded,
}

#[derive(Debug)]
struct LocaleTable {
    state: LocaleState,
    texts: BTreeMap<String, String>,
}

/// Key → string lookup for one language
#[derive(Debug)]
pub struct Localizer {
    language: String,
    lang_file: PathBuf,
    mode: LocaleMode,
    table: Mutex<LocaleTable>,
}

impl Localizer {
    /// Language used when the configured code can't name a file
    pub const FALLBACK_LANGUAGE: &'static str = "en";

    /// Create a localizer for `language`, loading its file from `locales_dir`
    pub fn new<P: AsRef<Path>>(locales_dir: P, language: &str, mode: LocaleMode) -> Self {
        let locales_dir = locales_dir.as_ref();
        let language = Self::sanitize_language(language);
        let lang_file = locales_dir.join(format!("lang_{}.json", language));

        if mode == LocaleMode::Writable && !locales_dir.exists() {
            match fs::create_dir_all(locales_dir) {
                Ok(()) => info!("Created locales directory: {}", locales_dir.display()),
                Err(e) => warn!(
                    "Failed to create locales directory {}: {}",
                    locales_dir.display(),
                    e
                ),
            }
        }

        let table = Self::load_table(&lang_file);
        info!(
            "Localizer for '{}' is {:?} with {} entries ({:?})",
            language,
            table.state,
            table.texts.len(),
            mode
        );

        Self {
            language,
            lang_file,
            mode,
            table: Mutex::new(table),
        }
    }

    /// Language code this localizer serves
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Path of the backing language file
    pub fn lang_file(&self) -> &Path {
        &self.lang_file
    }

    pub fn mode(&self) -> LocaleMode {
        self.mode
    }

    pub fn state(&self) -> LocaleState {
        self.lock_table().state
    }

    /// Look up `key`, falling back to `default` and remembering it
    pub fn text(&self, key: &str, default: &str) -> String {
        let mut table = self.lock_table();

        if let Some(value) = table.texts.get(key) {
            return value.clone();
        }

        debug!("Localization key '{}' missing, using default", key);
        table.texts.insert(key.to_string(), default.to_string());

        if self.mode == LocaleMode::Writable {
            match self.persist(&table.texts) {
                Ok(()) => table.state = LocaleState::Loaded,
                Err(e) => warn!(
                    "Failed to save localization key '{}' to {}: {}",
                    key,
                    self.lang_file.display(),
                    e
                ),
            }
        }

        default.to_string()
    }

    /// Look up a template and fill its `{}` placeholders in order
    pub fn format(&self, key: &str, default: &str, args: &[&dyn fmt::Display]) -> String {
        fill_placeholders(&self.text(key, default), args)
    }

    fn lock_table(&self) -> std::sync::MutexGuard<'_, LocaleTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load_table(lang_file: &Path) -> LocaleTable {
        if !lang_file.exists() {
            return LocaleTable {
                state: LocaleState::Fresh,
                texts: BTreeMap::new(),
            };
        }

        let texts = match Self::read_texts(lang_file) {
            Ok(texts) => texts,
            Err(e) => {
                warn!(
                    "Failed to load language file {}: {}",
                    lang_file.display(),
                    e
                );
                BTreeMap::new()
            }
        };

        LocaleTable {
            state: LocaleState::Loaded,
            texts,
        }
    }

    fn read_texts(lang_file: &Path) -> anyhow::Result<BTreeMap<String, String>> {
        let content = fs::read_to_string(lang_file)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn persist(&self, texts: &BTreeMap<String, String>) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(texts)?;

        // Write to a temp file, then rename over the language file
        let temp_path = self.lang_file.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &self.lang_file)?;
        debug!("Saved {} keys to {}", texts.len(), self.lang_file.display());
        Ok(())
    }

    /// Keep only characters that are safe in a file name
    fn sanitize_language(language: &str) -> String {
        let code = language.trim();
        let valid = !code.is_empty()
            && code
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if valid {
            code.to_string()
        } else {
            warn!(
                "Invalid language code '{}', using '{}'",
                language,
                Self::FALLBACK_LANGUAGE
            );
            Self::FALLBACK_LANGUAGE.to_string()
        }
    }
}

/// Replace each `{}` with the next argument; extra placeholders stay literal
pub fn fill_placeholders(template: &str, args: &[&dyn fmt::Display]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut rest = template;

    while let Some(pos) = rest.find("{}") {
        output.push_str(&rest[..pos]);
        match args.next() {
            Some(arg) => {
                let _ = write!(output, "{}", arg);
            }
            None => output.push_str("{}"),
        }
        rest = &rest[pos + 2..];
    }
    output.push_str(rest);

    output
}
