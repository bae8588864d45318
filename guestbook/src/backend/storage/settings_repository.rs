//! # Settings Repository
//!
//! INI-backed application settings stored in `config.conf` next to the data.
//!
//! ## File Format
//!
//! ```ini
//! [SETTINGS]
//! password=1234
//! theme=dark
//! language=en
//! ```
//!
//! The file is created with defaults on first run and only read afterwards.

use anyhow::{Context, Result};
use ini::{EscapePolicy, Ini, ParseOption, WriteOption};
use log::{debug, info, warn};
use shared::{Settings, Theme};
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_SECTION: &str = "SETTINGS";
const PASSWORD_KEY: &str = "password";
// Older installs wrote the password under this key
const LEGACY_PASSWORD_KEY: &str = "admin_password";
const THEME_KEY: &str = "theme";
const LANGUAGE_KEY: &str = "language";

/// Values are taken literally: no quote stripping, no backslash escapes
fn parse_options() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    }
}

fn write_options() -> WriteOption {
    WriteOption {
        escape_policy: EscapePolicy::Nothing,
        ..WriteOption::default()
    }
}

/// Repository for the INI settings file
#[derive(Clone, Debug)]
pub struct SettingsRepository {
    config_path: PathBuf,
}

impl SettingsRepository {
    /// Create a new settings repository for a config file path
    pub fn new<P: AsRef<Path>>(config_path: P) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
        }
    }

    /// Path of the config file
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load settings from file, creating the default file if it doesn't exist
    pub fn load_or_create(&self) -> Result<Settings> {
        if self.config_path.exists() {
            let settings = self.load()?;
            debug!("Loaded settings from {:?}", self.config_path);
            Ok(settings)
        } else {
            let settings = Settings::default();
            self.save(&settings)?;
            info!("Created default settings at {:?}", self.config_path);
            Ok(settings)
        }
    }

    /// Read the settings file; missing keys fall back to defaults
    fn load(&self) -> Result<Settings> {
        let conf = Ini::load_from_file_opt(&self.config_path, parse_options())
            .with_context(|| format!("Failed to read settings {}", self.config_path.display()))?;
        let defaults = Settings::default();

        let Some(section) = conf.section(Some(SETTINGS_SECTION)) else {
            warn!(
                "No [{}] section in {:?}, using defaults",
                SETTINGS_SECTION, self.config_path
            );
            return Ok(defaults);
        };

        let password = section
            .get(PASSWORD_KEY)
            .or_else(|| section.get(LEGACY_PASSWORD_KEY))
            .map(str::to_string)
            .unwrap_or(defaults.password);

        let theme = match section.get(THEME_KEY) {
            Some(raw) => raw.parse::<Theme>().unwrap_or_else(|e| {
                warn!("{}; falling back to {}", e, defaults.theme);
                defaults.theme
            }),
            None => defaults.theme,
        };

        let language = section
            .get(LANGUAGE_KEY)
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .unwrap_or(defaults.language);

        Ok(Settings {
            password,
            theme,
            language,
        })
    }

    /// Write settings to file
    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut conf = Ini::new();
        conf.with_section(Some(SETTINGS_SECTION))
            .set(PASSWORD_KEY, settings.password.as_str())
            .set(THEME_KEY, settings.theme.as_str())
            .set(LANGUAGE_KEY, settings.language.as_str());

        let mut buffer = Vec::new();
        conf.write_to_opt(&mut buffer, write_options())?;

        // Use atomic write pattern: write to temp file, then rename
        let temp_path = self.config_path.with_extension("tmp");
        fs::write(&temp_path, buffer)?;
        fs::rename(&temp_path, &self.config_path)
            .with_context(|| format!("Failed to write settings {}", self.config_path.display()))?;

        debug!("Saved settings to {:?}", self.config_path);
        Ok(())
    }
}
