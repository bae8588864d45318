//! # Backend Module
//!
//! Contains all non-UI logic for the guestbook.
//!
//! This module serves as the orchestration layer that brings together:
//! - **Domain**: the daemon, localization and admin checks
//! - **Storage**: message backends and the settings file
//!
//! The backend is UI-agnostic; the bundled binary drives it from the command
//! line, and a kiosk window could drive it the same way.
//!
//! ## Architecture
//!
//! ```text
//! UI / CLI
//!     ↓
//! Domain Layer (BackendDaemon, Localizer)
//!     ↓
//! Storage Layer (MessageStorage backends, settings)
//! ```
//!
//! ## Files
//!
//! Everything lives under one base directory:
//! - `config.conf`: settings
//! - `locales/lang_<code>.json`: translations
//! - `data.json` or `data.db`: messages, depending on the backend

pub mod domain;
pub mod storage;

use anyhow::Result;
use log::info;
use shared::{Settings, StorageKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use domain::*;
pub use storage::*;

/// Environment variable marking a packaged, read-only distribution
pub const PACKAGED_ENV_VAR: &str = "GUESTBOOK_PACKAGED";

/// Resolves every file location from a single base directory
#[derive(Debug, Clone)]
pub struct AppPaths {
    base_dir: PathBuf,
}

impl AppPaths {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Use the directory containing the running executable
    pub fn from_executable() -> Result<Self> {
        let exe = std::env::current_exe()?;
        let base_dir = exe
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| anyhow::anyhow!("Executable path has no parent: {}", exe.display()))?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.conf")
    }

    pub fn locales_dir(&self) -> PathBuf {
        self.base_dir.join("locales")
    }

    pub fn data_file(&self, kind: StorageKind) -> PathBuf {
        self.base_dir.join(kind.data_file_name())
    }
}

/// How the application was deployed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distribution {
    /// Running from a writable checkout or install
    Source,
    /// Bundled resources are read-only
    Packaged,
}

impl Distribution {
    pub fn detect() -> Self {
        if std::env::var_os(PACKAGED_ENV_VAR).is_some() {
            Distribution::Packaged
        } else {
            Distribution::Source
        }
    }

    pub fn locale_mode(self) -> LocaleMode {
        match self {
            Distribution::Source => LocaleMode::Writable,
            Distribution::Packaged => LocaleMode::ReadOnly,
        }
    }
}

/// Main application state
#[derive(Clone)]
pub struct AppState {
    pub daemon: BackendDaemon,
    pub settings: Settings,
}

/// Open the storage backend of the requested kind
pub async fn open_storage(kind: StorageKind, path: &Path) -> Result<Arc<dyn MessageStorage>> {
    let storage: Arc<dyn MessageStorage> = match kind {
        StorageKind::Json => Arc::new(JsonMessageRepository::new(JsonConnection::new(path)?)),
        StorageKind::Sqlite => Arc::new(SqliteMessageRepository::new(DbConnection::new(path).await?)),
    };
    Ok(storage)
}

/// Initialize the backend with all required services
pub async fn initialize_backend(
    paths: &AppPaths,
    kind: StorageKind,
    distribution: Distribution,
) -> Result<AppState> {
    info!("Loading settings from {}", paths.config_file().display());
    let settings = SettingsRepository::new(paths.config_file()).load_or_create()?;

    info!("Setting up localization ({:?})", distribution);
    let localizer = Arc::new(Localizer::new(
        paths.locales_dir(),
        &settings.language,
        distribution.locale_mode(),
    ));

    info!("Setting up {:?} storage", kind);
    let storage = open_storage(kind, &paths.data_file(kind)).await?;

    info!("Setting up domain model");
    let admin_service = AdminService::new(&settings);
    let daemon = BackendDaemon::new(storage, localizer, admin_service);

    info!("Setting up application state");
    Ok(AppState { daemon, settings })
}
