//! # Domain Module
//!
//! Contains the guestbook's behavior, independent of any UI or storage backend.
//!
//! ## Module Organization
//!
//! - **daemon**: the [`BackendDaemon`] that performs message operations and
//!   reports localized status strings
//! - **localizer**: key → display string lookup with lazy growth of the
//!   language file
//! - **admin_service**: password check guarding destructive operations
//! - **models**: validation rules for message input
//!
//! ## Business Rules
//!
//! - Messages must have non-blank text
//! - Identifiers are assigned by storage and never reused until a clear
//! - Clearing from the kiosk UI requires the administrator password

pub mod admin_service;
pub mod daemon;
pub mod localizer;
pub mod models;

pub use admin_service::AdminService;
pub use daemon::{BackendDaemon, ClearResult};
pub use localizer::{LocaleMode, LocaleState, Localizer};
pub use models::*;
