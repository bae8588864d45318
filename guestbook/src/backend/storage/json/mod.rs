//! # JSON Storage Module
//!
//! Flat-file storage: the whole guestbook lives in one JSON document next to
//! the executable.
//!
//! ## Components
//!
//! - **connection.rs** - Document location and atomic whole-file writes
//! - **message_repository.rs** - `MessageStorage` implementation

pub mod connection;
pub mod message_repository;

pub use connection::JsonConnection;
pub use message_repository::JsonMessageRepository;
