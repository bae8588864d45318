//! # Backend Daemon
//!
//! The daemon sits between UI events and storage. It owns exactly one
//! [`MessageStorage`] (chosen at construction) and one [`Localizer`], performs
//! the requested operation and turns the outcome into a localized status
//! string the UI can show as-is.
//!
//! ## Status messages
//!
//! | Operation | Key | Default |
//! |---|---|---|
//! | add | `saved_msg` | `Saved ({}): {}` |
//! | add/update with blank text | `empty_field_label` | `The field is empty!` |
//! | fetch | `found_msg` | `Fetched content: {}` |
//! | update | `update_success_msg` | `Message {} is updated.` |
//! | remove | `line_msg` | `line {} has been removed` |
//! | clear | `db_cleared_msg` | `Database cleared.` |
//! | clear, wrong password | `wrong_password_msg` | `Wrong password` |

use anyhow::Result;
use log::{error, info, warn};
use shared::Message;
use std::sync::Arc;

use super::admin_service::AdminService;
use super::localizer::Localizer;
use super::models::validate_message_text;
use crate::backend::storage::MessageStorage;

/// Outcome of a password-gated clear
#[derive(Debug, Clone, PartialEq)]
pub struct ClearResult {
    /// Whether the password matched and the data was cleared
    pub success: bool,
    pub message: String,
}

/// Mediates between UI actions and the selected storage backend
#[derive(Clone)]
pub struct BackendDaemon {
    storage: Arc<dyn MessageStorage>,
    localizer: Arc<Localizer>,
    admin_service: AdminService,
}

impl BackendDaemon {
    pub fn new(
        storage: Arc<dyn MessageStorage>,
        localizer: Arc<Localizer>,
        admin_service: AdminService,
    ) -> Self {
        info!("Daemon using {} storage", storage.backend_name());
        Self {
            storage,
            localizer,
            admin_service,
        }
    }

    /// Type name of the active storage backend
    pub fn backend_name(&self) -> &'static str {
        self.storage.backend_name()
    }

    /// Localizer shared with the UI layer
    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    /// Save a new message
    pub async fn add(&self, text: &str) -> Result<String> {
        if let Err(e) = validate_message_text(text) {
            warn!("Rejected new message: {}", e);
            return Ok(self.empty_field_message());
        }

        let message = self.storage.store_message(text).await?;
        info!("Added message {} via {}", message.id, self.backend_name());

        Ok(self.localizer.format(
            "saved_msg",
            "Saved ({}): {}",
            &[&self.backend_name(), &text],
        ))
    }

    /// Describe a single message, or `None` if it doesn't exist
    pub async fn fetch_one(&self, id: i64) -> Result<Option<String>> {
        info!("Fetching message {}", id);
        let message = self.storage.get_message(id).await?;

        if message.is_none() {
            warn!("Message not found: {}", id);
        }
        Ok(message.map(|m| self.found_message(&m)))
    }

    /// Describe the most recently added message, or `None` if there are none
    pub async fn fetch_latest(&self) -> Result<Option<String>> {
        info!("Fetching latest message");
        let message = self.storage.get_latest_message().await?;
        Ok(message.map(|m| self.found_message(&m)))
    }

    /// Messages to display: everything for an empty term, otherwise matches
    ///
    /// A storage read failure is logged and shown as an empty list.
    pub async fn query(&self, term: Option<&str>) -> Vec<Message> {
        let result = match term {
            Some(term) if !term.is_empty() => {
                info!("Searching messages for '{}'", term);
                self.storage.search_messages(term).await
            }
            _ => {
                info!("Listing all messages");
                self.storage.list_messages().await
            }
        };

        match result {
            Ok(messages) => {
                info!("Query returned {} messages", messages.len());
                messages
            }
            Err(e) => {
                error!("Failed to read messages from {}: {:#}", self.backend_name(), e);
                Vec::new()
            }
        }
    }

    /// Replace the text of an existing message
    pub async fn update(&self, id: i64, text: &str) -> Result<String> {
        if let Err(e) = validate_message_text(text) {
            warn!("Rejected update of message {}: {}", id, e);
            return Ok(self.empty_field_message());
        }

        if self.storage.update_message(id, text).await? {
            info!("Updated message {}", id);
        } else {
            warn!("Update of message {} matched nothing", id);
        }

        Ok(self
            .localizer
            .format("update_success_msg", "Message {} is updated.", &[&id]))
    }

    /// Delete a single message
    pub async fn remove(&self, id: i64) -> Result<String> {
        if self.storage.delete_message(id).await? {
            info!("Removed message {}", id);
        } else {
            warn!("Removal of message {} matched nothing", id);
        }

        Ok(self
            .localizer
            .format("line_msg", "line {} has been removed", &[&id]))
    }

    /// Delete every message and restart numbering
    pub async fn clear(&self) -> Result<String> {
        self.storage.clear_messages().await?;
        info!("Cleared all messages via {}", self.backend_name());

        Ok(self.localizer.text("db_cleared_msg", "Database cleared."))
    }

    /// Clear everything, but only with the administrator password
    pub async fn clear_with_password(&self, attempt: &str) -> Result<ClearResult> {
        if !self.admin_service.verify_password(attempt) {
            return Ok(ClearResult {
                success: false,
                message: self.localizer.text("wrong_password_msg", "Wrong password"),
            });
        }

        let message = self.clear().await?;
        Ok(ClearResult {
            success: true,
            message,
        })
    }

    fn found_message(&self, message: &Message) -> String {
        self.localizer
            .format("found_msg", "Fetched content: {}", &[&message.text])
    }

    fn empty_field_message(&self) -> String {
        self.localizer
            .text("empty_field_label", "The field is empty!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::localizer::LocaleMode;
    use crate::backend::storage::test_utils::RepositoryTestHelper;
    use shared::StorageKind;
    use std::fs;

    const BACKENDS: [StorageKind; 2] = [StorageKind::Json, StorageKind::Sqlite];

    async fn setup_test(kind: StorageKind) -> (BackendDaemon, RepositoryTestHelper) {
        let helper = RepositoryTestHelper::new(kind)
            .await
            .expect("Failed to create storage");
        let localizer = Arc::new(Localizer::new(
            helper.env.data_file("locales"),
            "en",
            LocaleMode::Writable,
        ));
        let admin_service = AdminService::with_password("1234".to_string());
        let daemon = BackendDaemon::new(helper.storage.clone(), localizer, admin_service);
        (daemon, helper)
    }

    fn summary(messages: &[Message]) -> Vec<(i64, &str)> {
        messages.iter().map(|m| (m.id, m.text.as_str())).collect()
    }

    #[tokio::test]
    async fn test_add_reports_backend_and_text() {
        let (daemon, _helper) = setup_test(StorageKind::Sqlite).await;

        let status = daemon.add("Welcome!").await.unwrap();
        assert_eq!(status, "Saved (SqliteMessageRepository): Welcome!");

        let (daemon, _helper) = setup_test(StorageKind::Json).await;
        let status = daemon.add("Welcome!").await.unwrap();
        assert_eq!(status, "Saved (JsonMessageRepository): Welcome!");
    }

    #[tokio::test]
    async fn test_add_blank_text_saves_nothing() {
        for kind in BACKENDS {
            let (daemon, _helper) = setup_test(kind).await;

            let status = daemon.add("   ").await.unwrap();
            assert_eq!(status, "The field is empty!");
            assert!(daemon.query(None).await.is_empty(), "backend {:?}", kind);
        }
    }

    #[tokio::test]
    async fn test_guestbook_walkthrough_on_both_backends() {
        for kind in BACKENDS {
            let (daemon, _helper) = setup_test(kind).await;

            daemon.add("Welcome!").await.unwrap();
            assert_eq!(summary(&daemon.query(None).await), vec![(1, "Welcome!")]);

            daemon.add("Thanks!").await.unwrap();
            assert_eq!(
                summary(&daemon.query(Some("")).await),
                vec![(1, "Welcome!"), (2, "Thanks!")]
            );

            assert_eq!(summary(&daemon.query(Some("Wel")).await), vec![(1, "Welcome!")]);

            daemon.remove(1).await.unwrap();
            assert_eq!(summary(&daemon.query(None).await), vec![(2, "Thanks!")]);

            daemon.clear().await.unwrap();
            assert!(daemon.query(None).await.is_empty());

            daemon.add("Hi").await.unwrap();
            assert_eq!(summary(&daemon.query(None).await), vec![(1, "Hi")], "backend {:?}", kind);
        }
    }

    #[tokio::test]
    async fn test_fetch_one_and_latest() {
        for kind in BACKENDS {
            let (daemon, _helper) = setup_test(kind).await;
            assert_eq!(daemon.fetch_latest().await.unwrap(), None);

            daemon.add("first").await.unwrap();
            daemon.add("second").await.unwrap();

            assert_eq!(
                daemon.fetch_one(1).await.unwrap().as_deref(),
                Some("Fetched content: first")
            );
            assert_eq!(daemon.fetch_one(9).await.unwrap(), None);
            assert_eq!(
                daemon.fetch_latest().await.unwrap().as_deref(),
                Some("Fetched content: second")
            );
        }
    }

    #[tokio::test]
    async fn test_update_messages() {
        for kind in BACKENDS {
            let (daemon, _helper) = setup_test(kind).await;
            daemon.add("Helo").await.unwrap();

            let status = daemon.update(1, "Hello").await.unwrap();
            assert_eq!(status, "Message 1 is updated.");
            assert_eq!(summary(&daemon.query(None).await), vec![(1, "Hello")]);

            // Missing id: same status, nothing changes
            let status = daemon.update(5, "ghost").await.unwrap();
            assert_eq!(status, "Message 5 is updated.");
            assert_eq!(summary(&daemon.query(None).await), vec![(1, "Hello")]);

            let status = daemon.update(1, "").await.unwrap();
            assert_eq!(status, "The field is empty!");
            assert_eq!(summary(&daemon.query(None).await), vec![(1, "Hello")]);
        }
    }

    #[tokio::test]
    async fn test_remove_missing_message_reports_and_keeps_listing() {
        let (daemon, _helper) = setup_test(StorageKind::Sqlite).await;
        daemon.add("keep").await.unwrap();

        let status = daemon.remove(3).await.unwrap();
        assert_eq!(status, "line 3 has been removed");
        assert_eq!(daemon.query(None).await.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_with_password() {
        for kind in BACKENDS {
            let (daemon, _helper) = setup_test(kind).await;
            daemon.add("Welcome!").await.unwrap();

            let denied = daemon.clear_with_password("wrong").await.unwrap();
            assert!(!denied.success);
            assert_eq!(denied.message, "Wrong password");
            assert_eq!(daemon.query(None).await.len(), 1);

            let granted = daemon.clear_with_password("1234").await.unwrap();
            assert!(granted.success);
            assert_eq!(granted.message, "Database cleared.");
            assert!(daemon.query(None).await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_status_messages_use_translations() {
        let (_, helper) = setup_test(StorageKind::Json).await;
        fs::write(
            helper.env.data_file("locales").join("lang_fi.json"),
            r#"{ "line_msg": "Rivi {} poistettu", "saved_msg": "Tallennettu ({}): {}" }"#,
        )
        .unwrap();
        let localizer = Arc::new(Localizer::new(
            helper.env.data_file("locales"),
            "fi",
            LocaleMode::Writable,
        ));
        let daemon = BackendDaemon::new(
            helper.storage.clone(),
            localizer,
            AdminService::with_password("1234".to_string()),
        );

        assert_eq!(
            daemon.add("Moi").await.unwrap(),
            "Tallennettu (JsonMessageRepository): Moi"
        );
        assert_eq!(daemon.remove(1).await.unwrap(), "Rivi 1 poistettu");
    }

    #[tokio::test]
    async fn test_query_degrades_to_empty_on_malformed_data() {
        let (daemon, helper) = setup_test(StorageKind::Json).await;
        daemon.add("Welcome!").await.unwrap();
        fs::write(helper.env.data_file("data.json"), "[{ truncated").unwrap();

        assert!(daemon.query(None).await.is_empty());
        assert!(daemon.query(Some("Wel")).await.is_empty());
    }
}
