use log::{info, warn};
use shared::Settings;

/// Service guarding administrator-only operations with the configured password
#[derive(Clone)]
pub struct AdminService {
    password: String,
}

impl AdminService {
    /// Create a new AdminService using the password from settings
    pub fn new(settings: &Settings) -> Self {
        Self::with_password(settings.password.clone())
    }

    /// Create a new AdminService with an explicit password (for testing)
    pub fn with_password(password: String) -> Self {
        Self { password }
    }

    /// Compare an attempt against the configured password
    ///
    /// Plaintext, exact comparison: no trimming, case-sensitive.
    pub fn verify_password(&self, attempt: &str) -> bool {
        info!("Validating admin password (length: {})", attempt.len());

        let is_correct = attempt == self.password;
        if is_correct {
            info!("Admin password accepted");
        } else {
            warn!("Admin password rejected");
        }

        is_correct
    }
}
