/// Test utilities module for automatic cleanup and consistent test infrastructure
///
/// This module provides RAII-based cleanup that guarantees test data is removed
/// even if tests panic or fail.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use super::traits::MessageStorage;
use crate::backend::open_storage;
use shared::StorageKind;

/// RAII Test Environment that automatically cleans up on drop
///
/// The temporary directory lives exactly as long as this struct, so every
/// file a test writes disappears when the environment goes out of scope.
pub struct TestEnvironment {
    /// The temporary directory - kept alive to prevent auto-cleanup until drop
    _temp_dir: TempDir,
    /// Base directory path for manual inspection if needed
    pub base_path: PathBuf,
}

impl TestEnvironment {
    /// Create a new test environment with automatic cleanup
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::with_prefix("guestbook_test_")?;
        let base_path = temp_dir.path().to_path_buf();

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            base_path,
        })
    }

    /// Get the base directory path for this test environment
    pub fn base_directory(&self) -> &Path {
        &self.base_path
    }

    /// Path of a file inside the test environment
    pub fn data_file(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }
}

impl Drop for TestEnvironment {
    fn drop(&mut self) {
        if std::env::var("GUESTBOOK_DEBUG_TESTS").is_ok() {
            println!("Cleaning up test environment: {:?}", self.base_path);
        }
    }
}

/// Repository Test Helper with automatic cleanup
///
/// Builds a repository of the requested kind on top of a fresh environment
pub struct RepositoryTestHelper {
    pub env: TestEnvironment,
    pub storage: Arc<dyn MessageStorage>,
}

impl RepositoryTestHelper {
    /// Create a helper backed by the given storage kind
    pub async fn new(kind: StorageKind) -> Result<Self> {
        let env = TestEnvironment::new()?;
        let path = env.data_file(kind.data_file_name());

        let storage = open_storage(kind, &path).await?;

        Ok(RepositoryTestHelper { env, storage })
    }

    /// Store several messages in order
    pub async fn seed(&self, texts: &[&str]) -> Result<()> {
        for text in texts {
            self.storage.store_message(text).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_cleanup() -> Result<()> {
        let base_path;

        {
            let env = TestEnvironment::new()?;
            base_path = env.base_directory().to_path_buf();
            assert!(base_path.exists());

            std::fs::write(env.data_file("test_file.txt"), "test data")?;
            assert!(env.data_file("test_file.txt").exists());
        } // env goes out of scope here, triggering cleanup

        assert!(!base_path.exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_repository_helper_for_both_backends() -> Result<()> {
        for kind in [StorageKind::Json, StorageKind::Sqlite] {
            let helper = RepositoryTestHelper::new(kind).await?;
            helper.seed(&["one", "two"]).await?;

            let messages = helper.storage.list_messages().await?;
            assert_eq!(messages.len(), 2, "backend {:?}", kind);
        }
        Ok(())
    }
}
