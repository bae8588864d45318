pub mod backend;
pub mod cli;

use anyhow::Result;
use log::info;
use shared::{Message, StorageKind};

use backend::{initialize_backend, AppPaths, AppState, Distribution};
use cli::{Cli, Commands};

/// Render a listing the way the kiosk list box shows it
pub fn format_listing(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("ID: {}  {}", m.id, m.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Perform one CLI command and return the text to print
pub async fn execute(app_state: &AppState, command: Commands) -> Result<String> {
    let daemon = &app_state.daemon;

    let output = match command {
        Commands::Add { text } => daemon.add(&text).await?,
        Commands::List => format_listing(&daemon.query(None).await),
        Commands::Search { term } => format_listing(&daemon.query(Some(&term)).await),
        Commands::Show { id } => daemon
            .fetch_one(id)
            .await?
            .unwrap_or_else(|| format!("No message with id {}", id)),
        Commands::Latest => daemon
            .fetch_latest()
            .await?
            .unwrap_or_else(|| "No messages yet".to_string()),
        Commands::Edit { id, text } => daemon.update(id, &text).await?,
        Commands::Remove { id } => daemon.remove(id).await?,
        Commands::Clear { password } => daemon.clear_with_password(&password).await?.message,
    };

    Ok(output)
}

pub async fn run(cli: Cli) -> Result<()> {
    let paths = match cli.data_dir {
        Some(dir) => AppPaths::new(dir),
        None => AppPaths::from_executable()?,
    };
    info!("Using data directory {}", paths.base_dir().display());

    // The kiosk build always stores messages in SQLite
    let app_state = initialize_backend(&paths, StorageKind::Sqlite, Distribution::detect()).await?;

    let output = execute(&app_state, cli.command).await?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::test_utils::TestEnvironment;

    async fn setup_test_app_state(env: &TestEnvironment) -> AppState {
        let paths = AppPaths::new(env.base_directory());
        initialize_backend(&paths, StorageKind::Sqlite, Distribution::Source)
            .await
            .expect("Failed to initialize backend for test")
    }

    #[tokio::test]
    async fn test_full_flow() {
        let env = TestEnvironment::new().unwrap();
        let app_state = setup_test_app_state(&env).await;

        let out = execute(&app_state, Commands::Add { text: "Welcome!".into() }).await.unwrap();
        assert_eq!(out, "Saved (SqliteMessageRepository): Welcome!");
        execute(&app_state, Commands::Add { text: "Thanks!".into() }).await.unwrap();

        let out = execute(&app_state, Commands::List).await.unwrap();
        assert_eq!(out, "ID: 1  Welcome!\nID: 2  Thanks!");

        let out = execute(&app_state, Commands::Search { term: "Wel".into() }).await.unwrap();
        assert_eq!(out, "ID: 1  Welcome!");

        let out = execute(&app_state, Commands::Latest).await.unwrap();
        assert_eq!(out, "Fetched content: Thanks!");

        let out = execute(&app_state, Commands::Remove { id: 1 }).await.unwrap();
        assert_eq!(out, "line 1 has been removed");

        let out = execute(&app_state, Commands::Show { id: 1 }).await.unwrap();
        assert_eq!(out, "No message with id 1");

        let out = execute(&app_state, Commands::Clear { password: "nope".into() }).await.unwrap();
        assert_eq!(out, "Wrong password");

        let out = execute(&app_state, Commands::Clear { password: "1234".into() }).await.unwrap();
        assert_eq!(out, "Database cleared.");
        assert_eq!(execute(&app_state, Commands::List).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_state_survives_restart() {
        let env = TestEnvironment::new().unwrap();
        {
            let app_state = setup_test_app_state(&env).await;
            execute(&app_state, Commands::Add { text: "Helo".into() }).await.unwrap();
            execute(&app_state, Commands::Edit { id: 1, text: "Hello".into() }).await.unwrap();
        }

        let app_state = setup_test_app_state(&env).await;
        let out = execute(&app_state, Commands::Show { id: 1 }).await.unwrap();
        assert_eq!(out, "Fetched content: Hello");
    }
}
