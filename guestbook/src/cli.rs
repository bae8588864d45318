//! Command line surface for the guestbook.
//!
//! Each subcommand maps onto one [`BackendDaemon`](crate::backend::BackendDaemon)
//! operation; see `lib.rs` for dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI: global options plus one subcommand.
#[derive(Parser, Debug)]
#[command(name = "digital-guestbook")]
#[command(about = "Kiosk guestbook: leave, browse and manage visitor messages.")]
#[command(version)]
pub struct Cli {
    /// Directory holding config.conf, locales/ and the message store.
    /// Defaults to the directory of the executable.
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Leave a new message.
    Add {
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// List every message in insertion order.
    List,

    /// List messages containing TERM (ignores ASCII case).
    Search {
        #[arg(value_name = "TERM")]
        term: String,
    },

    /// Show one message by id.
    Show { id: i64 },

    /// Show the most recently added message.
    Latest,

    /// Replace the text of a message.
    Edit {
        id: i64,
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// Remove one message.
    Remove { id: i64 },

    /// Remove every message and restart numbering. Requires the admin password.
    Clear {
        #[arg(short, long)]
        password: String,
    },
}
