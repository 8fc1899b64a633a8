//! Command-line argument definitions.
//!
//! Commands:
//! - bookstan ping
//! - bookstan create --json <payload>
//! - bookstan get <id>
//! - bookstan update <id> --json <payload>
//! - bookstan delete <id>
//! - bookstan list [--page N] [--size N] [--sort field[,dir]]...

use bookstan_core::{BookId, SortOrder};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bookstan - book catalog backed by SQLite
#[derive(Parser, Debug)]
#[command(name = "bookstan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file (overrides BOOKSTAN_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log level (overrides BOOKSTAN_LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Absolute log directory (overrides BOOKSTAN_LOG_DIR)
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print core linkage info
    Ping,

    /// Create a book from a JSON payload
    Create {
        /// Book payload, e.g. '{"title":"1984","author":"George Orwell","publicationYear":1949}'
        #[arg(long)]
        json: String,
    },

    /// Fetch one book
    Get { id: BookId },

    /// Replace every field of an existing book
    Update {
        id: BookId,

        /// Book payload
        #[arg(long)]
        json: String,
    },

    /// Delete one book
    Delete { id: BookId },

    /// List books, optionally paged and sorted
    List {
        /// Zero-based page index
        #[arg(long)]
        page: Option<u32>,

        /// Page size (0 means the configured default)
        #[arg(long)]
        size: Option<u32>,

        /// Sort key `field[,asc|desc]`, repeatable
        #[arg(long, value_parser = parse_sort)]
        sort: Vec<SortOrder>,
    },
}

impl Command {
    /// Resource path reported in error bodies.
    pub fn resource_path(&self) -> String {
        match self {
            Self::Get { id } | Self::Update { id, .. } | Self::Delete { id } => {
                format!("/api/books/{id}")
            }
            Self::Ping | Self::Create { .. } | Self::List { .. } => "/api/books".to_string(),
        }
    }
}

fn parse_sort(value: &str) -> Result<SortOrder, String> {
    value.parse::<SortOrder>().map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use bookstan_core::{BookSortField, SortOrder};
    use clap::Parser;

    #[test]
    fn list_collects_repeated_sorts() {
        let cli = Cli::try_parse_from([
            "bookstan",
            "list",
            "--page",
            "1",
            "--sort",
            "title",
            "--sort",
            "publicationYear,desc",
        ])
        .unwrap();

        match cli.command {
            Command::List { page, size, sort } => {
                assert_eq!(page, Some(1));
                assert_eq!(size, None);
                assert_eq!(
                    sort,
                    vec![
                        SortOrder::asc(BookSortField::Title),
                        SortOrder::desc(BookSortField::PublicationYear),
                    ]
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_sort_field_is_rejected() {
        assert!(Cli::try_parse_from(["bookstan", "list", "--sort", "price"]).is_err());
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["bookstan", "get", "7", "--db", "/tmp/books.db"]).unwrap();
        assert_eq!(cli.db.as_deref(), Some(std::path::Path::new("/tmp/books.db")));
        assert_eq!(cli.command.resource_path(), "/api/books/7");
    }
}
