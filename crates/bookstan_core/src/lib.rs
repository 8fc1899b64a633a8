//! Core validation and persistence logic for the Bookstan book catalog.
//! This crate is the single source of truth for book invariants.

pub mod config;
pub mod db;
pub mod error_body;
pub mod logging;
pub mod mapper;
pub mod model;
pub mod paging;
pub mod repo;
pub mod service;
pub mod validation;

pub use config::{ConfigError, CoreConfig};
pub use error_body::ErrorBody;
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::book::{Book, BookId, BookRequest, BookResponse};
pub use paging::{BookSortField, Page, PageRequest, SortDirection, SortOrder, SortParseError};
pub use repo::book_repo::{
    BookRepository, BookStore, RepoError, RepoResult, SqliteBookRepository, SqliteBookStore,
    TxMode,
};
pub use service::book_service::{BookService, BookServiceError, ServiceResult};
pub use validation::{validate, Violation};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
