//! Book record plus the payload and response shapes exchanged with callers.
//!
//! # Invariants
//! - `Book::id` is `None` only before the first save.
//! - `BookRequest` has no id field, so callers cannot choose or change ids.
//! - `BookResponse` is only built from saved records and always has an id.
//! - Every `BookRequest` field is optional at the type level; required-ness
//!   is enforced by `validation`, which reports all missing fields at once.

use serde::{Deserialize, Serialize};

/// Store-assigned book identifier (SQLite `INTEGER PRIMARY KEY`).
pub type BookId = i64;

/// Book row as persisted in the `books` table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Book {
    /// Assigned by the store on first save, never mutated afterwards.
    pub id: Option<BookId>,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub publication_year: Option<i32>,
    /// Unique at the store level only.
    pub isbn: Option<String>,
}

/// Create/update payload supplied by callers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub isbn: Option<String>,
}

impl BookRequest {
    /// Builds a payload with the required fields set and optional ones empty.
    pub fn new(title: impl Into<String>, author: impl Into<String>, publication_year: i32) -> Self {
        Self {
            title: Some(title.into()),
            author: Some(author.into()),
            genre: None,
            publication_year: Some(publication_year),
            isbn: None,
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }
}

/// Book representation returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub publication_year: Option<i32>,
    pub isbn: Option<String>,
}
