//! Book use-case service.
//!
//! # Responsibility
//! - Validate payloads, map them to records and drive repository calls.
//! - Own not-found semantics for id-addressed operations.
//!
//! # Invariants
//! - Invalid payloads are rejected before any repository call.
//! - `update` validates before looking the record up.
//! - The id of an updated record always comes from the stored row.
//! - Each operation runs inside exactly one `BookStore` transaction scope:
//!   read-only for reads, read-write for mutations.
//! - The service neither logs nor swallows failures.

use crate::mapper::{apply_request, to_record, to_response};
use crate::model::book::{Book, BookId, BookRequest, BookResponse};
use crate::paging::{Page, PageRequest};
use crate::repo::book_repo::{BookStore, RepoError, TxMode};
use crate::validation::{validate, Violation};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, BookServiceError>;

/// Failure taxonomy surfaced to service callers.
#[derive(Debug)]
pub enum BookServiceError {
    /// Payload broke one or more field rules. Holds every violation.
    Validation(Vec<Violation>),
    /// No book exists with this id.
    NotFound(BookId),
    /// Any other storage-level failure, including constraint violations.
    Unexpected(RepoError),
}

impl BookServiceError {
    /// Field-prefixed messages for validation failures, empty otherwise.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Validation(violations) => violations.iter().map(ToString::to_string).collect(),
            _ => Vec::new(),
        }
    }
}

impl Display for BookServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(violations) => {
                write!(f, "validation failed: ")?;
                for (index, violation) in violations.iter().enumerate() {
                    if index > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{violation}")?;
                }
                Ok(())
            }
            Self::NotFound(id) => write!(f, "Book not found with ID: {id}"),
            Self::Unexpected(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BookServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unexpected(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for BookServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Unexpected(other),
        }
    }
}

/// Book service facade over a transactional store.
pub struct BookService<S: BookStore> {
    store: S,
}

impl<S: BookStore> BookService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validates and persists a new book, returning it with its assigned id.
    pub fn create(&self, request: &BookRequest) -> ServiceResult<BookResponse> {
        ensure_valid(request)?;
        let record = to_record(request);
        self.store
            .with_transaction(TxMode::ReadWrite, |repo| -> ServiceResult<_> {
                let saved = repo.save(&record)?;
                respond(&saved)
            })
    }

    /// Lists every book in id order.
    pub fn list(&self) -> ServiceResult<Vec<BookResponse>> {
        self.store
            .with_transaction(TxMode::ReadOnly, |repo| -> ServiceResult<_> {
                repo.find_all()?.iter().map(respond).collect()
            })
    }

    /// Lists one page of books; pagination metadata is passed through as-is.
    pub fn list_page(&self, request: &PageRequest) -> ServiceResult<Page<BookResponse>> {
        self.store
            .with_transaction(TxMode::ReadOnly, |repo| -> ServiceResult<_> {
                repo.find_page(request)?.try_map(|book| respond(&book))
            })
    }

    pub fn get_by_id(&self, id: BookId) -> ServiceResult<BookResponse> {
        self.store
            .with_transaction(TxMode::ReadOnly, |repo| -> ServiceResult<_> {
                let book = repo
                    .find_by_id(id)?
                    .ok_or(BookServiceError::NotFound(id))?;
                respond(&book)
            })
    }

    /// Fully replaces every non-id field of an existing book.
    ///
    /// # Contract
    /// - Validation failures win over not-found: the lookup is skipped.
    /// - Absent optional payload fields are stored as `NULL`.
    pub fn update(&self, id: BookId, request: &BookRequest) -> ServiceResult<BookResponse> {
        ensure_valid(request)?;
        self.store
            .with_transaction(TxMode::ReadWrite, |repo| -> ServiceResult<_> {
                let mut book = repo
                    .find_by_id(id)?
                    .ok_or(BookServiceError::NotFound(id))?;
                apply_request(&mut book, request);
                let saved = repo.save(&book)?;
                respond(&saved)
            })
    }

    pub fn delete(&self, id: BookId) -> ServiceResult<()> {
        self.store
            .with_transaction(TxMode::ReadWrite, |repo| -> ServiceResult<_> {
                if !repo.exists_by_id(id)? {
                    return Err(BookServiceError::NotFound(id));
                }
                repo.delete_by_id(id)?;
                Ok(())
            })
    }
}

fn respond(book: &Book) -> ServiceResult<BookResponse> {
    to_response(book).ok_or(BookServiceError::Unexpected(RepoError::UnsavedRecord))
}

fn ensure_valid(request: &BookRequest) -> ServiceResult<()> {
    let violations = validate(request);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(BookServiceError::Validation(violations))
    }
}
