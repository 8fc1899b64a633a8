//! Field-for-field conversion between payload/response shapes and the
//! persisted `Book` record.
//!
//! No validation or computation happens here; callers validate first.

use crate::model::book::{Book, BookRequest, BookResponse};

/// Builds an unsaved record from a payload. `id` stays unset.
///
/// Required text fields missing from the payload map to empty strings; the
/// service never reaches this point with such a payload.
pub fn to_record(request: &BookRequest) -> Book {
    Book {
        id: None,
        title: request.title.clone().unwrap_or_default(),
        author: request.author.clone().unwrap_or_default(),
        genre: request.genre.clone(),
        publication_year: request.publication_year,
        isbn: request.isbn.clone(),
    }
}

/// Overwrites every non-id field of `book` with the payload values.
///
/// Absent optional fields become `None` (full replacement, not a patch).
pub fn apply_request(book: &mut Book, request: &BookRequest) {
    let replacement = to_record(request);
    book.title = replacement.title;
    book.author = replacement.author;
    book.genre = replacement.genre;
    book.publication_year = replacement.publication_year;
    book.isbn = replacement.isbn;
}

/// Builds the caller-facing shape of a saved record.
///
/// Returns `None` for a record that was never saved.
pub fn to_response(book: &Book) -> Option<BookResponse> {
    let id = book.id?;
    Some(BookResponse {
        id,
        title: book.title.clone(),
        author: book.author.clone(),
        genre: book.genre.clone(),
        publication_year: book.publication_year,
        isbn: book.isbn.clone(),
    })
}
