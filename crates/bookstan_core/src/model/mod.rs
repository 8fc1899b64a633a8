//! Book domain model and its external request/response shapes.
//!
//! # Invariants
//! - A persisted book is identified by a store-assigned `BookId`.
//! - Request payloads never carry an id.

pub mod book;
