//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract the book service depends on.
//! - Own transaction scoping so services never issue `BEGIN`/`COMMIT`.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Read-write scopes commit only when the unit of work succeeds.

pub mod book_repo;
