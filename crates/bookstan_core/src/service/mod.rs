//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, mapping and repository calls into use-case
//!   level APIs.
//! - Keep transport layers decoupled from storage details.

pub mod book_service;
