//! Field-level validation for book payloads.
//!
//! # Responsibility
//! - Hold the complete rule table for `BookRequest` fields.
//! - Evaluate every rule and collect all violations.
//!
//! # Invariants
//! - Rules never short-circuit: two failing rules on one field yield two
//!   violations.
//! - Validation is pure and never touches storage.
//! - Absent optional values pass every rule except the not-blank/not-null
//!   checks of required fields.
//! - Lengths count Unicode scalar values (`chars()`), not UTF-16 code units,
//!   so a character outside the BMP counts once.

use crate::model::book::BookRequest;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt::{Display, Formatter};

pub const TITLE_MIN_CHARS: usize = 2;
pub const TITLE_MAX_CHARS: usize = 100;
pub const AUTHOR_MIN_CHARS: usize = 2;
pub const AUTHOR_MAX_CHARS: usize = 100;
pub const GENRE_MAX_CHARS: usize = 50;
pub const ISBN_MAX_CHARS: usize = 20;
pub const MIN_PUBLICATION_YEAR: i32 = 1000;

// Optional "ISBN"/"ISBN-10"/"ISBN-13" prefix, then 13 or 10 digits (or X),
// each optionally followed by hyphens or spaces.
static ISBN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:ISBN-*(?:1[03])* *(?:: )?)*(?:(?:[0-9Xx][- ]*){13}|(?:[0-9Xx][- ]*){10})$",
    )
    .expect("valid isbn regex")
});

/// One failed field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// External (camelCase) field name.
    pub field: &'static str,
    pub message: &'static str,
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Single entry of the rule table.
#[derive(Clone, Copy)]
pub struct Rule {
    pub field: &'static str,
    pub message: &'static str,
    check: fn(&BookRequest) -> bool,
}

impl Rule {
    /// Returns `true` when `request` satisfies this rule.
    pub fn holds(&self, request: &BookRequest) -> bool {
        (self.check)(request)
    }

    fn violation(&self) -> Violation {
        Violation {
            field: self.field,
            message: self.message,
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("field", &self.field)
            .field("message", &self.message)
            .finish()
    }
}

const RULES: &[Rule] = &[
    Rule {
        field: "title",
        message: "must not be blank",
        check: |request| is_not_blank(request.title.as_deref()),
    },
    Rule {
        field: "title",
        message: "must be between 2 and 100 characters",
        check: |request| {
            length_within(request.title.as_deref(), TITLE_MIN_CHARS, TITLE_MAX_CHARS)
        },
    },
    Rule {
        field: "author",
        message: "must not be blank",
        check: |request| is_not_blank(request.author.as_deref()),
    },
    Rule {
        field: "author",
        message: "must be between 2 and 100 characters",
        check: |request| {
            length_within(request.author.as_deref(), AUTHOR_MIN_CHARS, AUTHOR_MAX_CHARS)
        },
    },
    Rule {
        field: "genre",
        message: "must be at most 50 characters",
        check: |request| length_within(request.genre.as_deref(), 0, GENRE_MAX_CHARS),
    },
    Rule {
        field: "publicationYear",
        message: "must not be null",
        check: |request| request.publication_year.is_some(),
    },
    Rule {
        field: "publicationYear",
        message: "must be a valid year (1000 or later)",
        check: |request| {
            request
                .publication_year
                .map_or(true, |year| year >= MIN_PUBLICATION_YEAR)
        },
    },
    Rule {
        field: "isbn",
        message: "invalid ISBN format",
        check: |request| request.isbn.as_deref().map_or(true, is_isbn),
    },
    Rule {
        field: "isbn",
        message: "must be at most 20 characters",
        check: |request| length_within(request.isbn.as_deref(), 0, ISBN_MAX_CHARS),
    },
];

/// Returns the rule table in evaluation order.
pub fn rules() -> &'static [Rule] {
    RULES
}

/// Evaluates every rule against `request`.
///
/// Returns violations in rule-table order; an empty vector means valid.
pub fn validate(request: &BookRequest) -> Vec<Violation> {
    RULES
        .iter()
        .filter(|rule| !rule.holds(request))
        .map(Rule::violation)
        .collect()
}

/// Returns whether `value` looks like an ISBN-10 or ISBN-13.
pub fn is_isbn(value: &str) -> bool {
    ISBN_RE.is_match(value)
}

fn is_not_blank(value: Option<&str>) -> bool {
    value.is_some_and(|text| !text.trim().is_empty())
}

fn length_within(value: Option<&str>, min: usize, max: usize) -> bool {
    value.map_or(true, |text| {
        let len = text.chars().count();
        (min..=max).contains(&len)
    })
}
