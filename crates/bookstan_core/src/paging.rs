//! Page requests, sort orders and page envelopes for book listing.
//!
//! # Invariants
//! - Sort fields are a closed whitelist mapped to fixed column names, so
//!   caller input never reaches SQL text.
//! - `page_size` is always in `1..=MAX_PAGE_SIZE` after normalization.
//! - `total_pages == ceil(total_elements / page_size)`.

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 2000;

/// Normalizes a requested page size.
///
/// - `0` falls back to `DEFAULT_PAGE_SIZE`.
/// - Values above `MAX_PAGE_SIZE` are clamped.
pub fn normalize_page_size(size: u32) -> u32 {
    match size {
        0 => DEFAULT_PAGE_SIZE,
        value if value > MAX_PAGE_SIZE => MAX_PAGE_SIZE,
        value => value,
    }
}

/// Sortable book attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSortField {
    Id,
    Title,
    Author,
    Genre,
    PublicationYear,
    Isbn,
}

impl BookSortField {
    /// Column name in the `books` table.
    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Author => "author",
            Self::Genre => "genre",
            Self::PublicationYear => "publication_year",
            Self::Isbn => "isbn",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One `field[,direction]` sort term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: BookSortField,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn asc(field: BookSortField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: BookSortField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

/// Rejected sort expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortParseError {
    UnknownField(String),
    UnknownDirection(String),
}

impl Display for SortParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownField(value) => write!(f, "unknown sort field `{value}`"),
            Self::UnknownDirection(value) => {
                write!(f, "unknown sort direction `{value}`; expected asc|desc")
            }
        }
    }
}

impl Error for SortParseError {}

impl FromStr for SortOrder {
    type Err = SortParseError;

    /// Parses `title`, `title,asc` or `publicationYear,DESC`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (field_text, direction_text) = match value.split_once(',') {
            Some((field, direction)) => (field.trim(), Some(direction.trim())),
            None => (value.trim(), None),
        };

        let field = match field_text {
            "id" => BookSortField::Id,
            "title" => BookSortField::Title,
            "author" => BookSortField::Author,
            "genre" => BookSortField::Genre,
            "publicationYear" => BookSortField::PublicationYear,
            "isbn" => BookSortField::Isbn,
            other => return Err(SortParseError::UnknownField(other.to_string())),
        };

        let direction = match direction_text.map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(other) => return Err(SortParseError::UnknownDirection(other.to_string())),
        };

        Ok(Self { field, direction })
    }
}

/// Zero-based page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Vec<SortOrder>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Vec::new(),
        }
    }
}

impl PageRequest {
    pub fn of(page: u32, size: u32) -> Self {
        Self {
            page,
            size: normalize_page_size(size),
            sort: Vec::new(),
        }
    }

    pub fn sorted_by(mut self, order: SortOrder) -> Self {
        self.sort.push(order);
        self
    }

    /// Effective page size after normalization.
    pub fn page_size(&self) -> u32 {
        normalize_page_size(self.size)
    }

    /// Row offset of the first element on this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.page_size())
    }
}

/// Slice of an ordered result set plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub page_number: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Builds a page and derives `total_pages` from the totals.
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let page_size = request.page_size();
        let total_pages = total_elements.div_ceil(u64::from(page_size));
        Self {
            content,
            total_elements,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
            page_number: request.page,
            page_size,
        }
    }

    /// Maps the content, keeping every metadata field verbatim.
    ///
    /// Stops at the first element `f` rejects.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            content: self.content.into_iter().map(f).collect::<Result<_, _>>()?,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            page_number: self.page_number,
            page_size: self.page_size,
        })
    }

    pub fn is_last(&self) -> bool {
        self.page_number.saturating_add(1) >= self.total_pages
    }
}
