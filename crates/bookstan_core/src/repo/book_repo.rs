//! Book repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide save/find/exists/delete APIs over the `books` table.
//! - Provide scoped transactions (`BookStore`) around one unit of work.
//!
//! # Invariants
//! - `save` inserts when `id` is `None` and returns the store-assigned id.
//! - `save` with an id rewrites every column of that row.
//! - Paged listing always tie-breaks on `id ASC`.
//! - Store-level constraint failures surface as `RepoError::Db`.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::book::{Book, BookId};
use crate::paging::{Page, PageRequest};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    author,
    genre,
    publication_year,
    isbn
FROM books";

const BOOK_COLUMNS: &[&str] = &[
    "id",
    "title",
    "author",
    "genre",
    "publication_year",
    "isbn",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for book persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error, including constraint violations.
    Db(DbError),
    /// Target row does not exist.
    NotFound(BookId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// A record handed back by the store carries no id.
    UnsavedRecord,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "book not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "book repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "book repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "book repository requires column `{column}` in table `{table}`"
            ),
            Self::UnsavedRecord => write!(f, "book record has no store-assigned id"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
            Self::UnsavedRecord => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for book CRUD operations.
pub trait BookRepository {
    /// Inserts (no id) or fully rewrites (with id) one book.
    fn save(&self, book: &Book) -> RepoResult<Book>;
    fn find_by_id(&self, id: BookId) -> RepoResult<Option<Book>>;
    /// Returns every book ordered by id.
    fn find_all(&self) -> RepoResult<Vec<Book>>;
    fn find_page(&self, request: &PageRequest) -> RepoResult<Page<Book>>;
    fn exists_by_id(&self, id: BookId) -> RepoResult<bool>;
    /// Deletes one book. Returns `NotFound` when no row matched.
    fn delete_by_id(&self, id: BookId) -> RepoResult<()>;
}

/// Transaction mode for one unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxMode {
    /// Plain reads, no write lock taken.
    ReadOnly,
    /// `BEGIN IMMEDIATE`; commit on success, rollback on failure.
    ReadWrite,
}

impl TxMode {
    fn label(self) -> &'static str {
        match self {
            Self::ReadOnly => "read_only",
            Self::ReadWrite => "read_write",
        }
    }
}

/// Source of scoped repository access.
///
/// Each service operation runs its whole repository interaction inside one
/// `with_transaction` call.
pub trait BookStore {
    fn with_transaction<T, E, F>(&self, mode: TxMode, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn BookRepository) -> Result<T, E>,
        E: From<RepoError>;
}

/// SQLite-backed book repository bound to one connection or transaction.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Wraps a connection without schema checks.
    ///
    /// Prefer `SqliteBookStore::try_new` for connections of unknown origin.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn save(&self, book: &Book) -> RepoResult<Book> {
        let Some(id) = book.id else {
            self.conn.execute(
                "INSERT INTO books (
                    title,
                    author,
                    genre,
                    publication_year,
                    isbn
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    book.title.as_str(),
                    book.author.as_str(),
                    book.genre.as_deref(),
                    book.publication_year,
                    book.isbn.as_deref(),
                ],
            )?;

            let mut saved = book.clone();
            saved.id = Some(self.conn.last_insert_rowid());
            return Ok(saved);
        };

        let changed = self.conn.execute(
            "UPDATE books
             SET
                title = ?1,
                author = ?2,
                genre = ?3,
                publication_year = ?4,
                isbn = ?5
             WHERE id = ?6;",
            params![
                book.title.as_str(),
                book.author.as_str(),
                book.genre.as_deref(),
                book.publication_year,
                book.isbn.as_deref(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(book.clone())
    }

    fn find_by_id(&self, id: BookId) -> RepoResult<Option<Book>> {
        let book = self
            .conn
            .query_row(
                &format!("{BOOK_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_book_row,
            )
            .optional()?;
        Ok(book)
    }

    fn find_all(&self) -> RepoResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} ORDER BY id ASC;"))?;
        let books = stmt
            .query_map([], parse_book_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }

    fn find_page(&self, request: &PageRequest) -> RepoResult<Page<Book>> {
        let total_elements: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM books;", [], |row| row.get(0))?;

        let mut sql = format!("{BOOK_SELECT_SQL} ORDER BY ");
        for order in &request.sort {
            sql.push_str(order.field.column());
            sql.push(' ');
            sql.push_str(order.direction.keyword());
            sql.push_str(", ");
        }
        sql.push_str("id ASC LIMIT ?1 OFFSET ?2;");

        let limit = i64::from(request.page_size());
        let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);
        let mut stmt = self.conn.prepare(&sql)?;
        let content = stmt
            .query_map(params![limit, offset], parse_book_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(
            content,
            request,
            u64::try_from(total_elements).unwrap_or_default(),
        ))
    }

    fn exists_by_id(&self, id: BookId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM books WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn delete_by_id(&self, id: BookId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM books WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

/// SQLite `BookStore` over one migrated connection.
pub struct SqliteBookStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookStore<'conn> {
    /// Constructs a store after checking the connection schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_book_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl BookStore for SqliteBookStore<'_> {
    fn with_transaction<T, E, F>(&self, mode: TxMode, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn BookRepository) -> Result<T, E>,
        E: From<RepoError>,
    {
        if mode == TxMode::ReadOnly {
            return work(&SqliteBookRepository::new(self.conn));
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)
            .map_err(RepoError::from)?;
        debug!("event=tx_begin module=repo mode={}", mode.label());

        let outcome = work(&SqliteBookRepository::new(&tx));
        match outcome {
            Ok(value) => {
                tx.commit().map_err(RepoError::from)?;
                debug!("event=tx_commit module=repo mode={}", mode.label());
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!(
                        "event=tx_rollback module=repo status=error mode={} error={}",
                        mode.label(),
                        rollback_err
                    );
                } else {
                    debug!("event=tx_rollback module=repo status=ok mode={}", mode.label());
                }
                Err(err)
            }
        }
    }
}

fn parse_book_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: Some(row.get("id")?),
        title: row.get("title")?,
        author: row.get("author")?,
        genre: row.get("genre")?,
        publication_year: row.get("publication_year")?,
        isbn: row.get("isbn")?,
    })
}

fn ensure_book_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "books")? {
        return Err(RepoError::MissingRequiredTable("books"));
    }

    for &column in BOOK_COLUMNS {
        if !table_has_column(conn, "books", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "books",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
