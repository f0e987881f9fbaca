//! Repository layer for database operations

pub mod authors;
pub mod books;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{error::ErrorKind, Pool, Postgres};
use thiserror::Error;
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use crate::models::{
    author::{Author, AuthorChanges, NewAuthor},
    book::{BookChanges, BookDetails, NewBook},
};

/// Store-level failures, classified so services can react to them
#[derive(Error, Debug)]
pub enum StoreError {
    /// An update or delete matched no row
    #[error("record not found")]
    RecordNotFound,

    #[error("unique constraint violated on {field}")]
    UniqueViolation { field: String },

    #[error("foreign key constraint {constraint} violated")]
    ForeignKeyViolation { constraint: String },

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            let constraint = db.constraint().unwrap_or_default().to_string();
            match db.kind() {
                ErrorKind::UniqueViolation => {
                    return StoreError::UniqueViolation {
                        field: constraint_field(&constraint),
                    }
                }
                ErrorKind::ForeignKeyViolation => {
                    return StoreError::ForeignKeyViolation { constraint }
                }
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

/// Extract the column name from a single-column constraint name
/// (`books_isbn_key` -> `isbn`).
pub fn constraint_field(constraint: &str) -> String {
    let trimmed = ["_key", "_fkey", "_unique", "_idx"]
        .iter()
        .find_map(|suffix| constraint.strip_suffix(suffix))
        .unwrap_or(constraint);
    match trimmed.split_once('_') {
        Some((_table, column)) => column.to_string(),
        None => trimmed.to_string(),
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Offset/limit window derived from a 1-based page number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: i64,
    pub take: i64,
}

impl Pagination {
    pub const DEFAULT_PAGE: i64 = 1;
    pub const DEFAULT_LIMIT: i64 = 10;

    /// `None` when the offset does not fit in an `i64`
    pub fn new(page: i64, limit: i64) -> Option<Self> {
        let skip = page.checked_sub(1)?.checked_mul(limit)?;
        Some(Self { skip, take: limit })
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            take: Self::DEFAULT_LIMIT,
        }
    }
}

/// Build an ILIKE pattern matching `search` anywhere, with wildcards escaped
pub fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorFilter {
    pub pagination: Pagination,
    /// Case-insensitive substring over first and last name
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilter {
    pub pagination: Pagination,
    /// Case-insensitive substring over title and isbn
    pub search: Option<String>,
    pub author_id: Option<Uuid>,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    async fn create(&self, data: &NewAuthor) -> StoreResult<Author>;

    async fn find_many(&self, filter: &AuthorFilter) -> StoreResult<Vec<Author>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Author>>;

    /// Fails with `RecordNotFound` when no author has this id
    async fn update(&self, id: Uuid, changes: &AuthorChanges) -> StoreResult<Author>;

    /// Fails with `RecordNotFound` when no author has this id
    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn create(&self, data: &NewBook) -> StoreResult<BookDetails>;

    async fn find_many(&self, filter: &BookFilter) -> StoreResult<Vec<BookDetails>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<BookDetails>>;

    /// Fails with `RecordNotFound` when no book has this id
    async fn update(&self, id: Uuid, changes: &BookChanges) -> StoreResult<BookDetails>;

    /// Fails with `RecordNotFound` when no book has this id
    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}

/// Store connectivity, used by the readiness check
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StatusRepository: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;
}

#[derive(Clone)]
pub struct PgStatus {
    pool: Pool<Postgres>,
}

#[async_trait]
impl StatusRepository for PgStatus {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Main repository struct holding the per-entity repositories
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn AuthorRepository>,
    pub books: Arc<dyn BookRepository>,
    pub status: Arc<dyn StatusRepository>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(authors::AuthorsRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            status: Arc::new(PgStatus { pool }),
        }
    }

    /// Assemble a repository from arbitrary implementations
    pub fn from_parts(
        authors: Arc<dyn AuthorRepository>,
        books: Arc<dyn BookRepository>,
        status: Arc<dyn StatusRepository>,
    ) -> Self {
        Self {
            authors,
            books,
            status,
        }
    }
}
