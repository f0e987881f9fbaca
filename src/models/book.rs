//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::{
    author::Author,
    validation::{validate_isbn, validate_iso_date},
};

/// Book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    /// Unique across all books
    pub isbn: String,
    pub published_date: Option<DateTime<Utc>>,
    pub genre: Option<String>,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book with its author embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookDetails {
    #[serde(flatten)]
    pub book: Book,
    pub author: Author,
}

/// Reads a `books` row joined with its author, whose columns carry an
/// `author_` prefix (author id is the book's `author_id`).
impl<'r> FromRow<'r, PgRow> for BookDetails {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let book = Book::from_row(row)?;
        let author = Author {
            id: book.author_id,
            first_name: row.try_get("author_first_name")?,
            last_name: row.try_get("author_last_name")?,
            bio: row.try_get("author_bio")?,
            birth_date: row.try_get("author_birth_date")?,
            created_at: row.try_get("author_created_at")?,
            updated_at: row.try_get("author_updated_at")?,
        };
        Ok(Self { book, author })
    }
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,
    #[validate(custom(function = "validate_isbn"))]
    pub isbn: String,
    /// Publication date (ISO 8601)
    #[validate(custom(function = "validate_iso_date"))]
    pub published_date: Option<String>,
    pub genre: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub author_id: String,
}

/// Update book request; absent fields are left untouched, `"genre": null` clears the genre
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: Option<String>,
    #[validate(custom(function = "validate_isbn"))]
    pub isbn: Option<String>,
    #[validate(custom(function = "validate_iso_date"))]
    pub published_date: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub genre: Option<Option<String>>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub author_id: Option<String>,
}

/// Book query parameters
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Page number (1-based, default 1)
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub page: Option<i64>,
    /// Page size (default 10)
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub limit: Option<i64>,
    /// Case-insensitive match on title or ISBN
    pub search: Option<String>,
    /// Only books by this author
    pub author_id: Option<String>,
}

/// Book fields ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub isbn: String,
    pub published_date: Option<DateTime<Utc>>,
    pub genre: Option<String>,
    pub author_id: Uuid,
}

/// Partial book update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookChanges {
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
    /// `Some(None)` sets the column to NULL
    pub genre: Option<Option<String>>,
    pub author_id: Option<Uuid>,
}
