//! Books repository
//!
//! Every read returns the book joined with its author.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{contains_pattern, BookFilter, BookRepository, StoreError, StoreResult};
use crate::models::book::{BookChanges, BookDetails, NewBook};

/// Select list over `b` (books) and `a` (authors) matching `BookDetails::from_row`
const BOOK_WITH_AUTHOR_COLUMNS: &str = r#"
    b.id, b.title, b.isbn, b.published_date, b.genre, b.author_id,
    b.created_at, b.updated_at,
    a.first_name AS author_first_name,
    a.last_name AS author_last_name,
    a.bio AS author_bio,
    a.birth_date AS author_birth_date,
    a.created_at AS author_created_at,
    a.updated_at AS author_updated_at
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for BooksRepository {
    /// Insert a book and return it with its author
    async fn create(&self, data: &NewBook) -> StoreResult<BookDetails> {
        let query = format!(
            r#"
            WITH b AS (
                INSERT INTO books (title, isbn, published_date, genre, author_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            )
            SELECT {} FROM b JOIN authors a ON a.id = b.author_id
            "#,
            BOOK_WITH_AUTHOR_COLUMNS
        );

        let row = sqlx::query_as::<_, BookDetails>(&query)
            .bind(&data.title)
            .bind(&data.isbn)
            .bind(data.published_date)
            .bind(&data.genre)
            .bind(data.author_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// List books with optional author filter, search and pagination
    async fn find_many(&self, filter: &BookFilter) -> StoreResult<Vec<BookDetails>> {
        let pattern = filter.search.as_deref().map(contains_pattern);

        let mut conditions = Vec::new();
        let mut idx = 3;

        if filter.author_id.is_some() {
            conditions.push(format!("b.author_id = ${}", idx));
            idx += 1;
        }
        if pattern.is_some() {
            conditions.push(format!("(b.title ILIKE ${0} OR b.isbn ILIKE ${0})", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {} FROM books b JOIN authors a ON a.id = b.author_id {} \
             ORDER BY b.created_at, b.id LIMIT $1 OFFSET $2",
            BOOK_WITH_AUTHOR_COLUMNS, where_clause
        );

        let mut builder = sqlx::query_as::<_, BookDetails>(&query)
            .bind(filter.pagination.take)
            .bind(filter.pagination.skip);
        if let Some(author_id) = filter.author_id {
            builder = builder.bind(author_id);
        }
        if let Some(ref p) = pattern {
            builder = builder.bind(p);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Get book by ID
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<BookDetails>> {
        let query = format!(
            "SELECT {} FROM books b JOIN authors a ON a.id = b.author_id WHERE b.id = $1",
            BOOK_WITH_AUTHOR_COLUMNS
        );
        let row = sqlx::query_as::<_, BookDetails>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Apply a partial update and return the book with its author
    async fn update(&self, id: Uuid, changes: &BookChanges) -> StoreResult<BookDetails> {
        let mut sets = vec!["updated_at = $2".to_string()];
        let mut idx = 3;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(changes.title, "title");
        add_field!(changes.isbn, "isbn");
        add_field!(changes.published_date, "published_date");
        add_field!(changes.genre, "genre");
        add_field!(changes.author_id, "author_id");

        let query = format!(
            r#"
            WITH b AS (
                UPDATE books SET {} WHERE id = $1
                RETURNING *
            )
            SELECT {} FROM b JOIN authors a ON a.id = b.author_id
            "#,
            sets.join(", "),
            BOOK_WITH_AUTHOR_COLUMNS
        );

        let mut builder = sqlx::query_as::<_, BookDetails>(&query)
            .bind(id)
            .bind(Utc::now());

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(changes.title);
        bind_field!(changes.isbn);
        bind_field!(changes.published_date);
        bind_field!(changes.genre);
        bind_field!(changes.author_id);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::RecordNotFound)
    }

    /// Delete a book
    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::RecordNotFound);
        }
        Ok(())
    }
}
