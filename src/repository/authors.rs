//! Authors repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{contains_pattern, AuthorFilter, AuthorRepository, StoreError, StoreResult};
use crate::models::author::{Author, AuthorChanges, NewAuthor};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorRepository for AuthorsRepository {
    /// Insert an author
    async fn create(&self, data: &NewAuthor) -> StoreResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (first_name, last_name, bio, birth_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.bio)
        .bind(data.birth_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// List authors with optional name search and pagination
    async fn find_many(&self, filter: &AuthorFilter) -> StoreResult<Vec<Author>> {
        let pattern = filter.search.as_deref().map(contains_pattern);

        let where_clause = if pattern.is_some() {
            "WHERE first_name ILIKE $3 OR last_name ILIKE $3"
        } else {
            ""
        };

        let query = format!(
            "SELECT * FROM authors {} ORDER BY created_at, id LIMIT $1 OFFSET $2",
            where_clause
        );

        let mut builder = sqlx::query_as::<_, Author>(&query)
            .bind(filter.pagination.take)
            .bind(filter.pagination.skip);
        if let Some(ref p) = pattern {
            builder = builder.bind(p);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Get author by ID
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Apply a partial update
    async fn update(&self, id: Uuid, changes: &AuthorChanges) -> StoreResult<Author> {
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

        add_field!(changes.first_name, "first_name");
        add_field!(changes.last_name, "last_name");
        add_field!(changes.bio, "bio");
        add_field!(changes.birth_date, "birth_date");

        let query = format!(
            "UPDATE authors SET {} WHERE id = $1 RETURNING *",
            sets.join(", ")
        );

        let mut builder = sqlx::query_as::<_, Author>(&query).bind(id).bind(Utc::now());

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(changes.first_name);
        bind_field!(changes.last_name);
        bind_field!(changes.bio);
        bind_field!(changes.birth_date);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::RecordNotFound)
    }

    /// Delete an author; rejected by the store while books reference it
    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::RecordNotFound);
        }
        Ok(())
    }
}
