//! Business logic services

pub mod authors;
pub mod books;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    repository::{Pagination, Repository},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            repository,
        }
    }

    /// Check that the store answers
    pub async fn ping(&self) -> AppResult<()> {
        Ok(self.repository.status.ping().await?)
    }
}

/// Offset window for a page, rejecting pages whose offset overflows
fn pagination(page: i64, limit: i64) -> AppResult<Pagination> {
    Pagination::new(page, limit)
        .ok_or_else(|| AppError::Validation("page: out of range for this limit".to_string()))
}

/// Entity ids are UUIDs; anything else cannot name a stored record
fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}

/// Empty filter strings behave as if absent
fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
