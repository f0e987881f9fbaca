//! Book management service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookChanges, BookDetails, CreateBook, NewBook, UpdateBook},
        validation::parse_iso_date,
    },
    repository::{BookFilter, Repository, StoreError},
};

use super::{non_empty, pagination, parse_id};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Book with ID \"{}\" not found", id))
}

fn unknown_author(author_id: &str) -> AppError {
    AppError::BadRequest(format!("Author with ID \"{}\" does not exist.", author_id))
}

fn duplicate_isbn(isbn: &str) -> AppError {
    AppError::BadRequest(format!("Book with ISBN \"{}\" already exists.", isbn))
}

/// Map write failures: isbn collisions and dangling author references are client errors
fn write_error(err: StoreError, isbn: Option<&str>, author_id: Option<&str>) -> AppError {
    match (err, author_id) {
        (StoreError::UniqueViolation { ref field }, _) if field == "isbn" => {
            duplicate_isbn(isbn.unwrap_or_default())
        }
        (StoreError::ForeignKeyViolation { .. }, Some(author_id)) => unknown_author(author_id),
        (other, _) => other.into(),
    }
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Resolve an author reference, failing as a client error when it does not exist
    async fn existing_author(&self, author_id: &str) -> AppResult<Uuid> {
        let uuid = parse_id(author_id).ok_or_else(|| unknown_author(author_id))?;
        match self.repository.authors.find_by_id(uuid).await? {
            Some(author) => Ok(author.id),
            None => Err(unknown_author(author_id)),
        }
    }

    /// Create a book for an existing author
    pub async fn create(&self, data: &CreateBook) -> AppResult<BookDetails> {
        let author_id = self.existing_author(&data.author_id).await?;

        let new_book = NewBook {
            title: data.title.clone(),
            isbn: data.isbn.clone(),
            published_date: data.published_date.as_deref().and_then(parse_iso_date),
            genre: data.genre.clone(),
            author_id,
        };

        let book = self
            .repository
            .books
            .create(&new_book)
            .await
            .map_err(|e| write_error(e, Some(&data.isbn), Some(&data.author_id)))?;
        tracing::info!("Created book id={} isbn={}", book.book.id, book.book.isbn);
        Ok(book)
    }

    /// List books, optionally by author and/or a title/isbn substring
    pub async fn find_all(
        &self,
        page: i64,
        limit: i64,
        search: Option<&str>,
        author_id: Option<&str>,
    ) -> AppResult<Vec<BookDetails>> {
        let author_id = match non_empty(author_id) {
            Some(id) => match parse_id(&id) {
                Some(uuid) => Some(uuid),
                // Nothing can reference a malformed author id
                None => return Ok(Vec::new()),
            },
            None => None,
        };

        let filter = BookFilter {
            pagination: pagination(page, limit)?,
            search: non_empty(search),
            author_id,
        };
        Ok(self.repository.books.find_many(&filter).await?)
    }

    /// Get book by ID, with its author
    pub async fn find_one(&self, id: &str) -> AppResult<BookDetails> {
        let uuid = parse_id(id).ok_or_else(|| not_found(id))?;
        self.repository
            .books
            .find_by_id(uuid)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Apply a partial update; a new author reference must exist
    pub async fn update(&self, id: &str, data: &UpdateBook) -> AppResult<BookDetails> {
        let author_id = match data.author_id.as_deref() {
            Some(author_id) => Some(self.existing_author(author_id).await?),
            None => None,
        };

        let uuid = parse_id(id).ok_or_else(|| not_found(id))?;
        let changes = BookChanges {
            title: data.title.clone(),
            isbn: data.isbn.clone(),
            published_date: data.published_date.as_deref().and_then(parse_iso_date),
            genre: data.genre.clone(),
            author_id,
        };

        match self.repository.books.update(uuid, &changes).await {
            Ok(book) => Ok(book),
            Err(StoreError::RecordNotFound) => Err(not_found(id)),
            Err(e) => Err(write_error(e, data.isbn.as_deref(), data.author_id.as_deref())),
        }
    }

    /// Delete a book
    pub async fn remove(&self, id: &str) -> AppResult<()> {
        let book = self.find_one(id).await?;
        match self.repository.books.delete(book.book.id).await {
            Ok(()) => {
                tracing::info!("Deleted book id={}", book.book.id);
                Ok(())
            }
            Err(StoreError::RecordNotFound) => Err(not_found(id)),
            Err(e) => Err(e.into()),
        }
    }
}
