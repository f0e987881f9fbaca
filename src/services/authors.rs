//! Author management service

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorChanges, CreateAuthor, NewAuthor, UpdateAuthor},
        validation::parse_iso_date,
    },
    repository::{AuthorFilter, Repository, StoreError},
};

use super::{non_empty, pagination, parse_id};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Author with ID \"{}\" not found", id))
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create an author
    pub async fn create(&self, data: &CreateAuthor) -> AppResult<Author> {
        let author = self
            .repository
            .authors
            .create(&NewAuthor {
                first_name: data.first_name.clone(),
                last_name: data.last_name.clone(),
                bio: data.bio.clone(),
                birth_date: data.birth_date.as_deref().and_then(parse_iso_date),
            })
            .await?;
        tracing::info!("Created author id={}", author.id);
        Ok(author)
    }

    /// List authors, optionally filtered by a first/last name substring
    pub async fn find_all(&self, page: i64, limit: i64, search: Option<&str>) -> AppResult<Vec<Author>> {
        let filter = AuthorFilter {
            pagination: pagination(page, limit)?,
            search: non_empty(search),
        };
        Ok(self.repository.authors.find_many(&filter).await?)
    }

    /// Get author by ID
    pub async fn find_one(&self, id: &str) -> AppResult<Author> {
        let uuid = parse_id(id).ok_or_else(|| not_found(id))?;
        self.repository
            .authors
            .find_by_id(uuid)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Apply a partial update
    pub async fn update(&self, id: &str, data: &UpdateAuthor) -> AppResult<Author> {
        let uuid = parse_id(id).ok_or_else(|| not_found(id))?;
        let changes = AuthorChanges {
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            bio: data.bio.clone(),
            birth_date: data.birth_date.as_deref().and_then(parse_iso_date),
        };

        match self.repository.authors.update(uuid, &changes).await {
            Ok(author) => Ok(author),
            Err(StoreError::RecordNotFound) => Err(not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete an author.
    ///
    /// Authors that still have books are not guarded here: the store's
    /// foreign key rejects the delete and the failure is surfaced as is.
    pub async fn remove(&self, id: &str) -> AppResult<()> {
        let author = self.find_one(id).await?;
        match self.repository.authors.delete(author.id).await {
            Ok(()) => {
                tracing::info!("Deleted author id={}", author.id);
                Ok(())
            }
            Err(StoreError::RecordNotFound) => Err(not_found(id)),
            Err(e) => {
                tracing::warn!("Failed to delete author id={}: {}", author.id, e);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{
        MockAuthorRepository, MockBookRepository, MockStatusRepository, Pagination,
    };
    use chrono::{Datelike, Utc};
    use mockall::predicate::eq;
    use std::sync::Arc;
    use uuid::Uuid;

    fn test_author() -> Author {
        let now = Utc::now();
        Author {
            id: Uuid::new_v4(),
            first_name: "John".into(),
            last_name: "Doe".into(),
            bio: Some("A great author".into()),
            birth_date: parse_iso_date("1980-01-01"),
            created_at: now,
            updated_at: now,
        }
    }

    fn service(authors: MockAuthorRepository) -> AuthorsService {
        AuthorsService::new(Repository::from_parts(
            Arc::new(authors),
            Arc::new(MockBookRepository::new()),
            Arc::new(MockStatusRepository::new()),
        ))
    }

    #[tokio::test]
    async fn test_create_parses_birth_date() {
        let mut authors = MockAuthorRepository::new();
        authors
            .expect_create()
            .withf(|data| {
                data.first_name == "Jane"
                    && data.last_name == "Austen"
                    && data.birth_date.map(|d| (d.year(), d.month(), d.day())) == Some((1775, 12, 16))
            })
            .times(1)
            .returning(|data| {
                let now = Utc::now();
                Ok(Author {
                    id: Uuid::new_v4(),
                    first_name: data.first_name.clone(),
                    last_name: data.last_name.clone(),
                    bio: data.bio.clone(),
                    birth_date: data.birth_date,
                    created_at: now,
                    updated_at: now,
                })
            });

        let created = service(authors)
            .create(&CreateAuthor {
                first_name: "Jane".into(),
                last_name: "Austen".into(),
                bio: None,
                birth_date: Some("1775-12-16".into()),
            })
            .await
            .unwrap();

        assert_eq!(created.first_name, "Jane");
        assert_eq!(created.last_name, "Austen");
        assert!(created.bio.is_none());
    }

    #[tokio::test]
    async fn test_find_all_defaults() {
        let mut authors = MockAuthorRepository::new();
        authors
            .expect_find_many()
            .with(eq(AuthorFilter {
                pagination: Pagination { skip: 0, take: 10 },
                search: None,
            }))
            .times(1)
            .returning(|_| Ok(vec![test_author()]));

        let result = service(authors).find_all(1, 10, None).await.unwrap();
        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn test_find_all_pagination_and_search() {
        let mut authors = MockAuthorRepository::new();
        authors
            .expect_find_many()
            .with(eq(AuthorFilter {
                pagination: Pagination { skip: 5, take: 5 },
                search: Some("John".into()),
            }))
            .times(1)
            .returning(|_| Ok(vec![]));

        service(authors).find_all(2, 5, Some("John")).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_all_empty_search_is_ignored() {
        let mut authors = MockAuthorRepository::new();
        authors
            .expect_find_many()
            .withf(|filter| filter.search.is_none())
            .times(1)
            .returning(|_| Ok(vec![]));

        service(authors).find_all(1, 10, Some("")).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_one() {
        let author = test_author();
        let expected = author.clone();
        let mut authors = MockAuthorRepository::new();
        authors
            .expect_find_by_id()
            .with(eq(author.id))
            .returning(move |_| Ok(Some(author.clone())));

        let found = service(authors).find_one(&expected.id.to_string()).await.unwrap();
        assert_eq!(found, expected);
    }

    #[tokio::test]
    async fn test_find_one_not_found() {
        let mut authors = MockAuthorRepository::new();
        authors.expect_find_by_id().returning(|_| Ok(None));

        let err = service(authors).find_one(&Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_find_one_malformed_id_is_not_found() {
        let mut authors = MockAuthorRepository::new();
        authors.expect_find_by_id().never();

        let err = service(authors).find_one("non-existent-id").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg.contains("non-existent-id")));
    }

    #[tokio::test]
    async fn test_update() {
        let author = test_author();
        let id = author.id;
        let mut authors = MockAuthorRepository::new();
        authors
            .expect_update()
            .withf(move |uuid, changes| {
                *uuid == id
                    && changes.bio == Some(Some("An updated bio".to_string()))
                    && changes.first_name.is_none()
                    && changes.birth_date.is_none()
            })
            .times(1)
            .returning(move |_, changes| {
                let mut updated = author.clone();
                updated.bio = changes.bio.clone().flatten();
                Ok(updated)
            });

        let updated = service(authors)
            .update(
                &id.to_string(),
                &UpdateAuthor {
                    bio: Some(Some("An updated bio".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.bio.as_deref(), Some("An updated bio"));
    }

    #[tokio::test]
    async fn test_update_clears_bio() {
        let author = test_author();
        let id = author.id;
        let mut authors = MockAuthorRepository::new();
        authors
            .expect_update()
            .withf(move |uuid, changes| *uuid == id && changes.bio == Some(None))
            .times(1)
            .returning(move |_, _| {
                let mut updated = author.clone();
                updated.bio = None;
                Ok(updated)
            });

        let request: UpdateAuthor = serde_json::from_str(r#"{"bio":null}"#).unwrap();
        let updated = service(authors).update(&id.to_string(), &request).await.unwrap();
        assert!(updated.bio.is_none());
    }

    #[tokio::test]
    async fn test_find_all_rejects_overflowing_page() {
        let mut authors = MockAuthorRepository::new();
        authors.expect_find_many().never();

        let err = service(authors).find_all(i64::MAX, 10, None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let mut authors = MockAuthorRepository::new();
        authors
            .expect_update()
            .returning(|_, _| Err(StoreError::RecordNotFound));

        let err = service(authors)
            .update(&Uuid::new_v4().to_string(), &UpdateAuthor::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_remove() {
        let author = test_author();
        let id = author.id;
        let mut authors = MockAuthorRepository::new();
        authors
            .expect_find_by_id()
            .returning(move |_| Ok(Some(author.clone())));
        authors.expect_delete().with(eq(id)).times(1).returning(|_| Ok(()));

        service(authors).remove(&id.to_string()).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_not_found() {
        let mut authors = MockAuthorRepository::new();
        authors.expect_find_by_id().returning(|_| Ok(None));
        authors.expect_delete().never();

        let err = service(authors).remove(&Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_with_books_surfaces_constraint_failure() {
        let author = test_author();
        let id = author.id;
        let mut authors = MockAuthorRepository::new();
        authors
            .expect_find_by_id()
            .returning(move |_| Ok(Some(author.clone())));
        authors.expect_delete().returning(|_| {
            Err(StoreError::ForeignKeyViolation {
                constraint: "books_author_id_fkey".into(),
            })
        });

        let err = service(authors).remove(&id.to_string()).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Store(StoreError::ForeignKeyViolation { .. })
        ));
    }
}
