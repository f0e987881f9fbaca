//! Author model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::validation::validate_iso_date;

/// Author record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub birth_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create author request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateAuthor {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub last_name: String,
    pub bio: Option<String>,
    /// Birth date (ISO 8601, e.g. 1775-12-16)
    #[validate(custom(function = "validate_iso_date"))]
    pub birth_date: Option<String>,
}

/// Update author request; absent fields are left untouched, `"bio": null` clears the bio
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateAuthor {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub last_name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub bio: Option<Option<String>>,
    #[validate(custom(function = "validate_iso_date"))]
    pub birth_date: Option<String>,
}

/// Author query parameters
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AuthorQuery {
    /// Page number (1-based, default 1)
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub page: Option<i64>,
    /// Page size (default 10)
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub limit: Option<i64>,
    /// Case-insensitive match on first or last name
    pub search: Option<String>,
}

/// Author fields ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub birth_date: Option<DateTime<Utc>>,
}

/// Partial author update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// `Some(None)` sets the column to NULL
    pub bio: Option<Option<String>>,
    pub birth_date: Option<DateTime<Utc>>,
}
