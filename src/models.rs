use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Core Application Schemas (Mapped to Database) ---

/// Role
///
/// Authority tier of an account. Variants are declared in ascending order so
/// the derived `Ord` gives `User < Moderator < Admin`; permission checks rely
/// on that ordering rather than on per-role boolean flags.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS, ToSchema,
    Default,
)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    #[default]
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        *self == Role::Admin
    }

    pub fn is_moderator(&self) -> bool {
        *self >= Role::Moderator
    }
}

// Stored as TEXT; an unknown value in the column is a data error, not a default.
impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// User
///
/// Canonical account record from the `users` table. `is_confirmed` flips to
/// true on the first successful token exchange.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub is_confirmed: bool,
}

/// Category
///
/// Catalog dimension a title belongs to (e.g. "Books", "Films"). Addressed by
/// its unique slug everywhere; the surrogate key never leaves the database.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Category {
    pub name: String,
    pub slug: String,
}

/// Genre
///
/// Same shape as `Category` but an independent entity: a title has exactly
/// one category and any number of genres.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Genre {
    pub name: String,
    pub slug: String,
}

/// Title
///
/// Output shape of a rated work. `rating` is derived (mean of review scores,
/// absent while unreviewed) and `category`/`genre` are nested objects; the
/// input shape (`TitleInput`) takes slugs instead.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Title {
    pub id: Uuid,
    pub name: String,
    pub year: i32,
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub genre: Vec<Genre>,
    pub category: Category,
    #[ts(type = "string")]
    pub pub_date: DateTime<Utc>,
}

/// Review
///
/// One user's scored review of a title. `author` is the username, resolved by
/// a JOIN in the repository.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Review {
    pub id: i64,
    pub title_id: Uuid,
    pub author_id: Uuid,
    pub author: String,
    pub score: i32,
    pub text: String,
    #[ts(type = "string")]
    pub pub_date: DateTime<Utc>,
}

/// Comment
///
/// A comment under a review. Same authorship handling as `Review`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Comment {
    pub id: i64,
    pub review_id: i64,
    pub author_id: Uuid,
    pub author: String,
    pub text: String,
    #[ts(type = "string")]
    pub pub_date: DateTime<Utc>,
}

// --- Validation helpers ---

/// Username charset of the platform, plus the reserved `"me"` alias which
/// would collide with the self-lookup route.
fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username == "me" {
        return Err(ValidationError::new("reserved_username"));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-'))
    {
        return Err(ValidationError::new("invalid_username"));
    }
    Ok(())
}

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty()
        || !slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::new("invalid_slug"));
    }
    Ok(())
}

// --- Request Payloads (Input Schemas) ---

/// SignupRequest
///
/// Input payload for `POST /auth/signup`. Creates an unconfirmed account and
/// triggers the confirmation-code email.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 150), custom(function = "validate_username"))]
    pub username: String,
    #[validate(email)]
    pub email: String,
}

/// TokenRequest
///
/// Input payload for `POST /auth/token`: the second half of the registration
/// state machine.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct TokenRequest {
    pub username: String,
    pub confirmation_code: String,
}

/// Output of a successful token exchange.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct TokenResponse {
    pub token: String,
}

/// CreateUserRequest
///
/// Admin-side account creation (POST /users). Role defaults to `user`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 150), custom(function = "validate_username"))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    pub role: Option<Role>,
}

/// UpdateUserRequest
///
/// Partial update for `PATCH /users/{username}`. The `role` field is honored
/// only when the caller is an admin; self-service updates cannot escalate.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// SlugInput
///
/// Input shape shared by categories and genres: a display name plus the
/// unique slug it will be addressed by.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct SlugInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[validate(length(min = 1, max = 50), custom(function = "validate_slug"))]
    pub slug: String,
}

/// TitleInput
///
/// Input shape for creating a title: category and genres are given by slug,
/// unlike the nested objects of the output shape.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct TitleInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub genre: Vec<String>,
    pub category: String,
}

/// UpdateTitleRequest
///
/// Partial update payload for `PATCH /titles/{id}`. Only provided fields are
/// written; `genre`, when present, replaces the full genre set.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateTitleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// ReviewInput
///
/// Review body and score. Author and title are set server-side from the
/// authenticated principal and the URL path, never from the payload.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct ReviewInput {
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(range(min = 1, max = 10))]
    pub score: i32,
}

/// Partial review update; both fields optional.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct UpdateReviewRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 10))]
    pub score: Option<i32>,
}

/// CommentInput
///
/// Comment body; author and parent review are set server-side.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct CommentInput {
    #[validate(length(min = 1))]
    pub text: String,
}

// --- Listing Support ---

/// TitleFilter
///
/// Query parameters accepted by the title listing: substring match on the
/// name, exact slug match on category/genre, exact year.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::IntoParams, Default)]
pub struct TitleFilter {
    pub name: Option<String>,
    pub category: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
}

/// Pagination
///
/// Limit/offset query parameters accepted by every list endpoint.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, utoipa::IntoParams, Default)]
pub struct Pagination {
    /// Page size; defaults to 10, capped at 100.
    pub limit: Option<i64>,
    /// Number of records to skip.
    pub offset: Option<i64>,
}

impl Pagination {
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_LIMIT: i64 = 100;

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Page
///
/// Bounded list response: total row count plus the requested window.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Page<T> {
    pub count: i64,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(count: i64, results: Vec<T>) -> Self {
        Self { count, results }
    }
}

// Concrete page shapes referenced by the OpenAPI annotations.
pub type UserPage = Page<User>;
pub type CategoryPage = Page<Category>;
pub type GenrePage = Page<Genre>;
pub type TitlePage = Page<Title>;
pub type ReviewPage = Page<Review>;
pub type CommentPage = Page<Comment>;
