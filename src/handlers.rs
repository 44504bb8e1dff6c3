use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    auth::{AuthUser, MaybeUser, issue_token},
    error::{ApiError, ApiResult},
    models::{
        Category, Comment, CreateUserRequest, Genre, Page, Pagination, Review, ReviewInput,
        CommentInput, SignupRequest, SlugInput, Title, TitleFilter, TitleInput, TokenRequest,
        TokenResponse, UpdateReviewRequest, UpdateTitleRequest, UpdateUserRequest, User,
    },
    permissions,
};

// --- Filter Structs ---

/// SearchFilter
///
/// The `search` query parameter accepted by the user and category/genre
/// listings (username match for users, name match otherwise).
#[derive(Deserialize, utoipa::IntoParams)]
pub struct SearchFilter {
    pub search: Option<String>,
}

// --- Registration & Token Exchange ---

/// signup
///
/// [Public Route] First half of the registration state machine: creates an
/// unconfirmed account and emails it a confirmation code. An email-channel
/// failure is surfaced to the caller, never swallowed.
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Registered; code emailed", body = SignupRequest),
        (status = 400, description = "Malformed or duplicate username/email", body = crate::error::ErrorBody)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> ApiResult<Json<SignupRequest>> {
    payload.validate()?;

    // Uniqueness is checked up front so no email goes out for a rejected
    // registration; the database constraints remain the final arbiter.
    if state
        .repo
        .get_user_by_username(&payload.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Validation(
            "A user with that username already exists.".to_string(),
        ));
    }
    if state.repo.get_user_by_email(&payload.email).await?.is_some() {
        return Err(ApiError::Validation(
            "A user with that email already exists.".to_string(),
        ));
    }

    let user = state
        .repo
        .create_user(&payload.username, &payload.email, crate::models::Role::User)
        .await?;

    let code = Uuid::new_v4().simple().to_string();
    state.repo.store_confirmation_code(user.id, &code).await?;

    state
        .email
        .send_confirmation_code(&user.email, &user.username, &code)
        .await?;

    Ok(Json(payload))
}

/// obtain_token
///
/// [Public Route] Second half of registration: exchanges username +
/// confirmation code for a signed access token and marks the account
/// confirmed. The stored code stays valid until a newer one replaces it.
#[utoipa::path(
    post,
    path = "/auth/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Confirmation code mismatch", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown username", body = crate::error::ErrorBody)
    )
)]
pub async fn obtain_token(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let user = state
        .repo
        .get_user_by_username(&payload.username)
        .await?
        .ok_or(ApiError::NotFound)?;

    let stored = state.repo.confirmation_code(user.id).await?;
    match stored {
        Some(code) if code == payload.confirmation_code => {}
        _ => return Err(ApiError::InvalidConfirmationCode),
    }

    state.repo.confirm_user(user.id).await?;

    let token = issue_token(
        user.id,
        &state.config.jwt_secret,
        state.config.token_ttl_seconds,
    )?;

    Ok(Json(TokenResponse { token }))
}

// --- Users ---

/// list_users
///
/// [Admin Route] Paginated user listing, searchable by username.
#[utoipa::path(
    get,
    path = "/users",
    params(SearchFilter, Pagination),
    responses((status = 200, description = "Users", body = crate::models::UserPage))
)]
pub async fn list_users(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<SearchFilter>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Page<User>>> {
    permissions::require_admin(&auth)?;

    let (count, users) = state
        .repo
        .list_users(filter.search, page.limit(), page.offset())
        .await?;
    Ok(Json(Page::new(count, users)))
}

/// create_user
///
/// [Admin Route] Creates an account directly, bypassing the confirmation
/// flow. Role defaults to `user`.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses((status = 201, description = "Created", body = User))
)]
pub async fn create_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    permissions::require_admin(&auth)?;
    payload.validate()?;

    let user = state
        .repo
        .create_user(
            &payload.username,
            &payload.email,
            payload.role.unwrap_or_default(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// get_user
///
/// [Admin Route] Single-user lookup. The `"me"` alias resolves to the
/// requesting principal and is open to any authenticated user.
#[utoipa::path(
    get,
    path = "/users/{username}",
    params(("username" = String, Path, description = "Username or the literal \"me\"")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 404, description = "Not found", body = crate::error::ErrorBody)
    )
)]
pub async fn get_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<User>> {
    if username == "me" {
        let user = state
            .repo
            .get_user(auth.id)
            .await?
            .ok_or(ApiError::NotFound)?;
        return Ok(Json(user));
    }

    permissions::require_admin(&auth)?;
    let user = state
        .repo
        .get_user_by_username(&username)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(user))
}

/// update_user
///
/// [Admin Route] Partial update. Through the `"me"` alias any authenticated
/// user may edit their own record, but the `role` field is ignored for
/// non-admins so nobody self-promotes.
#[utoipa::path(
    patch,
    path = "/users/{username}",
    request_body = UpdateUserRequest,
    params(("username" = String, Path, description = "Username or the literal \"me\"")),
    responses((status = 200, description = "Updated", body = User))
)]
pub async fn update_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    payload.validate()?;

    let (target, role) = if username == "me" {
        let role = if auth.role.is_admin() {
            payload.role
        } else {
            None
        };
        (auth.username.clone(), role)
    } else {
        permissions::require_admin(&auth)?;
        (username, payload.role)
    };

    let user = state
        .repo
        .update_user(&target, payload.email, role)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(user))
}

/// delete_user
///
/// [Admin Route] Deletes an account. Deleting through the `"me"` alias is
/// rejected with 405 regardless of role.
#[utoipa::path(
    delete,
    path = "/users/{username}",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 405, description = "Deleting \"me\" is not allowed", body = crate::error::ErrorBody)
    )
)]
pub async fn delete_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<StatusCode> {
    if username == "me" {
        return Err(ApiError::MethodNotAllowed);
    }

    permissions::require_admin(&auth)?;
    if state.repo.delete_user(&username).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

// --- Categories ---

/// list_categories
///
/// [Public Route] Paginated category listing, searchable by name.
#[utoipa::path(
    get,
    path = "/categories",
    params(SearchFilter, Pagination),
    responses((status = 200, description = "Categories", body = crate::models::CategoryPage))
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(filter): Query<SearchFilter>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Page<Category>>> {
    let (count, categories) = state
        .repo
        .list_categories(filter.search, page.limit(), page.offset())
        .await?;
    Ok(Json(Page::new(count, categories)))
}

/// create_category
///
/// [Admin Route] Adds a category. Slug uniqueness is enforced by the
/// database and surfaces as a 400.
#[utoipa::path(
    post,
    path = "/categories",
    request_body = SlugInput,
    responses((status = 201, description = "Created", body = Category))
)]
pub async fn create_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<SlugInput>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    permissions::require_admin(&auth)?;
    payload.validate()?;

    let category = state.repo.create_category(&payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// destroy_category
///
/// [Admin Route] Removes a category by slug. Single-category retrieval and
/// update are not part of the surface at all: those methods answer 405 from
/// the router, even for admins.
#[utoipa::path(
    delete,
    path = "/categories/{slug}",
    params(("slug" = String, Path, description = "Category slug")),
    responses((status = 204, description = "Deleted"))
)]
pub async fn destroy_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<StatusCode> {
    permissions::require_admin(&auth)?;
    if state.repo.delete_category(&slug).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

// --- Genres ---

/// list_genres
///
/// [Public Route] Same surface as categories.
#[utoipa::path(
    get,
    path = "/genres",
    params(SearchFilter, Pagination),
    responses((status = 200, description = "Genres", body = crate::models::GenrePage))
)]
pub async fn list_genres(
    State(state): State<AppState>,
    Query(filter): Query<SearchFilter>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Page<Genre>>> {
    let (count, genres) = state
        .repo
        .list_genres(filter.search, page.limit(), page.offset())
        .await?;
    Ok(Json(Page::new(count, genres)))
}

/// create_genre
///
/// [Admin Route] Adds a genre.
#[utoipa::path(
    post,
    path = "/genres",
    request_body = SlugInput,
    responses((status = 201, description = "Created", body = Genre))
)]
pub async fn create_genre(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<SlugInput>,
) -> ApiResult<(StatusCode, Json<Genre>)> {
    permissions::require_admin(&auth)?;
    payload.validate()?;

    let genre = state.repo.create_genre(&payload).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

/// destroy_genre
///
/// [Admin Route] Removes a genre by slug; retrieval/update answer 405.
#[utoipa::path(
    delete,
    path = "/genres/{slug}",
    params(("slug" = String, Path, description = "Genre slug")),
    responses((status = 204, description = "Deleted"))
)]
pub async fn destroy_genre(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<StatusCode> {
    permissions::require_admin(&auth)?;
    if state.repo.delete_genre(&slug).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

// --- Titles ---

/// list_titles
///
/// [Public Route] Paginated titles with derived ratings, newest first,
/// filterable by name/category/genre/year.
#[utoipa::path(
    get,
    path = "/titles",
    params(TitleFilter, Pagination),
    responses((status = 200, description = "Titles", body = crate::models::TitlePage))
)]
pub async fn list_titles(
    State(state): State<AppState>,
    Query(filter): Query<TitleFilter>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Page<Title>>> {
    let (count, titles) = state
        .repo
        .list_titles(&filter, page.limit(), page.offset())
        .await?;
    Ok(Json(Page::new(count, titles)))
}

/// get_title
///
/// [Public Route] Single title with rating and nested category/genres.
#[utoipa::path(
    get,
    path = "/titles/{id}",
    params(("id" = Uuid, Path, description = "Title ID")),
    responses(
        (status = 200, description = "Title", body = Title),
        (status = 404, description = "Not found", body = crate::error::ErrorBody)
    )
)]
pub async fn get_title(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Title>> {
    let title = state.repo.get_title(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(title))
}

/// create_title
///
/// [Admin Route] Creates a title. Category and genres are referenced by slug
/// in the input; an unresolved slug rejects the whole operation.
#[utoipa::path(
    post,
    path = "/titles",
    request_body = TitleInput,
    responses((status = 201, description = "Created", body = Title))
)]
pub async fn create_title(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<TitleInput>,
) -> ApiResult<(StatusCode, Json<Title>)> {
    permissions::require_admin(&auth)?;
    payload.validate()?;

    let title = state
        .repo
        .create_title(&payload)
        .await?
        .ok_or_else(|| ApiError::Validation("unknown category or genre slug".to_string()))?;
    Ok((StatusCode::CREATED, Json(title)))
}

/// update_title
///
/// [Admin Route] Partial update; `genre`, when given, replaces the full set.
#[utoipa::path(
    patch,
    path = "/titles/{id}",
    request_body = UpdateTitleRequest,
    params(("id" = Uuid, Path, description = "Title ID")),
    responses((status = 200, description = "Updated", body = Title))
)]
pub async fn update_title(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTitleRequest>,
) -> ApiResult<Json<Title>> {
    permissions::require_admin(&auth)?;

    // Existence first so a bad slug on a missing title is still a 404.
    state.repo.get_title(id).await?.ok_or(ApiError::NotFound)?;

    let title = state
        .repo
        .update_title(id, &payload)
        .await?
        .ok_or_else(|| ApiError::Validation("unknown category or genre slug".to_string()))?;
    Ok(Json(title))
}

/// delete_title
///
/// [Admin Route] Deletes a title; its reviews and their comments go with it.
#[utoipa::path(
    delete,
    path = "/titles/{id}",
    params(("id" = Uuid, Path, description = "Title ID")),
    responses((status = 204, description = "Deleted"))
)]
pub async fn delete_title(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    permissions::require_admin(&auth)?;
    if state.repo.delete_title(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

// --- Reviews ---

/// list_reviews
///
/// [Public Route] Reviews for one title, newest first. The title must
/// resolve or the whole operation is a 404.
#[utoipa::path(
    get,
    path = "/titles/{title_id}/reviews",
    params(("title_id" = Uuid, Path, description = "Title ID"), Pagination),
    responses((status = 200, description = "Reviews", body = crate::models::ReviewPage))
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(title_id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Page<Review>>> {
    state
        .repo
        .get_title(title_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let (count, reviews) = state
        .repo
        .list_reviews(title_id, page.limit(), page.offset())
        .await?;
    Ok(Json(Page::new(count, reviews)))
}

/// get_review
///
/// [Public Route] Single review, scoped to the title in the path.
#[utoipa::path(
    get,
    path = "/titles/{title_id}/reviews/{review_id}",
    params(
        ("title_id" = Uuid, Path, description = "Title ID"),
        ("review_id" = i64, Path, description = "Review ID")
    ),
    responses((status = 200, description = "Review", body = Review))
)]
pub async fn get_review(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(Uuid, i64)>,
) -> ApiResult<Json<Review>> {
    let review = state
        .repo
        .get_review(title_id, review_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(review))
}

/// create_review
///
/// [Authenticated Route] Posts a review. Author and title are set
/// server-side; the one-review-per-title-per-user rule is enforced by the
/// storage layer and surfaces as a 400.
#[utoipa::path(
    post,
    path = "/titles/{title_id}/reviews",
    request_body = ReviewInput,
    params(("title_id" = Uuid, Path, description = "Title ID")),
    responses(
        (status = 201, description = "Created", body = Review),
        (status = 404, description = "Unknown title", body = crate::error::ErrorBody)
    )
)]
pub async fn create_review(
    MaybeUser(principal): MaybeUser,
    State(state): State<AppState>,
    Path(title_id): Path<Uuid>,
    Json(payload): Json<ReviewInput>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    let user = permissions::require_user(principal.as_ref())?;

    state
        .repo
        .get_title(title_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    payload.validate()?;

    let review = state
        .repo
        .create_review(title_id, user.id, payload.score, &payload.text)
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// update_review
///
/// [Authenticated Route] Edits a review: author, moderator, or admin.
#[utoipa::path(
    patch,
    path = "/titles/{title_id}/reviews/{review_id}",
    request_body = UpdateReviewRequest,
    params(
        ("title_id" = Uuid, Path, description = "Title ID"),
        ("review_id" = i64, Path, description = "Review ID")
    ),
    responses((status = 200, description = "Updated", body = Review))
)]
pub async fn update_review(
    MaybeUser(principal): MaybeUser,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(Uuid, i64)>,
    Json(payload): Json<UpdateReviewRequest>,
) -> ApiResult<Json<Review>> {
    let user = permissions::require_user(principal.as_ref())?;

    let review = state
        .repo
        .get_review(title_id, review_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    permissions::check_object(user, &review)?;
    payload.validate()?;

    let review = state
        .repo
        .update_review(review_id, payload.text, payload.score)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(review))
}

/// delete_review
///
/// [Authenticated Route] Removes a review: author, moderator, or admin.
/// Its comments are removed by the storage cascade.
#[utoipa::path(
    delete,
    path = "/titles/{title_id}/reviews/{review_id}",
    params(
        ("title_id" = Uuid, Path, description = "Title ID"),
        ("review_id" = i64, Path, description = "Review ID")
    ),
    responses((status = 204, description = "Deleted"))
)]
pub async fn delete_review(
    MaybeUser(principal): MaybeUser,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(Uuid, i64)>,
) -> ApiResult<StatusCode> {
    let user = permissions::require_user(principal.as_ref())?;

    let review = state
        .repo
        .get_review(title_id, review_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    permissions::check_object(user, &review)?;

    if state.repo.delete_review(review_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

// --- Comments ---

/// list_comments
///
/// [Public Route] Comments under a review, oldest first. The review must
/// resolve within the title in the path or the operation is a 404.
#[utoipa::path(
    get,
    path = "/titles/{title_id}/reviews/{review_id}/comments",
    params(
        ("title_id" = Uuid, Path, description = "Title ID"),
        ("review_id" = i64, Path, description = "Review ID"),
        Pagination
    ),
    responses((status = 200, description = "Comments", body = crate::models::CommentPage))
)]
pub async fn list_comments(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(Uuid, i64)>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Page<Comment>>> {
    state
        .repo
        .get_review(title_id, review_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let (count, comments) = state
        .repo
        .list_comments(review_id, page.limit(), page.offset())
        .await?;
    Ok(Json(Page::new(count, comments)))
}

/// get_comment
///
/// [Public Route] Single comment, scoped to its review and title.
#[utoipa::path(
    get,
    path = "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
    params(
        ("title_id" = Uuid, Path, description = "Title ID"),
        ("review_id" = i64, Path, description = "Review ID"),
        ("comment_id" = i64, Path, description = "Comment ID")
    ),
    responses((status = 200, description = "Comment", body = Comment))
)]
pub async fn get_comment(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(Uuid, i64, i64)>,
) -> ApiResult<Json<Comment>> {
    state
        .repo
        .get_review(title_id, review_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let comment = state
        .repo
        .get_comment(review_id, comment_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(comment))
}

/// create_comment
///
/// [Authenticated Route] Posts a comment under a review; author and review
/// are set server-side.
#[utoipa::path(
    post,
    path = "/titles/{title_id}/reviews/{review_id}/comments",
    request_body = CommentInput,
    params(
        ("title_id" = Uuid, Path, description = "Title ID"),
        ("review_id" = i64, Path, description = "Review ID")
    ),
    responses(
        (status = 201, description = "Created", body = Comment),
        (status = 404, description = "Unknown review", body = crate::error::ErrorBody)
    )
)]
pub async fn create_comment(
    MaybeUser(principal): MaybeUser,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(Uuid, i64)>,
    Json(payload): Json<CommentInput>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let user = permissions::require_user(principal.as_ref())?;

    state
        .repo
        .get_review(title_id, review_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    payload.validate()?;

    let comment = state
        .repo
        .create_comment(review_id, user.id, &payload.text)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// update_comment
///
/// [Authenticated Route] Edits a comment: author, moderator, or admin.
#[utoipa::path(
    patch,
    path = "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
    request_body = CommentInput,
    params(
        ("title_id" = Uuid, Path, description = "Title ID"),
        ("review_id" = i64, Path, description = "Review ID"),
        ("comment_id" = i64, Path, description = "Comment ID")
    ),
    responses((status = 200, description = "Updated", body = Comment))
)]
pub async fn update_comment(
    MaybeUser(principal): MaybeUser,
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(Uuid, i64, i64)>,
    Json(payload): Json<CommentInput>,
) -> ApiResult<Json<Comment>> {
    let user = permissions::require_user(principal.as_ref())?;

    state
        .repo
        .get_review(title_id, review_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let comment = state
        .repo
        .get_comment(review_id, comment_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    permissions::check_object(user, &comment)?;
    payload.validate()?;

    let comment = state
        .repo
        .update_comment(comment_id, &payload.text)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(comment))
}

/// delete_comment
///
/// [Authenticated Route] Removes a comment: author, moderator, or admin.
#[utoipa::path(
    delete,
    path = "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
    params(
        ("title_id" = Uuid, Path, description = "Title ID"),
        ("review_id" = i64, Path, description = "Review ID"),
        ("comment_id" = i64, Path, description = "Comment ID")
    ),
    responses((status = 204, description = "Deleted"))
)]
pub async fn delete_comment(
    MaybeUser(principal): MaybeUser,
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(Uuid, i64, i64)>,
) -> ApiResult<StatusCode> {
    let user = permissions::require_user(principal.as_ref())?;

    state
        .repo
        .get_review(title_id, review_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let comment = state
        .repo
        .get_comment(review_id, comment_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    permissions::check_object(user, &comment)?;

    if state.repo.delete_comment(comment_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
