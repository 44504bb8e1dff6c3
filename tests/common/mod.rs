#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use ratehub::{
    AppState,
    auth::AuthUser,
    config::AppConfig,
    email::MockEmailService,
    models::{
        Category, Comment, Genre, Review, Role, SlugInput, Title, TitleFilter, TitleInput,
        UpdateTitleRequest, User,
    },
    repository::Repository,
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// Stable principals used across the test files.
pub const ADMIN_ID: Uuid = Uuid::from_u128(1);
pub const MODERATOR_ID: Uuid = Uuid::from_u128(2);
pub const USER_ID: Uuid = Uuid::from_u128(3);
pub const OTHER_USER_ID: Uuid = Uuid::from_u128(4);
pub const TITLE_ID: Uuid = Uuid::from_u128(100);

pub fn admin() -> AuthUser {
    AuthUser {
        id: ADMIN_ID,
        username: "root".to_string(),
        role: Role::Admin,
    }
}

pub fn moderator() -> AuthUser {
    AuthUser {
        id: MODERATOR_ID,
        username: "mod".to_string(),
        role: Role::Moderator,
    }
}

pub fn regular_user() -> AuthUser {
    AuthUser {
        id: USER_ID,
        username: "alice".to_string(),
        role: Role::User,
    }
}

pub fn sample_user(id: Uuid, username: &str, role: Role) -> User {
    User {
        id,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        role,
        is_confirmed: true,
    }
}

pub fn sample_title(rating: Option<f64>) -> Title {
    Title {
        id: TITLE_ID,
        name: "Dune".to_string(),
        year: 1965,
        rating,
        description: None,
        genre: vec![Genre {
            name: "Sci-Fi".to_string(),
            slug: "sci-fi".to_string(),
        }],
        category: Category {
            name: "Books".to_string(),
            slug: "books".to_string(),
        },
        pub_date: Utc::now(),
    }
}

pub fn sample_review(author_id: Uuid) -> Review {
    Review {
        id: 1,
        title_id: TITLE_ID,
        author_id,
        author: "author".to_string(),
        score: 7,
        text: "solid".to_string(),
        pub_date: Utc::now(),
    }
}

pub fn sample_comment(author_id: Uuid) -> Comment {
    Comment {
        id: 1,
        review_id: 1,
        author_id,
        author: "author".to_string(),
        text: "agreed".to_string(),
        pub_date: Utc::now(),
    }
}

// --- Mock Repository ---

/// Central control point for handler tests: pre-canned outputs per entity,
/// plus recorded confirmation-code traffic for the signup flow tests.
pub struct MockRepo {
    pub user: Option<User>,
    pub user_by_username: Option<User>,
    pub user_by_email: Option<User>,
    pub users: Vec<User>,
    pub categories: Vec<Category>,
    pub genres: Vec<Genre>,
    pub title: Option<Title>,
    pub titles: Vec<Title>,
    pub review: Option<Review>,
    pub reviews: Vec<Review>,
    pub comment: Option<Comment>,
    pub comments: Vec<Comment>,
    /// The code `confirmation_code` hands back.
    pub stored_code: Option<String>,
    /// Result of every delete operation.
    pub delete_ok: bool,
    /// Id assigned to users created through `create_user`.
    pub created_user_id: Uuid,
    /// Recorded `store_confirmation_code` calls.
    pub stored_codes: Mutex<Vec<(Uuid, String)>>,
    /// Recorded `confirm_user` calls.
    pub confirmed: Mutex<Vec<Uuid>>,
}

impl Default for MockRepo {
    fn default() -> Self {
        MockRepo {
            user: None,
            user_by_username: None,
            user_by_email: None,
            users: vec![],
            categories: vec![],
            genres: vec![],
            title: None,
            titles: vec![],
            review: None,
            reviews: vec![],
            comment: None,
            comments: vec![],
            stored_code: None,
            delete_ok: false,
            created_user_id: Uuid::from_u128(42),
            stored_codes: Mutex::new(vec![]),
            confirmed: Mutex::new(vec![]),
        }
    }
}

#[async_trait]
impl Repository for MockRepo {
    async fn list_users(
        &self,
        _search: Option<String>,
        _limit: i64,
        _offset: i64,
    ) -> sqlx::Result<(i64, Vec<User>)> {
        Ok((self.users.len() as i64, self.users.clone()))
    }

    async fn get_user(&self, _id: Uuid) -> sqlx::Result<Option<User>> {
        Ok(self.user.clone())
    }

    async fn get_user_by_username(&self, _username: &str) -> sqlx::Result<Option<User>> {
        Ok(self.user_by_username.clone())
    }

    async fn get_user_by_email(&self, _email: &str) -> sqlx::Result<Option<User>> {
        Ok(self.user_by_email.clone())
    }

    async fn create_user(&self, username: &str, email: &str, role: Role) -> sqlx::Result<User> {
        Ok(User {
            id: self.created_user_id,
            username: username.to_string(),
            email: email.to_string(),
            role,
            is_confirmed: false,
        })
    }

    async fn update_user(
        &self,
        _username: &str,
        email: Option<String>,
        role: Option<Role>,
    ) -> sqlx::Result<Option<User>> {
        Ok(self.user_by_username.clone().map(|mut u| {
            if let Some(email) = email {
                u.email = email;
            }
            if let Some(role) = role {
                u.role = role;
            }
            u
        }))
    }

    async fn delete_user(&self, _username: &str) -> sqlx::Result<bool> {
        Ok(self.delete_ok)
    }

    async fn store_confirmation_code(&self, user_id: Uuid, code: &str) -> sqlx::Result<()> {
        self.stored_codes
            .lock()
            .unwrap()
            .push((user_id, code.to_string()));
        Ok(())
    }

    async fn confirmation_code(&self, _user_id: Uuid) -> sqlx::Result<Option<String>> {
        Ok(self.stored_code.clone())
    }

    async fn confirm_user(&self, user_id: Uuid) -> sqlx::Result<()> {
        self.confirmed.lock().unwrap().push(user_id);
        Ok(())
    }

    async fn list_categories(
        &self,
        _search: Option<String>,
        _limit: i64,
        _offset: i64,
    ) -> sqlx::Result<(i64, Vec<Category>)> {
        Ok((self.categories.len() as i64, self.categories.clone()))
    }

    async fn create_category(&self, input: &SlugInput) -> sqlx::Result<Category> {
        Ok(Category {
            name: input.name.clone(),
            slug: input.slug.clone(),
        })
    }

    async fn delete_category(&self, _slug: &str) -> sqlx::Result<bool> {
        Ok(self.delete_ok)
    }

    async fn list_genres(
        &self,
        _search: Option<String>,
        _limit: i64,
        _offset: i64,
    ) -> sqlx::Result<(i64, Vec<Genre>)> {
        Ok((self.genres.len() as i64, self.genres.clone()))
    }

    async fn create_genre(&self, input: &SlugInput) -> sqlx::Result<Genre> {
        Ok(Genre {
            name: input.name.clone(),
            slug: input.slug.clone(),
        })
    }

    async fn delete_genre(&self, _slug: &str) -> sqlx::Result<bool> {
        Ok(self.delete_ok)
    }

    async fn list_titles(
        &self,
        _filter: &TitleFilter,
        _limit: i64,
        _offset: i64,
    ) -> sqlx::Result<(i64, Vec<Title>)> {
        Ok((self.titles.len() as i64, self.titles.clone()))
    }

    async fn get_title(&self, _id: Uuid) -> sqlx::Result<Option<Title>> {
        Ok(self.title.clone())
    }

    async fn create_title(&self, _input: &TitleInput) -> sqlx::Result<Option<Title>> {
        Ok(self.title.clone())
    }

    async fn update_title(
        &self,
        _id: Uuid,
        _req: &UpdateTitleRequest,
    ) -> sqlx::Result<Option<Title>> {
        Ok(self.title.clone())
    }

    async fn delete_title(&self, _id: Uuid) -> sqlx::Result<bool> {
        Ok(self.delete_ok)
    }

    async fn list_reviews(
        &self,
        _title_id: Uuid,
        _limit: i64,
        _offset: i64,
    ) -> sqlx::Result<(i64, Vec<Review>)> {
        Ok((self.reviews.len() as i64, self.reviews.clone()))
    }

    async fn get_review(&self, _title_id: Uuid, _review_id: i64) -> sqlx::Result<Option<Review>> {
        Ok(self.review.clone())
    }

    async fn create_review(
        &self,
        title_id: Uuid,
        author_id: Uuid,
        score: i32,
        text: &str,
    ) -> sqlx::Result<Review> {
        Ok(Review {
            id: 1,
            title_id,
            author_id,
            author: "author".to_string(),
            score,
            text: text.to_string(),
            pub_date: Utc::now(),
        })
    }

    async fn update_review(
        &self,
        _review_id: i64,
        text: Option<String>,
        score: Option<i32>,
    ) -> sqlx::Result<Option<Review>> {
        Ok(self.review.clone().map(|mut r| {
            if let Some(text) = text {
                r.text = text;
            }
            if let Some(score) = score {
                r.score = score;
            }
            r
        }))
    }

    async fn delete_review(&self, _review_id: i64) -> sqlx::Result<bool> {
        Ok(self.delete_ok)
    }

    async fn list_comments(
        &self,
        _review_id: i64,
        _limit: i64,
        _offset: i64,
    ) -> sqlx::Result<(i64, Vec<Comment>)> {
        Ok((self.comments.len() as i64, self.comments.clone()))
    }

    async fn get_comment(
        &self,
        _review_id: i64,
        _comment_id: i64,
    ) -> sqlx::Result<Option<Comment>> {
        Ok(self.comment.clone())
    }

    async fn create_comment(
        &self,
        review_id: i64,
        author_id: Uuid,
        text: &str,
    ) -> sqlx::Result<Comment> {
        Ok(Comment {
            id: 1,
            review_id,
            author_id,
            author: "author".to_string(),
            text: text.to_string(),
            pub_date: Utc::now(),
        })
    }

    async fn update_comment(
        &self,
        _comment_id: i64,
        text: &str,
    ) -> sqlx::Result<Option<Comment>> {
        Ok(self.comment.clone().map(|mut c| {
            c.text = text.to_string();
            c
        }))
    }

    async fn delete_comment(&self, _comment_id: i64) -> sqlx::Result<bool> {
        Ok(self.delete_ok)
    }
}

// --- State builders ---

pub fn test_state(repo: MockRepo) -> AppState {
    AppState {
        repo: Arc::new(repo),
        email: Arc::new(MockEmailService::new()),
        config: AppConfig::default(),
    }
}

/// Variant keeping a handle on the email mock for send assertions.
pub fn test_state_with_email(repo: MockRepo, email: Arc<MockEmailService>) -> AppState {
    AppState {
        repo: Arc::new(repo),
        email,
        config: AppConfig::default(),
    }
}
