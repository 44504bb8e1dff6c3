use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, query_builder::QueryBuilder};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{
    Category, Comment, Genre, Review, Role, SlugInput, Title, TitleFilter, TitleInput,
    UpdateTitleRequest, User,
};

/// Repository Trait
///
/// Abstract contract for all persistence operations, shared as a trait object
/// (`Arc<dyn Repository>`) so handlers never depend on a concrete backend and
/// tests substitute an in-memory mock.
///
/// List operations return `(total_count, page)` so handlers can build bounded
/// page responses without a second round trip through the trait.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn list_users(
        &self,
        search: Option<String>,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<(i64, Vec<User>)>;
    async fn get_user(&self, id: Uuid) -> sqlx::Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> sqlx::Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> sqlx::Result<Option<User>>;
    async fn create_user(&self, username: &str, email: &str, role: Role) -> sqlx::Result<User>;
    /// Partial update; `None` when no such user.
    async fn update_user(
        &self,
        username: &str,
        email: Option<String>,
        role: Option<Role>,
    ) -> sqlx::Result<Option<User>>;
    async fn delete_user(&self, username: &str) -> sqlx::Result<bool>;

    // --- Confirmation codes ---
    /// Upsert: one stored code per user, latest wins.
    async fn store_confirmation_code(&self, user_id: Uuid, code: &str) -> sqlx::Result<()>;
    async fn confirmation_code(&self, user_id: Uuid) -> sqlx::Result<Option<String>>;
    async fn confirm_user(&self, user_id: Uuid) -> sqlx::Result<()>;

    // --- Categories / Genres ---
    async fn list_categories(
        &self,
        search: Option<String>,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<(i64, Vec<Category>)>;
    async fn create_category(&self, input: &SlugInput) -> sqlx::Result<Category>;
    async fn delete_category(&self, slug: &str) -> sqlx::Result<bool>;

    async fn list_genres(
        &self,
        search: Option<String>,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<(i64, Vec<Genre>)>;
    async fn create_genre(&self, input: &SlugInput) -> sqlx::Result<Genre>;
    async fn delete_genre(&self, slug: &str) -> sqlx::Result<bool>;

    // --- Titles ---
    async fn list_titles(
        &self,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<(i64, Vec<Title>)>;
    async fn get_title(&self, id: Uuid) -> sqlx::Result<Option<Title>>;
    /// `None` when a category or genre slug does not resolve.
    async fn create_title(&self, input: &TitleInput) -> sqlx::Result<Option<Title>>;
    /// `None` when a referenced slug does not resolve; callers check the
    /// title's existence beforehand.
    async fn update_title(
        &self,
        id: Uuid,
        req: &UpdateTitleRequest,
    ) -> sqlx::Result<Option<Title>>;
    async fn delete_title(&self, id: Uuid) -> sqlx::Result<bool>;

    // --- Reviews ---
    async fn list_reviews(
        &self,
        title_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<(i64, Vec<Review>)>;
    async fn get_review(&self, title_id: Uuid, review_id: i64) -> sqlx::Result<Option<Review>>;
    /// Author and title come from the server side; the (title, author)
    /// uniqueness constraint surfaces as a database error on violation.
    async fn create_review(
        &self,
        title_id: Uuid,
        author_id: Uuid,
        score: i32,
        text: &str,
    ) -> sqlx::Result<Review>;
    async fn update_review(
        &self,
        review_id: i64,
        text: Option<String>,
        score: Option<i32>,
    ) -> sqlx::Result<Option<Review>>;
    async fn delete_review(&self, review_id: i64) -> sqlx::Result<bool>;

    // --- Comments ---
    async fn list_comments(
        &self,
        review_id: i64,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<(i64, Vec<Comment>)>;
    async fn get_comment(&self, review_id: i64, comment_id: i64)
    -> sqlx::Result<Option<Comment>>;
    async fn create_comment(
        &self,
        review_id: i64,
        author_id: Uuid,
        text: &str,
    ) -> sqlx::Result<Comment>;
    async fn update_comment(&self, comment_id: i64, text: &str)
    -> sqlx::Result<Option<Comment>>;
    async fn delete_comment(&self, comment_id: i64) -> sqlx::Result<bool>;
}

/// RepositoryState
///
/// The concrete type used to share persistence access across the application.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// `Repository` implementation backed by PostgreSQL through a shared pool.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// --- Internal query rows ---

/// Flat title row before genre stitching. `rating` is the review-score mean
/// computed in SQL, cast to float8 so it decodes without a numeric type.
#[derive(FromRow)]
struct TitleRow {
    id: Uuid,
    name: String,
    year: i32,
    description: Option<String>,
    rating: Option<f64>,
    category_name: String,
    category_slug: String,
    pub_date: DateTime<Utc>,
}

#[derive(FromRow)]
struct TitleGenreRow {
    title_id: Uuid,
    name: String,
    slug: String,
}

const TITLE_SELECT: &str = r#"
    SELECT t.id, t.name, t.year, t.description, t.pub_date,
           c.name AS category_name, c.slug AS category_slug,
           AVG(r.score)::float8 AS rating
    FROM titles t
    JOIN categories c ON c.id = t.category_id
    LEFT JOIN reviews r ON r.title_id = t.id
"#;

const TITLE_GROUP_BY: &str =
    " GROUP BY t.id, t.name, t.year, t.description, t.pub_date, c.name, c.slug ";

impl PostgresRepository {
    /// Loads genre sets for a batch of titles in one query.
    async fn genres_for(&self, title_ids: &[Uuid]) -> sqlx::Result<HashMap<Uuid, Vec<Genre>>> {
        if title_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, TitleGenreRow>(
            r#"
            SELECT tg.title_id, g.name, g.slug
            FROM title_genres tg
            JOIN genres g ON g.id = tg.genre_id
            WHERE tg.title_id = ANY($1)
            ORDER BY g.slug
            "#,
        )
        .bind(title_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        let mut by_title: HashMap<Uuid, Vec<Genre>> = HashMap::new();
        for row in rows {
            by_title.entry(row.title_id).or_default().push(Genre {
                name: row.name,
                slug: row.slug,
            });
        }
        Ok(by_title)
    }

    fn assemble_title(row: TitleRow, genres: Vec<Genre>) -> Title {
        Title {
            id: row.id,
            name: row.name,
            year: row.year,
            rating: row.rating,
            description: row.description,
            genre: genres,
            category: Category {
                name: row.category_name,
                slug: row.category_slug,
            },
            pub_date: row.pub_date,
        }
    }

    /// Appends the WHERE clause for the title listing filters to a builder.
    /// Used identically by the count and the page query.
    fn push_title_filters(builder: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &TitleFilter) {
        builder.push(" WHERE TRUE ");

        if let Some(name) = &filter.name {
            builder.push(" AND t.name ILIKE ");
            builder.push_bind(format!("%{name}%"));
        }
        if let Some(category) = &filter.category {
            builder.push(" AND c.slug = ");
            builder.push_bind(category.clone());
        }
        if let Some(genre) = &filter.genre {
            builder.push(
                " AND EXISTS (SELECT 1 FROM title_genres tg JOIN genres g ON g.id = tg.genre_id \
                 WHERE tg.title_id = t.id AND g.slug = ",
            );
            builder.push_bind(genre.clone());
            builder.push(") ");
        }
        if let Some(year) = filter.year {
            builder.push(" AND t.year = ");
            builder.push_bind(year);
        }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- USERS ---

    async fn list_users(
        &self,
        search: Option<String>,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<(i64, Vec<User>)> {
        let mut count_builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM users WHERE TRUE ");
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "SELECT id, username, email, role, is_confirmed FROM users WHERE TRUE ",
        );

        if let Some(s) = &search {
            let pattern = format!("%{s}%");
            count_builder.push(" AND username ILIKE ");
            count_builder.push_bind(pattern.clone());
            builder.push(" AND username ILIKE ");
            builder.push_bind(pattern);
        }

        let count: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        builder.push(" ORDER BY username LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let users = builder
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await?;

        Ok((count, users))
    }

    async fn get_user(&self, id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, role, is_confirmed FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_user_by_username(&self, username: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, role, is_confirmed FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_user_by_email(&self, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, role, is_confirmed FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_user(&self, username: &str, email: &str, role: Role) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, role, is_confirmed)
            VALUES ($1, $2, $3, $4, false)
            RETURNING id, username, email, role, is_confirmed
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
    }

    async fn update_user(
        &self,
        username: &str,
        email: Option<String>,
        role: Option<Role>,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                role = COALESCE($3, role)
            WHERE username = $1
            RETURNING id, username, email, role, is_confirmed
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(role.map(|r| r.as_str()))
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_user(&self, username: &str) -> sqlx::Result<bool> {
        let res = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- CONFIRMATION CODES ---

    async fn store_confirmation_code(&self, user_id: Uuid, code: &str) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO confirmation_codes (user_id, code, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id) DO UPDATE SET code = EXCLUDED.code, created_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(code)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn confirmation_code(&self, user_id: Uuid) -> sqlx::Result<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT code FROM confirmation_codes WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn confirm_user(&self, user_id: Uuid) -> sqlx::Result<()> {
        sqlx::query("UPDATE users SET is_confirmed = true WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // --- CATEGORIES ---

    async fn list_categories(
        &self,
        search: Option<String>,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<(i64, Vec<Category>)> {
        let mut count_builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM categories WHERE TRUE ");
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT name, slug FROM categories WHERE TRUE ");

        if let Some(s) = &search {
            let pattern = format!("%{s}%");
            count_builder.push(" AND name ILIKE ");
            count_builder.push_bind(pattern.clone());
            builder.push(" AND name ILIKE ");
            builder.push_bind(pattern);
        }

        let count: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        builder.push(" ORDER BY slug LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let categories = builder
            .build_query_as::<Category>()
            .fetch_all(&self.pool)
            .await?;

        Ok((count, categories))
    }

    async fn create_category(&self, input: &SlugInput) -> sqlx::Result<Category> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, name, slug) VALUES ($1, $2, $3) RETURNING name, slug",
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.slug)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_category(&self, slug: &str) -> sqlx::Result<bool> {
        let res = sqlx::query("DELETE FROM categories WHERE slug = $1")
            .bind(slug)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- GENRES ---

    async fn list_genres(
        &self,
        search: Option<String>,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<(i64, Vec<Genre>)> {
        let mut count_builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM genres WHERE TRUE ");
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT name, slug FROM genres WHERE TRUE ");

        if let Some(s) = &search {
            let pattern = format!("%{s}%");
            count_builder.push(" AND name ILIKE ");
            count_builder.push_bind(pattern.clone());
            builder.push(" AND name ILIKE ");
            builder.push_bind(pattern);
        }

        let count: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        builder.push(" ORDER BY slug LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let genres = builder
            .build_query_as::<Genre>()
            .fetch_all(&self.pool)
            .await?;

        Ok((count, genres))
    }

    async fn create_genre(&self, input: &SlugInput) -> sqlx::Result<Genre> {
        sqlx::query_as::<_, Genre>(
            "INSERT INTO genres (id, name, slug) VALUES ($1, $2, $3) RETURNING name, slug",
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.slug)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_genre(&self, slug: &str) -> sqlx::Result<bool> {
        let res = sqlx::query("DELETE FROM genres WHERE slug = $1")
            .bind(slug)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- TITLES ---

    async fn list_titles(
        &self,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<(i64, Vec<Title>)> {
        let mut count_builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "SELECT COUNT(*) FROM titles t JOIN categories c ON c.id = t.category_id ",
        );
        Self::push_title_filters(&mut count_builder, filter);

        let count: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(TITLE_SELECT);
        Self::push_title_filters(&mut builder, filter);
        builder.push(TITLE_GROUP_BY);
        builder.push(" ORDER BY t.pub_date DESC LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows = builder
            .build_query_as::<TitleRow>()
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut genres = self.genres_for(&ids).await?;

        let titles = rows
            .into_iter()
            .map(|row| {
                let g = genres.remove(&row.id).unwrap_or_default();
                Self::assemble_title(row, g)
            })
            .collect();

        Ok((count, titles))
    }

    async fn get_title(&self, id: Uuid) -> sqlx::Result<Option<Title>> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(TITLE_SELECT);
        builder.push(" WHERE t.id = ");
        builder.push_bind(id);
        builder.push(TITLE_GROUP_BY);

        let row = builder
            .build_query_as::<TitleRow>()
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let mut genres = self.genres_for(&[row.id]).await?;
                let g = genres.remove(&row.id).unwrap_or_default();
                Ok(Some(Self::assemble_title(row, g)))
            }
            None => Ok(None),
        }
    }

    async fn create_title(&self, input: &TitleInput) -> sqlx::Result<Option<Title>> {
        let mut tx = self.pool.begin().await?;

        let category_id: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM categories WHERE slug = $1")
                .bind(&input.category)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(category_id) = category_id else {
            return Ok(None);
        };

        let genre_ids: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM genres WHERE slug = ANY($1)")
            .bind(input.genre.clone())
            .fetch_all(&mut *tx)
            .await?;
        if genre_ids.len() != input.genre.len() {
            // At least one slug did not resolve; roll back by dropping tx.
            return Ok(None);
        }

        let title_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO titles (id, name, year, description, category_id, pub_date)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.description)
        .bind(category_id)
        .fetch_one(&mut *tx)
        .await?;

        for genre_id in &genre_ids {
            sqlx::query("INSERT INTO title_genres (title_id, genre_id) VALUES ($1, $2)")
                .bind(title_id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        self.get_title(title_id).await
    }

    async fn update_title(
        &self,
        id: Uuid,
        req: &UpdateTitleRequest,
    ) -> sqlx::Result<Option<Title>> {
        let mut tx = self.pool.begin().await?;

        let category_id: Option<Uuid> = match &req.category {
            Some(slug) => {
                let resolved = sqlx::query_scalar("SELECT id FROM categories WHERE slug = $1")
                    .bind(slug)
                    .fetch_optional(&mut *tx)
                    .await?;
                if resolved.is_none() {
                    return Ok(None);
                }
                resolved
            }
            None => None,
        };

        sqlx::query(
            r#"
            UPDATE titles
            SET name = COALESCE($2, name),
                year = COALESCE($3, year),
                description = COALESCE($4, description),
                category_id = COALESCE($5, category_id)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(req.year)
        .bind(&req.description)
        .bind(category_id)
        .execute(&mut *tx)
        .await?;

        if let Some(slugs) = &req.genre {
            let genre_ids: Vec<Uuid> =
                sqlx::query_scalar("SELECT id FROM genres WHERE slug = ANY($1)")
                    .bind(slugs.clone())
                    .fetch_all(&mut *tx)
                    .await?;
            if genre_ids.len() != slugs.len() {
                return Ok(None);
            }

            sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for genre_id in &genre_ids {
                sqlx::query("INSERT INTO title_genres (title_id, genre_id) VALUES ($1, $2)")
                    .bind(id)
                    .bind(genre_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        self.get_title(id).await
    }

    async fn delete_title(&self, id: Uuid) -> sqlx::Result<bool> {
        let res = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- REVIEWS ---

    async fn list_reviews(
        &self,
        title_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<(i64, Vec<Review>)> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE title_id = $1")
            .bind(title_id)
            .fetch_one(&self.pool)
            .await?;

        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT r.id, r.title_id, r.author_id, u.username AS author,
                   r.score, r.text, r.pub_date
            FROM reviews r
            JOIN users u ON u.id = r.author_id
            WHERE r.title_id = $1
            ORDER BY r.pub_date DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(title_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((count, reviews))
    }

    async fn get_review(&self, title_id: Uuid, review_id: i64) -> sqlx::Result<Option<Review>> {
        sqlx::query_as::<_, Review>(
            r#"
            SELECT r.id, r.title_id, r.author_id, u.username AS author,
                   r.score, r.text, r.pub_date
            FROM reviews r
            JOIN users u ON u.id = r.author_id
            WHERE r.id = $1 AND r.title_id = $2
            "#,
        )
        .bind(review_id)
        .bind(title_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_review(
        &self,
        title_id: Uuid,
        author_id: Uuid,
        score: i32,
        text: &str,
    ) -> sqlx::Result<Review> {
        // CTE insert + join so the response carries the author's username
        // without a second query.
        sqlx::query_as::<_, Review>(
            r#"
            WITH inserted AS (
                INSERT INTO reviews (title_id, author_id, score, text, pub_date)
                VALUES ($1, $2, $3, $4, NOW())
                RETURNING id, title_id, author_id, score, text, pub_date
            )
            SELECT i.id, i.title_id, i.author_id, u.username AS author,
                   i.score, i.text, i.pub_date
            FROM inserted i
            JOIN users u ON u.id = i.author_id
            "#,
        )
        .bind(title_id)
        .bind(author_id)
        .bind(score)
        .bind(text)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_review(
        &self,
        review_id: i64,
        text: Option<String>,
        score: Option<i32>,
    ) -> sqlx::Result<Option<Review>> {
        sqlx::query_as::<_, Review>(
            r#"
            WITH updated AS (
                UPDATE reviews
                SET text = COALESCE($2, text),
                    score = COALESCE($3, score)
                WHERE id = $1
                RETURNING id, title_id, author_id, score, text, pub_date
            )
            SELECT u2.id, u2.title_id, u2.author_id, u.username AS author,
                   u2.score, u2.text, u2.pub_date
            FROM updated u2
            JOIN users u ON u.id = u2.author_id
            "#,
        )
        .bind(review_id)
        .bind(text)
        .bind(score)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_review(&self, review_id: i64) -> sqlx::Result<bool> {
        let res = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(review_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- COMMENTS ---

    async fn list_comments(
        &self,
        review_id: i64,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<(i64, Vec<Comment>)> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE review_id = $1")
            .bind(review_id)
            .fetch_one(&self.pool)
            .await?;

        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.id, c.review_id, c.author_id, u.username AS author,
                   c.text, c.pub_date
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.review_id = $1
            ORDER BY c.pub_date ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(review_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((count, comments))
    }

    async fn get_comment(
        &self,
        review_id: i64,
        comment_id: i64,
    ) -> sqlx::Result<Option<Comment>> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.id, c.review_id, c.author_id, u.username AS author,
                   c.text, c.pub_date
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.id = $1 AND c.review_id = $2
            "#,
        )
        .bind(comment_id)
        .bind(review_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_comment(
        &self,
        review_id: i64,
        author_id: Uuid,
        text: &str,
    ) -> sqlx::Result<Comment> {
        sqlx::query_as::<_, Comment>(
            r#"
            WITH inserted AS (
                INSERT INTO comments (review_id, author_id, text, pub_date)
                VALUES ($1, $2, $3, NOW())
                RETURNING id, review_id, author_id, text, pub_date
            )
            SELECT i.id, i.review_id, i.author_id, u.username AS author,
                   i.text, i.pub_date
            FROM inserted i
            JOIN users u ON u.id = i.author_id
            "#,
        )
        .bind(review_id)
        .bind(author_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_comment(
        &self,
        comment_id: i64,
        text: &str,
    ) -> sqlx::Result<Option<Comment>> {
        sqlx::query_as::<_, Comment>(
            r#"
            WITH updated AS (
                UPDATE comments SET text = $2 WHERE id = $1
                RETURNING id, review_id, author_id, text, pub_date
            )
            SELECT u2.id, u2.review_id, u2.author_id, u.username AS author,
                   u2.text, u2.pub_date
            FROM updated u2
            JOIN users u ON u.id = u2.author_id
            "#,
        )
        .bind(comment_id)
        .bind(text)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_comment(&self, comment_id: i64) -> sqlx::Result<bool> {
        let res = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
