/// User model and database operations
///
/// This module provides the User model and CRUD operations for managing user
/// identities. Users own zero or more tasks.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     username VARCHAR(255) NOT NULL UNIQUE,
///     first_name VARCHAR(255) NOT NULL,
///     last_name VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::user::{User, CreateUser};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     username: "nik".to_string(),
///     first_name: "Nik".to_string(),
///     last_name: "Spyratos".to_string(),
/// }).await?;
/// println!("Created user: {}", user.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// User model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (system-assigned)
    pub id: i64,

    /// Username, unique across all users
    pub username: String,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// When the user was created
    pub created_at: DateTime<Utc>,

    /// When the user was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Username (must be unique)
    pub username: String,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,
}

/// Input for updating an existing user
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New username
    pub username: Option<String>,

    /// New first name
    pub first_name: Option<String>,

    /// New last name
    pub last_name: Option<String>,
}

impl UpdateUser {
    /// Checks whether the update carries no changes
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.first_name.is_none() && self.last_name.is_none()
    }
}

impl User {
    /// Creates a new user in the database
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Username already exists (unique constraint violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, first_name, last_name)
            VALUES ($1, $2, $3)
            RETURNING id, username, first_name, last_name, created_at, updated_at
            "#,
        )
        .bind(data.username)
        .bind(data.first_name)
        .bind(data.last_name)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    ///
    /// # Returns
    ///
    /// The user if found, None otherwise
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, first_name, last_name, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, first_name, last_name, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Updates an existing user
    ///
    /// Only non-None fields in `data` will be updated. The `updated_at`
    /// timestamp is automatically set to the current time.
    ///
    /// # Returns
    ///
    /// The updated user if found, None if user doesn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Username already exists for another user
    /// - Database connection fails
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.username.is_some() {
            bind_count += 1;
            query.push_str(&format!(", username = ${}", bind_count));
        }
        if data.first_name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", first_name = ${}", bind_count));
        }
        if data.last_name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", last_name = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, username, first_name, last_name, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(username) = data.username {
            q = q.bind(username);
        }
        if let Some(first_name) = data.first_name {
            q = q.bind(first_name);
        }
        if let Some(last_name) = data.last_name {
            q = q.bind(last_name);
        }

        let user = q.fetch_optional(pool).await?;

        Ok(user)
    }

    /// Lists all users, oldest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, first_name, last_name, created_at, updated_at
            FROM users
            ORDER BY id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Counts total number of users
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_user_default_is_empty() {
        let update = UpdateUser::default();
        assert!(update.is_empty());
        assert!(update.username.is_none());
        assert!(update.first_name.is_none());
        assert!(update.last_name.is_none());
    }

    #[test]
    fn test_update_user_with_field_is_not_empty() {
        let update = UpdateUser {
            first_name: Some("Updated".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    // Database-backed tests live in tests/pg_store_tests.rs
}
