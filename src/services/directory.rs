/*
 * Responsibility
 * - username → UserRecord の解決 (user directory collaborator)
 * - Postgres 実装 (sqlx) と in-memory 実装を同じ trait の裏に置く
 * - 見つからない場合は NotFound を返す (呼び出し側で握りつぶさない)
 */
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use thiserror::Error;

use crate::models::{Authority, UserRecord};

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("user not found: {username}")]
    NotFound { username: String },
    #[error("db error")]
    Backend(#[from] sqlx::Error),
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn load_by_username(&self, username: &str) -> Result<UserRecord, DirectoryError>;
}

#[derive(Debug, FromRow)]
struct UserRow {
    #[sqlx(rename = "userId")]
    id: i64,
    #[sqlx(rename = "userName")]
    user_name: String,
    #[sqlx(rename = "passwordHash")]
    password_hash: String,
    authorities: Vec<String>,
    enabled: bool,
    #[sqlx(rename = "lastPasswordReset")]
    last_password_reset: Option<DateTime<Utc>>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.user_name,
            password_hash: row.password_hash,
            authorities: row.authorities.into_iter().map(Authority::new).collect(),
            enabled: row.enabled,
            last_password_reset: row.last_password_reset,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    db: PgPool,
}

impl PgUserDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn load_by_username(&self, username: &str) -> Result<UserRecord, DirectoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT "userId", "userName", "passwordHash", "authorities", "enabled", "lastPasswordReset"
            FROM users
            WHERE "userName" = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        row.map(UserRecord::from)
            .ok_or_else(|| DirectoryError::NotFound {
                username: username.to_string(),
            })
    }
}

/// Fixed set of users kept in memory. Lookups are exact-match on username.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: HashMap<String, UserRecord>,
}

impl InMemoryUserDirectory {
    pub fn new(users: impl IntoIterator<Item = UserRecord>) -> Self {
        Self {
            users: users
                .into_iter()
                .map(|u| (u.username.clone(), u))
                .collect(),
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn load_by_username(&self, username: &str) -> Result<UserRecord, DirectoryError> {
        self.users
            .get(username)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound {
                username: username.to_string(),
            })
    }
}
