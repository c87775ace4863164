/*
 * Responsibility
 * - 認証対象ユーザーの読み取り専用レコード (user directory が供給する)
 * - 権限 (Authority) の型
 */
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A granted permission or role, e.g. `ROLE_ADMIN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Authority(String);

impl Authority {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Authoritative identity record.
///
/// - `password_hash` is never serialized and never printed via Debug.
/// - `last_password_reset` lets token validation reject tokens issued before a credential change.
#[derive(Clone, Serialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    #[serde(skip)]
    pub password_hash: String,
    pub authorities: Vec<Authority>,
    pub enabled: bool,
    pub last_password_reset: Option<DateTime<Utc>>,
}

impl UserRecord {
    pub fn new(id: i64, username: impl Into<String>, authorities: Vec<Authority>) -> Self {
        Self {
            id,
            username: username.into(),
            password_hash: String::new(),
            authorities,
            enabled: true,
            last_password_reset: None,
        }
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("authorities", &self.authorities)
            .field("enabled", &self.enabled)
            .field("last_password_reset", &self.last_password_reset)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_password_hash() {
        let mut user = UserRecord::new(1, "alice", vec![Authority::new("ROLE_USER")]);
        user.password_hash = "$2a$10$abcdef".to_string();

        let printed = format!("{user:?}");
        assert!(printed.contains("alice"));
        assert!(!printed.contains("$2a$10$abcdef"));
    }

    #[test]
    fn serialization_skips_password_hash() {
        let mut user = UserRecord::new(7, "bob", vec![Authority::new("ROLE_ADMIN")]);
        user.password_hash = "hash".to_string();

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["username"], "bob");
        assert_eq!(json["authorities"][0], "ROLE_ADMIN");
        assert!(json.get("password_hash").is_none());
    }
}
