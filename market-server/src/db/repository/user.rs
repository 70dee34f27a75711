//! User Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::User;
use crate::utils::time;
use shared::Role;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::RecordId;

const USER_TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a user account. The unique index on email turns races into
    /// a Duplicate error.
    pub async fn create(&self, email: String, password_hash: String, role: Role) -> RepoResult<User> {
        let user = User {
            id: None,
            email,
            password: password_hash,
            role,
            profile: None,
            is_verified: false,
            created_at: time::now_rfc3339(),
        };
        let created: Option<User> = self.base.db().create(USER_TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY created_at")
            .await?
            .take(0)?;
        Ok(users)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let rid = parse_record_id(USER_TABLE, id)?;
        let user: Option<User> = self.base.db().select(rid).await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    /// Link the role profile record created during registration
    pub async fn link_profile(&self, user_id: &RecordId, profile: RecordId) -> RepoResult<User> {
        let users: Vec<User> = self
            .base
            .db()
            .query("UPDATE $user SET profile = $profile RETURN AFTER")
            .bind(("user", user_id.clone()))
            .bind(("profile", profile))
            .await?
            .take(0)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", user_id)))
    }

    pub async fn set_role(&self, id: &str, role: Role) -> RepoResult<User> {
        let rid = parse_record_id(USER_TABLE, id)?;
        let users: Vec<User> = self
            .base
            .db()
            .query("UPDATE $user SET role = $role RETURN AFTER")
            .bind(("user", rid))
            .bind(("role", role))
            .await?
            .take(0)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    pub async fn set_verified(&self, id: &str, verified: bool) -> RepoResult<User> {
        let rid = parse_record_id(USER_TABLE, id)?;
        let users: Vec<User> = self
            .base
            .db()
            .query("UPDATE $user SET is_verified = $verified RETURN AFTER")
            .bind(("user", rid))
            .bind(("verified", verified))
            .await?
            .take(0)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = parse_record_id(USER_TABLE, id)?;
        let deleted: Option<User> = self.base.db().delete(rid).await?;
        Ok(deleted.is_some())
    }
}
