//! User Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{User, UserRole};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

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

    /// Create a user. The unique email index turns races into `Duplicate`.
    pub async fn create(
        &self,
        email: String,
        name: String,
        password_hash: String,
        role: UserRole,
    ) -> RepoResult<User> {
        let user: Option<User> = self
            .base
            .db()
            .create(USER_TABLE)
            .content(User {
                id: None,
                email,
                name,
                password_hash,
                role,
                created_at: Utc::now(),
            })
            .await?;
        user.ok_or_else(|| RepoError::Database("create returned no user".into()))
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email")
            .bind(("email", email.to_string()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let user: Option<User> = self.base.db().select(parse_id(USER_TABLE, id)?).await?;
        Ok(user)
    }
}
