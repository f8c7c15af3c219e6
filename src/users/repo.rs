use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewUser, User, UserChanges};

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("user not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error("a user with email {0} already exists")]
    EmailTaken(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence access for the `users` table.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_all(&self) -> Result<Vec<User>, RepoError>;
    async fn get_by_id(&self, id: &str) -> Result<User, RepoError>;
    async fn get_by_email(&self, email: &str) -> Result<User, RepoError>;
    /// Validates, assigns a fresh id and inserts.
    async fn create(&self, new_user: NewUser) -> Result<User, RepoError>;
    /// Overwrites name and email only.
    async fn update(&self, id: &str, changes: &UserChanges) -> Result<(), RepoError>;
    async fn delete(&self, id: &str) -> Result<(), RepoError>;
}

pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn map_write_error(err: sqlx::Error, email: &str) -> RepoError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            RepoError::EmailTaken(email.to_string())
        }
        _ => RepoError::Database(err),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_all(&self) -> Result<Vec<User>, RepoError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password
            FROM users
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(users)
    }

    async fn get_by_id(&self, id: &str) -> Result<User, RepoError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(RepoError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> Result<User, RepoError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(RepoError::NotFound)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        new_user.validate().map_err(RepoError::Validation)?;

        let id = Uuid::new_v4().to_string();
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password
            "#,
        )
        .bind(&id)
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_write_error(e, &new_user.email))
    }

    async fn update(&self, id: &str, changes: &UserChanges) -> Result<(), RepoError> {
        changes.validate().map_err(RepoError::Validation)?;

        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $1, email = $2
            WHERE id = $3
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(id)
        .execute(&self.db)
        .await
        .map_err(|e| map_write_error(e, &changes.email))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
