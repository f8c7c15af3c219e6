use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::repo::{RepoError, UserRepository};
use super::repo_types::{NewUser, User, UserChanges};

/// In-process stand-in for the Postgres repository, used by handler tests.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn get_all(&self) -> Result<Vec<User>, RepoError> {
        let mut users = self.users.lock().unwrap().clone();
        users.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn get_by_id(&self, id: &str) -> Result<User, RepoError> {
        let users = self.users.lock().unwrap();
        users.iter().find(|u| u.id == id).cloned().ok_or(RepoError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> Result<User, RepoError> {
        let users = self.users.lock().unwrap();
        users.iter().find(|u| u.email == email).cloned().ok_or(RepoError::NotFound)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        new_user.validate().map_err(RepoError::Validation)?;
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(RepoError::EmailTaken(new_user.email));
        }
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: new_user.name,
            email: new_user.email,
            password: new_user.password_hash,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: &str, changes: &UserChanges) -> Result<(), RepoError> {
        changes.validate().map_err(RepoError::Validation)?;
        let mut users = self.users.lock().unwrap();
        if !users.iter().any(|u| u.id == id) {
            return Err(RepoError::NotFound);
        }
        if users.iter().any(|u| u.email == changes.email && u.id != id) {
            return Err(RepoError::EmailTaken(changes.email.clone()));
        }
        let user = users.iter_mut().find(|u| u.id == id).ok_or(RepoError::NotFound)?;
        user.name = changes.name.clone();
        user.email = changes.email.clone();
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

/// Repository whose store is always unreachable.
pub struct BrokenUserRepository;

fn unreachable_store() -> RepoError {
    RepoError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl UserRepository for BrokenUserRepository {
    async fn get_all(&self) -> Result<Vec<User>, RepoError> {
        Err(unreachable_store())
    }

    async fn get_by_id(&self, _id: &str) -> Result<User, RepoError> {
        Err(unreachable_store())
    }

    async fn get_by_email(&self, _email: &str) -> Result<User, RepoError> {
        Err(unreachable_store())
    }

    async fn create(&self, _new_user: NewUser) -> Result<User, RepoError> {
        Err(unreachable_store())
    }

    async fn update(&self, _id: &str, _changes: &UserChanges) -> Result<(), RepoError> {
        Err(unreachable_store())
    }

    async fn delete(&self, _id: &str) -> Result<(), RepoError> {
        Err(unreachable_store())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn update_of_missing_id_is_not_found_even_when_email_is_taken() {
        let repo = MemoryUserRepository::default();
        repo.create(NewUser {
            name: "Taken".into(),
            email: "taken@example.com".into(),
            password_hash: "hash".into(),
        })
        .await
        .unwrap();

        let changes = UserChanges {
            name: "Ghost".into(),
            email: "taken@example.com".into(),
        };
        let err = repo.update("missing", &changes).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }
}
