use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::jwt::JwtKeys;
use crate::config::JwtConfig;
use crate::users::repo::{PgUserRepository, UserRepository};

#[derive(Clone)]
pub struct AppState {
    pub jwt: JwtKeys,
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    pub fn new(jwt: &JwtConfig, db: PgPool) -> Self {
        let users = Arc::new(PgUserRepository::new(db)) as Arc<dyn UserRepository>;
        Self::from_parts(jwt, users)
    }

    pub fn from_parts(jwt: &JwtConfig, users: Arc<dyn UserRepository>) -> Self {
        Self {
            jwt: JwtKeys::new(jwt),
            users,
        }
    }

    #[cfg(test)]
    pub fn test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 5,
            refresh_ttl_minutes: 60,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::users::memory::MemoryUserRepository;

        Self::fake_with(Arc::new(MemoryUserRepository::default()))
    }

    #[cfg(test)]
    pub fn fake_with(users: Arc<dyn UserRepository>) -> Self {
        Self::from_parts(&Self::test_jwt_config(), users)
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
