use serde::Serialize;
use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String, // argon2 hash, not exposed in JSON
}

/// Fields accepted on insert; the id is generated by the repository.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// The only columns an update may touch.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
}
