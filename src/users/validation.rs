use lazy_static::lazy_static;
use regex::Regex;

use super::repo_types::{NewUser, UserChanges};

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Returns the first problem found, as a client-facing message.
pub fn check_name_and_email(name: &str, email: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("name is required".into());
    }
    if email.trim().is_empty() {
        return Err("email is required".into());
    }
    if !is_valid_email(email) {
        return Err("email is invalid".into());
    }
    Ok(())
}

impl NewUser {
    pub fn validate(&self) -> Result<(), String> {
        check_name_and_email(&self.name, &self.email)?;
        if self.password_hash.is_empty() {
            return Err("password is required".into());
        }
        Ok(())
    }
}

impl UserChanges {
    pub fn validate(&self) -> Result<(), String> {
        check_name_and_email(&self.name, &self.email)
    }
}
