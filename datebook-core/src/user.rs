//! Users that own events.

use serde::{Deserialize, Serialize};

use crate::error::{DatebookError, DatebookResult};

/// A registered user.
///
/// The password is stored as supplied and is never serialized back out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn validate(&self) -> DatebookResult<()> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("name is required".to_string());
        }
        if !looks_like_email(&self.email) {
            errors.push(format!("'{}' is not a valid email address", self.email));
        }
        if self.password.is_empty() {
            errors.push("password is required".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DatebookError::Validation(errors))
        }
    }

    pub fn into_user(self, id: u64) -> User {
        User {
            id,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
        }
    }
}

fn looks_like_email(s: &str) -> bool {
    let s = s.trim();
    match s.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !s.contains(' '),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ada".to_string(),
            email: email.to_string(),
            password: "hunter2".to_string(),
        }
    }

    #[test]
    fn test_validate_email() {
        assert!(new_user("ada@example.com").validate().is_ok());
        assert!(new_user("ada").validate().is_err());
        assert!(new_user("@example.com").validate().is_err());
        assert!(new_user("ada@localhost").validate().is_err());
    }

    #[test]
    fn test_password_not_serialized() {
        let user = new_user("ada@example.com").into_user(1);
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "ada@example.com");
    }
}
