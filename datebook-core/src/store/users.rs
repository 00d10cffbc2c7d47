//! User storage (`users.csv`).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::table::{CsvTable, Outcome, Record};
use crate::error::{DatebookError, DatebookResult};
use crate::user::{NewUser, User};

#[derive(Serialize, Deserialize)]
pub struct UserRow {
    id: u64,
    name: String,
    email: String,
    password: String,
}

impl Record for User {
    type Row = UserRow;

    const HEADERS: &'static [&'static str] = &["id", "name", "email", "password"];

    fn key(&self) -> u64 {
        self.id
    }

    fn to_row(&self) -> UserRow {
        UserRow {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }

    fn from_row(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password: row.password,
        }
    }
}

pub struct UserStore {
    table: CsvTable<User>,
}

impl UserStore {
    pub const FILE_NAME: &'static str = "users.csv";

    pub fn open(path: impl Into<PathBuf>) -> DatebookResult<Self> {
        Ok(UserStore {
            table: CsvTable::open(path)?,
        })
    }

    pub fn list(&self) -> Vec<User> {
        self.table.all()
    }

    pub fn find_by_id(&self, id: u64) -> Option<User> {
        self.table.find(|u| u.id == id)
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        let email = email.trim();
        self.table.find(|u| u.email.eq_ignore_ascii_case(email))
    }

    /// Register a user. Emails are unique, ignoring case.
    pub fn create(&self, new: NewUser) -> DatebookResult<User> {
        new.validate()?;

        let user = self.table.mutate(|rows| {
            let email = new.email.trim();
            if rows.records.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
                return Err(DatebookError::validation(format!(
                    "email '{email}' is already registered"
                )));
            }
            let user = new.into_user(rows.ids.allocate());
            rows.records.push(user.clone());
            Ok(Outcome::changed(user))
        })?;

        tracing::info!(id = user.id, "Registered user");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn test_create_and_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::open(dir.path().join(UserStore::FILE_NAME)).unwrap();

        let ada = store.create(new_user("Ada", "ada@example.com")).unwrap();
        let bob = store.create(new_user("Bob", "bob@example.com")).unwrap();

        assert_eq!((ada.id, bob.id), (1, 2));
        assert_eq!(store.find_by_email("ADA@example.com").unwrap().id, 1);
        assert_eq!(store.find_by_id(2).unwrap().name, "Bob");
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::open(dir.path().join(UserStore::FILE_NAME)).unwrap();
        store.create(new_user("Ada", "ada@example.com")).unwrap();

        let err = store.create(new_user("Ada 2", "Ada@Example.com")).unwrap_err();
        assert!(matches!(err, DatebookError::Validation(_)));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_password_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(UserStore::FILE_NAME);
        UserStore::open(&path)
            .unwrap()
            .create(new_user("Ada", "ada@example.com"))
            .unwrap();

        let reopened = UserStore::open(&path).unwrap();
        assert_eq!(reopened.find_by_id(1).unwrap().password, "secret");
    }
}
