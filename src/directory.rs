//! Registered user directory. Usernames are unique and case-sensitive; passwords
//! are stored as given and compared by direct equality.

use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password: String,
}

/// Thread-safe user directory handle. Registration takes the exclusive lock so
/// the uniqueness check and the insert are a single step.
#[derive(Clone)]
pub struct SharedDirectory {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl Default for SharedDirectory {
    fn default() -> Self { Self::new() }
}

impl SharedDirectory {
    pub fn new() -> Self {
        Self { users: Arc::new(RwLock::new(HashMap::new())) }
    }

    pub fn len(&self) -> usize { self.users.read().len() }
    pub fn is_empty(&self) -> bool { self.users.read().is_empty() }

    /// True if a user with this exact username exists.
    pub fn contains(&self, username: &str) -> bool {
        self.users.read().contains_key(username)
    }

    /// Create a new user. Fails on empty fields or a duplicate username.
    pub fn register(&self, username: &str, password: &str) -> AppResult<()> {
        if username.is_empty() || password.is_empty() {
            return Err(AppError::user("missing_fields", "Registration failed: Username and password are required"));
        }
        let mut users = self.users.write();
        if users.contains_key(username) {
            return Err(AppError::conflict("username_taken", "Registration failed: Username already exists"));
        }
        users.insert(
            username.to_string(),
            User { username: username.to_string(), password: password.to_string() },
        );
        Ok(())
    }

    /// True iff a user exists with exactly this username and password.
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        let users = self.users.read();
        users.get(username).map(|user| user.password == password).unwrap_or(false)
    }
}
