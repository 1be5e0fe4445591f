// src/services/user_directory.rs
// DOCUMENTATION: In-memory user registry
// PURPOSE: Look up travelers by user name from any worker

use crate::errors::{Result, TourGuideError};
use crate::models::User;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Thread-safe user registry keyed by user name
#[derive(Default)]
pub struct UserDirectory {
    users: RwLock<HashMap<String, Arc<User>>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user; returns false if the name is already taken
    pub async fn add_user(&self, user: Arc<User>) -> bool {
        let mut users = self.users.write().await;
        if users.contains_key(&user.user_name) {
            log::debug!("User {} already registered", user.user_name);
            return false;
        }
        users.insert(user.user_name.clone(), user);
        true
    }

    pub async fn get_user(&self, user_name: &str) -> Result<Arc<User>> {
        self.users
            .read()
            .await
            .get(user_name)
            .cloned()
            .ok_or_else(|| TourGuideError::UserNotFound(user_name.to_string()))
    }

    pub async fn all_users(&self) -> Vec<Arc<User>> {
        self.users.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}
