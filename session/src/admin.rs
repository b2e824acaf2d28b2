//! Admin panel user directory.
//!
//! DESIGN
//! ======
//! The list is fetched once and then patched locally after each successful
//! role change or delete, mirroring what the backend just confirmed instead of
//! refetching. The signed-in admin's own row is read-only here and on the
//! backend.

#[cfg(test)]
#[path = "admin_test.rs"]
mod admin_test;

use crate::error::ApiError;
use crate::gateway::ApiClient;
use crate::types::{Role, User};

pub const FETCH_FAILED: &str = "Failed to fetch users";
pub const ROLE_UPDATE_FAILED: &str = "Failed to update user role";
pub const DELETE_FAILED: &str = "Failed to delete user";
pub const ROLE_UPDATED: &str = "User role updated successfully";
pub const USER_DELETED: &str = "User deleted successfully";

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("cannot modify your own account")]
    OwnAccount,
    #[error("user {0} is not in the directory")]
    UnknownUser(i64),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl DirectoryError {
    /// Text for the admin panel's error banner.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            Self::Api(e) => e.message_or(fallback),
            other => other.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectoryStats {
    pub total: usize,
    pub regular: usize,
    pub admins: usize,
    pub active: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserDirectory {
    users: Vec<User>,
    current_user_id: Option<i64>,
}

impl UserDirectory {
    /// Empty directory for the admin whose id is `current_user_id`.
    #[must_use]
    pub fn new(current_user_id: Option<i64>) -> Self {
        Self { users: Vec::new(), current_user_id }
    }

    #[must_use]
    pub fn with_users(current_user_id: Option<i64>, users: Vec<User>) -> Self {
        Self { users, current_user_id }
    }

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    #[must_use]
    pub fn get(&self, user_id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    #[must_use]
    pub fn is_current_user(&self, user_id: i64) -> bool {
        self.current_user_id == Some(user_id)
    }

    #[must_use]
    pub fn can_modify(&self, user_id: i64) -> bool {
        !self.is_current_user(user_id)
    }

    #[must_use]
    pub fn stats(&self) -> DirectoryStats {
        DirectoryStats {
            total: self.users.len(),
            regular: self.users.iter().filter(|u| u.role == Role::User).count(),
            admins: self.users.iter().filter(|u| u.role == Role::Admin).count(),
            active: self.users.iter().filter(|u| u.is_active).count(),
        }
    }

    /// Replace the list with a fresh `GET /users/`.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the current list is left untouched.
    pub async fn refresh(&mut self, api: &ApiClient) -> Result<(), DirectoryError> {
        self.users = api.list_users().await?;
        tracing::debug!(count = self.users.len(), "user directory loaded");
        Ok(())
    }

    /// Change a user's role and patch the local row.
    ///
    /// # Errors
    ///
    /// [`DirectoryError::OwnAccount`] before any call for the signed-in
    /// admin; otherwise the gateway error.
    pub async fn change_role(&mut self, api: &ApiClient, user_id: i64, role: Role) -> Result<(), DirectoryError> {
        self.request_role_change(api, user_id, role).await?;
        self.apply_role(user_id, role);
        Ok(())
    }

    /// Delete a user and drop the local row.
    ///
    /// # Errors
    ///
    /// [`DirectoryError::OwnAccount`] before any call for the signed-in
    /// admin; otherwise the gateway error.
    pub async fn delete(&mut self, api: &ApiClient, user_id: i64) -> Result<(), DirectoryError> {
        self.request_delete(api, user_id).await?;
        self.remove(user_id);
        Ok(())
    }

    /// Backend half of [`Self::change_role`]; leaves the list untouched so
    /// callers holding a snapshot can patch the live list afterwards.
    ///
    /// # Errors
    ///
    /// Same as [`Self::change_role`].
    pub async fn request_role_change(&self, api: &ApiClient, user_id: i64, role: Role) -> Result<(), DirectoryError> {
        self.ensure_modifiable(user_id)?;
        api.update_user_role(user_id, role).await?;
        tracing::info!(user_id, %role, "user role updated");
        Ok(())
    }

    /// Backend half of [`Self::delete`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::delete`].
    pub async fn request_delete(&self, api: &ApiClient, user_id: i64) -> Result<(), DirectoryError> {
        self.ensure_modifiable(user_id)?;
        api.delete_user(user_id).await?;
        tracing::info!(user_id, "user deleted");
        Ok(())
    }

    pub fn apply_role(&mut self, user_id: i64, role: Role) {
        if let Some(user) = self.users.iter_mut().find(|u| u.id == user_id) {
            user.role = role;
        }
    }

    pub fn remove(&mut self, user_id: i64) {
        self.users.retain(|u| u.id != user_id);
    }

    fn ensure_modifiable(&self, user_id: i64) -> Result<(), DirectoryError> {
        if self.is_current_user(user_id) {
            return Err(DirectoryError::OwnAccount);
        }
        if self.get(user_id).is_none() {
            return Err(DirectoryError::UnknownUser(user_id));
        }
        Ok(())
    }
}
