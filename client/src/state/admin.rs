//! Admin panel view state.

#[cfg(test)]
#[path = "admin_test.rs"]
mod admin_test;

use std::collections::BTreeSet;

use session::admin::DirectoryError;
use session::{Role, User, UserDirectory};

/// How long success and error banners stay visible.
pub const NOTICE_DISMISS_MS: u32 = 3_000;

pub const CONFIRM_DELETE: &str = "Are you sure you want to delete this user?";

#[derive(Clone, Debug, Default)]
pub struct AdminState {
    pub directory: UserDirectory,
    pub loading: bool,
    /// Rows with a role change or delete in flight.
    pub pending: BTreeSet<i64>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl AdminState {
    /// Loading state for the admin whose id is `current_user_id`.
    pub fn for_admin(current_user_id: Option<i64>) -> Self {
        Self {
            directory: UserDirectory::new(current_user_id),
            loading: true,
            ..Self::default()
        }
    }

    /// Start an action on `user_id`, clearing both banners.
    pub fn begin(&mut self, user_id: i64) {
        self.pending.insert(user_id);
        self.error = None;
        self.notice = None;
    }

    /// Patch the live list after the backend confirmed a role change.
    pub fn role_changed(&mut self, user_id: i64, role: Role, notice: &str) {
        self.directory.apply_role(user_id, role);
        self.finish(user_id, notice);
    }

    /// Drop the row after the backend confirmed a delete.
    pub fn user_removed(&mut self, user_id: i64, notice: &str) {
        self.directory.remove(user_id);
        self.finish(user_id, notice);
    }

    pub fn failed(&mut self, user_id: Option<i64>, err: &DirectoryError, fallback: &str) {
        if let Some(id) = user_id {
            self.pending.remove(&id);
        }
        self.loading = false;
        self.error = Some(err.message_or(fallback));
    }

    fn finish(&mut self, user_id: i64, notice: &str) {
        self.pending.remove(&user_id);
        self.notice = Some(notice.to_owned());
    }

    /// Drop `message` if it is still the banner being shown.
    pub fn dismiss(&mut self, message: &str) {
        if self.notice.as_deref() == Some(message) {
            self.notice = None;
        }
        if self.error.as_deref() == Some(message) {
            self.error = None;
        }
    }

    pub fn is_pending(&self, user_id: i64) -> bool {
        self.pending.contains(&user_id)
    }

    /// Role selector is locked for the signed-in admin and busy rows.
    pub fn role_locked(&self, user_id: i64) -> bool {
        !self.directory.can_modify(user_id) || self.is_pending(user_id)
    }
}

/// Label for the role selector options.
pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "User",
        Role::Admin => "Admin",
    }
}

/// Table cell for the username, marking the signed-in admin.
pub fn username_cell(directory: &UserDirectory, user: &User) -> String {
    if directory.is_current_user(user.id) {
        format!("{} (You)", user.username)
    } else {
        user.username.clone()
    }
}
