use super::*;
use session::ApiError;

fn user(id: i64, username: &str, role: Role) -> User {
    User {
        id,
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        role,
        is_active: true,
        created_at: "2024-01-02T03:04:05".to_owned(),
        updated_at: None,
    }
}

fn loaded() -> AdminState {
    AdminState {
        directory: UserDirectory::with_users(
            Some(1),
            vec![user(1, "alice", Role::Admin), user(7, "dave", Role::User), user(9, "erin", Role::User)],
        ),
        ..AdminState::default()
    }
}

#[test]
fn for_admin_starts_loading() {
    let state = AdminState::for_admin(Some(1));
    assert!(state.loading);
    assert!(state.directory.users().is_empty());
    assert!(state.directory.is_current_user(1));
}

#[test]
fn own_row_and_pending_rows_are_locked() {
    let mut state = loaded();
    assert!(state.role_locked(1));
    assert!(!state.role_locked(7));
    state.begin(7);
    assert!(state.role_locked(7));
}

#[test]
fn begin_clears_banners() {
    let mut state = loaded();
    state.error = Some("old".to_owned());
    state.notice = Some("older".to_owned());
    state.begin(7);
    assert!(state.is_pending(7));
    assert!(state.error.is_none());
    assert!(state.notice.is_none());
}

#[test]
fn failure_prefers_backend_detail() {
    let mut state = loaded();
    state.begin(7);
    let err = DirectoryError::Api(ApiError::Rejected {
        status: 400,
        detail: Some("Cannot change your own role".to_owned()),
    });
    state.failed(Some(7), &err, session::admin::ROLE_UPDATE_FAILED);
    assert_eq!(state.error.as_deref(), Some("Cannot change your own role"));
    assert!(state.pending.is_empty());
}

#[test]
fn failure_without_detail_uses_fallback() {
    let mut state = loaded();
    let err = DirectoryError::Api(ApiError::Rejected { status: 500, detail: None });
    state.failed(Some(7), &err, session::admin::DELETE_FAILED);
    assert_eq!(state.error.as_deref(), Some("Failed to delete user"));
}

#[test]
fn dismiss_only_clears_matching_banner() {
    let mut state = loaded();
    state.notice = Some("User deleted successfully".to_owned());
    state.dismiss("User role updated successfully");
    assert!(state.notice.is_some());
    state.dismiss("User deleted successfully");
    assert!(state.notice.is_none());
}

#[test]
fn current_user_is_marked() {
    let state = loaded();
    assert_eq!(username_cell(&state.directory, &user(1, "alice", Role::Admin)), "alice (You)");
    assert_eq!(username_cell(&state.directory, &user(7, "dave", Role::User)), "dave");
}

#[test]
fn overlapping_actions_each_land_on_the_live_list() {
    let mut state = loaded();
    state.begin(7);
    state.begin(9);
    assert!(state.role_locked(7));
    assert!(state.role_locked(9));

    state.user_removed(7, session::admin::USER_DELETED);
    assert!(state.role_locked(9));
    state.role_changed(9, Role::Admin, session::admin::ROLE_UPDATED);

    assert!(state.directory.get(7).is_none());
    assert_eq!(state.directory.get(9).map(|u| u.role), Some(Role::Admin));
    assert!(state.pending.is_empty());
    assert_eq!(state.notice.as_deref(), Some("User role updated successfully"));
}

#[test]
fn failure_on_one_row_keeps_the_other_pending() {
    let mut state = loaded();
    state.begin(7);
    state.begin(9);
    let err = DirectoryError::Api(ApiError::Network("reset".to_owned()));
    state.failed(Some(7), &err, session::admin::DELETE_FAILED);
    assert!(!state.is_pending(7));
    assert!(state.is_pending(9));
    assert!(state.directory.get(7).is_some());
}
