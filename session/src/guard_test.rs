use super::*;
use crate::types::User;

fn user(role: Role) -> User {
    User {
        id: 42,
        username: "mia".into(),
        email: "mia@example.com".into(),
        role,
        is_active: true,
        created_at: "2024-02-02T00:00:00".into(),
        updated_at: None,
    }
}

#[test]
fn loading_while_bootstrapping() {
    let state = SessionState::bootstrapping();
    assert_eq!(check(&state, Role::User), Access::Loading);
    assert_eq!(check(&state, Role::Admin), Access::Loading);
}

#[test]
fn anonymous_is_redirected() {
    let state = SessionState::anonymous();
    assert_eq!(check(&state, Role::User), Access::RedirectToLogin);
    assert_eq!(check(&state, Role::Admin), Access::RedirectToLogin);
}

#[test]
fn plain_user_is_denied_admin_views() {
    let state = SessionState::authenticated(user(Role::User));
    assert_eq!(check(&state, Role::User), Access::Granted);
    assert_eq!(check(&state, Role::Admin), Access::Denied);
}

#[test]
fn admin_is_granted_everything() {
    let state = SessionState::authenticated(user(Role::Admin));
    assert_eq!(check(&state, Role::User), Access::Granted);
    assert_eq!(check(&state, Role::Admin), Access::Granted);
}

#[test]
fn retained_error_does_not_affect_access() {
    let state = SessionState::anonymous().with_error("Login failed");
    assert_eq!(check(&state, Role::User), Access::RedirectToLogin);
}
