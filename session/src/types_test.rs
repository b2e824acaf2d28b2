use super::*;

fn alice_json() -> &'static str {
    r#"{
        "id": 3,
        "username": "alice",
        "email": "alice@example.com",
        "role": "admin",
        "is_active": true,
        "created_at": "2024-05-01T09:30:00.123456",
        "updated_at": "2024-05-02T10:00:00"
    }"#
}

#[test]
fn user_deserializes_backend_payload() {
    let user: User = serde_json::from_str(alice_json()).unwrap();
    assert_eq!(user.id, 3);
    assert_eq!(user.role, Role::Admin);
    assert!(user.is_admin());
    assert_eq!(user.updated_at.as_deref(), Some("2024-05-02T10:00:00"));
}

#[test]
fn user_without_updated_at_is_accepted() {
    let json = r#"{"id":1,"username":"bob","email":"b@x.com","role":"user","is_active":false,"created_at":"2024-01-01T00:00:00"}"#;
    let user: User = serde_json::from_str(json).unwrap();
    assert!(user.updated_at.is_none());
    assert!(!user.is_admin());
    assert_eq!(user.status_label(), "Inactive");
}

#[test]
fn unknown_role_is_rejected() {
    let json = r#"{"id":1,"username":"bob","email":"b@x.com","role":"root","is_active":true,"created_at":""}"#;
    assert!(serde_json::from_str::<User>(json).is_err());
}

#[test]
fn created_date_takes_date_part() {
    let user: User = serde_json::from_str(alice_json()).unwrap();
    assert_eq!(user.created_date(), Some("2024-05-01"));
}

#[test]
fn created_date_empty_is_none() {
    let mut user: User = serde_json::from_str(alice_json()).unwrap();
    user.created_at = String::new();
    assert_eq!(user.created_date(), None);
}

#[test]
fn role_parses_case_insensitively() {
    assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
    assert_eq!(" user ".parse::<Role>(), Ok(Role::User));
    assert!("owner".parse::<Role>().is_err());
}

#[test]
fn role_update_serializes_lowercase() {
    let body = serde_json::to_value(RoleUpdate { role: Role::Admin }).unwrap();
    assert_eq!(body, serde_json::json!({ "role": "admin" }));
}

#[test]
fn token_response_tolerates_missing_token_type() {
    let token: TokenResponse = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
    assert_eq!(token.access_token, "abc");
    assert!(token.token_type.is_none());
}
