use super::*;

fn user(role: &str, account_active: bool, is_banned: bool) -> User {
    User {
        id: 3,
        role: role.to_owned(),
        username: "sam".to_owned(),
        email: "sam@example.test".to_owned(),
        account_active,
        is_banned,
    }
}

#[test]
fn user_deserializes_full_payload() {
    let raw = r#"{"id":7,"role":"user","username":"a","email":"a@x.com","account_active":true,"is_banned":false}"#;
    let parsed: User = serde_json::from_str(raw).unwrap();
    assert_eq!(parsed.id, 7);
    assert_eq!(parsed.role, "user");
    assert_eq!(parsed.username, "a");
    assert_eq!(parsed.email, "a@x.com");
    assert!(parsed.account_active);
    assert!(!parsed.is_banned);
}

#[test]
fn user_ignores_unknown_fields() {
    let raw = r#"{"id":1,"role":"admin","username":"root","email":"r@x.com","account_active":true,"is_banned":false,"avatar":"x.png"}"#;
    let parsed: User = serde_json::from_str(raw).unwrap();
    assert_eq!(parsed.role, "admin");
}

#[test]
fn user_rejects_partial_payload() {
    let raw = r#"{"id":1,"role":"admin"}"#;
    assert!(serde_json::from_str::<User>(raw).is_err());
}

#[test]
fn user_rejects_error_body() {
    let raw = r#"{"error":"unauthorized"}"#;
    assert!(serde_json::from_str::<User>(raw).is_err());
}

#[test]
fn is_moderator_matches_exact_role() {
    assert!(user("moderator", true, false).is_moderator());
    assert!(!user("Moderator", true, false).is_moderator());
    assert!(!user("admin", true, false).is_moderator());
}

#[test]
fn can_act_requires_active_and_not_banned() {
    assert!(user("user", true, false).can_act());
    assert!(!user("user", false, false).can_act());
    assert!(!user("user", true, true).can_act());
}
