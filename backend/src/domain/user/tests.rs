//! Validation coverage for account value types.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(0)]
#[case(-3)]
fn user_id_rejects_non_positive_values(#[case] raw: i32) {
    assert_eq!(UserId::new(raw), Err(UserValidationError::InvalidId));
}

#[rstest]
fn username_is_trimmed() {
    let username = Username::new("  alice ").expect("valid username");
    assert_eq!(username.as_ref(), "alice");
}

#[rstest]
#[case("", UserValidationError::EmptyUsername)]
#[case("   ", UserValidationError::EmptyUsername)]
fn username_rejects_blank(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Username::new(raw), Err(expected));
}

#[rstest]
fn username_length_is_capped() {
    let long = "u".repeat(ACCOUNT_FIELD_MAX + 1);
    assert_eq!(
        Username::new(long),
        Err(UserValidationError::UsernameTooLong {
            max: ACCOUNT_FIELD_MAX
        })
    );
    assert!(Username::new("u".repeat(ACCOUNT_FIELD_MAX)).is_ok());
}

#[rstest]
#[case("alice@example.com")]
#[case(" bob@localhost ")]
fn email_accepts_simple_addresses(#[case] raw: &str) {
    let email = EmailAddress::new(raw).expect("valid email");
    assert_eq!(email.as_ref(), raw.trim());
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("alice", UserValidationError::InvalidEmail)]
#[case("@example.com", UserValidationError::InvalidEmail)]
#[case("alice@", UserValidationError::InvalidEmail)]
#[case("a@b@c", UserValidationError::InvalidEmail)]
#[case("al ice@example.com", UserValidationError::InvalidEmail)]
fn email_rejects_malformed_addresses(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(EmailAddress::new(raw), Err(expected));
}

#[rstest]
#[case(UserValidationError::EmptyUsername, "username", "empty_username")]
#[case(UserValidationError::InvalidEmail, "email", "invalid_email")]
#[case(
    UserValidationError::PasswordTooLong { max: ACCOUNT_FIELD_MAX },
    "password",
    "password_too_long"
)]
fn errors_name_their_field(
    #[case] error: UserValidationError,
    #[case] field: &str,
    #[case] reason: &str,
) {
    assert_eq!(error.field(), field);
    assert_eq!(error.reason(), reason);
}

#[rstest]
fn user_serialises_without_password() {
    let user = User::new(
        UserId::new(4).expect("id"),
        Username::new("alice").expect("username"),
        EmailAddress::new("alice@example.com").expect("email"),
        30,
    );
    let value = serde_json::to_value(&user).expect("serialise user");
    assert_eq!(
        value,
        json!({ "id": 4, "username": "alice", "email": "alice@example.com", "points": 30 })
    );
}

#[rstest]
fn user_deserialisation_validates_fields() {
    let result: Result<User, _> = serde_json::from_value(
        json!({ "id": 0, "username": "alice", "email": "alice@example.com", "points": 0 }),
    );
    assert!(result.is_err());
}
