//! Unit tests for user domain types.

use crate::user::domain::{NewUser, UserDomainError, UserRole};
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
#[case("ada")]
#[case("  grace_hopper  ")]
#[case("a-very-long-but-still-acceptable-username-of-fifty")]
fn valid_usernames_are_accepted(#[case] input: &str) {
    let user = NewUser::new(input, "someone@example.com", UserRole::User, &DefaultClock)
        .expect("username should be accepted");
    assert_eq!(user.username, input.trim());
    assert!(user.is_active);
}

#[rstest]
#[case("ab")]
#[case("   ")]
#[case("this-username-is-definitely-longer-than-fifty-characters")]
fn out_of_range_usernames_are_rejected(#[case] input: &str) {
    let result = NewUser::new(input, "someone@example.com", UserRole::User, &DefaultClock);
    assert_eq!(
        result,
        Err(UserDomainError::InvalidUsername(input.to_owned()))
    );
}

#[rstest]
#[case("no-at-sign")]
#[case("@example.com")]
#[case("user@")]
#[case("a@b@c")]
fn malformed_emails_are_rejected(#[case] input: &str) {
    let result = NewUser::new("ada", input, UserRole::Admin, &DefaultClock);
    assert_eq!(result, Err(UserDomainError::InvalidEmail(input.to_owned())));
}

#[rstest]
#[case("admin", UserRole::Admin)]
#[case(" USER ", UserRole::User)]
fn roles_parse_case_insensitively(#[case] raw: &str, #[case] expected: UserRole) {
    assert_eq!(UserRole::try_from(raw), Ok(expected));
}

#[rstest]
fn unknown_role_is_rejected() {
    assert!(UserRole::try_from("owner").is_err());
}
