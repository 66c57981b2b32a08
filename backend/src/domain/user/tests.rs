//! Tests for user validation and updates.

use chrono::TimeZone;
use rstest::{fixture, rstest};

use super::*;

fn input(first: Option<&str>, last: Option<&str>, role: Option<&str>) -> UserInput {
    UserInput {
        first_name: first.map(str::to_owned),
        last_name: last.map(str::to_owned),
        role: role.map(str::to_owned),
    }
}

#[fixture]
fn ada() -> User {
    let draft = UserDraft::validate(input(Some("Ada"), Some("Lovelace"), Some("citizen")))
        .expect("valid draft");
    let created_at = Utc
        .with_ymd_and_hms(2024, 5, 1, 8, 0, 0)
        .single()
        .expect("valid timestamp");
    User::new(UserId::random(), draft, created_at)
}

#[rstest]
fn validate_accepts_a_complete_payload() {
    let draft = UserDraft::validate(input(Some("Jo"), Some("Smith"), Some("manager")))
        .expect("valid draft");
    assert_eq!(draft.first_name.as_str(), "Jo");
    assert_eq!(draft.role, Role::Manager);
}

#[rstest]
#[case(input(None, Some("Smith"), Some("citizen")), "firstName", codes::REQUIRED)]
#[case(input(Some("J"), Some("Smith"), Some("citizen")), "firstName", codes::TOO_SHORT)]
#[case(
    input(Some("Jo"), Some("Abcdefghijklmnopqrstu"), Some("citizen")),
    "lastName",
    codes::TOO_LONG
)]
#[case(input(Some("Jo"), Some("Smith"), None), "role", codes::REQUIRED)]
#[case(input(Some("Jo"), Some("Smith"), Some("Citizen")), "role", codes::INVALID_ENUM)]
fn validate_reports_the_failing_field(
    #[case] payload: UserInput,
    #[case] field: &str,
    #[case] code: &str,
) {
    let errors = UserDraft::validate(payload).expect_err("invalid payload");
    let violation = errors
        .violations()
        .iter()
        .find(|v| v.field() == field)
        .expect("violation for field");
    assert_eq!(violation.code(), code);
}

#[rstest]
fn validate_collects_every_violation() {
    let errors = UserDraft::validate(UserInput::default()).expect_err("empty payload");
    assert_eq!(errors.violations().len(), 3);
}

#[rstest]
fn replaced_keeps_identity_and_creation_time(ada: User) {
    let draft = UserDraft::validate(input(Some("Grace"), Some("Hopper"), Some("manager")))
        .expect("valid draft");
    let replaced = ada.replaced(draft);
    assert_eq!(replaced.id(), ada.id());
    assert_eq!(replaced.created_at(), ada.created_at());
    assert_eq!(replaced.first_name().as_str(), "Grace");
    assert_eq!(replaced.role(), Role::Manager);
}

#[rstest]
fn patched_only_touches_supplied_fields(ada: User) {
    let patch = UserPatch {
        role: FieldUpdate::Set("manager".to_owned()),
        ..UserPatch::default()
    };
    let patched = ada.patched(patch).expect("valid patch");
    assert_eq!(patched.first_name(), ada.first_name());
    assert_eq!(patched.last_name(), ada.last_name());
    assert_eq!(patched.role(), Role::Manager);
}

#[rstest]
fn patched_rejects_clearing_a_required_field(ada: User) {
    let patch = UserPatch {
        last_name: FieldUpdate::Cleared,
        ..UserPatch::default()
    };
    let errors = ada.patched(patch).expect_err("cleared name");
    assert!(errors.has_field("lastName"));
}

#[rstest]
fn empty_patch_is_detected() {
    assert!(UserPatch::default().is_empty());
    assert!(
        !UserPatch {
            first_name: FieldUpdate::Set("Al".to_owned()),
            ..UserPatch::default()
        }
        .is_empty()
    );
}

#[rstest]
#[case("citizen", Role::Citizen)]
#[case("manager", Role::Manager)]
fn role_round_trips_through_text(#[case] raw: &str, #[case] role: Role) {
    assert_eq!(raw.parse::<Role>().expect("known role"), role);
    assert_eq!(role.to_string(), raw);
}
