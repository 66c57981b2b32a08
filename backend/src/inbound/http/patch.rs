//! Whitelist projection for partial updates.
//!
//! A PATCH body is first reduced to the whitelisted keys with [`pick`], then
//! each remaining key becomes a typed [`FieldUpdate`]: absent keys leave the
//! field alone, `null` clears it and a value of the right JSON type sets it.

use serde_json::{Map, Value};

use crate::domain::validation::codes;
use crate::domain::{FieldUpdate, FieldViolation, IssuePatch, UserPatch, ValidationErrors};

/// Fields a user PATCH may touch.
pub const USER_PATCH_FIELDS: &[&str] = &["firstName", "lastName", "role"];

/// Fields an issue PATCH may touch. `updatedAt` is accepted but the stored
/// value always comes from the clock.
pub const ISSUE_PATCH_FIELDS: &[&str] = &[
    "status",
    "description",
    "imageUrl",
    "latitude",
    "longitude",
    "updatedAt",
];

/// Keep only the whitelisted keys of `payload`.
///
/// # Examples
/// ```
/// use civic_backend::inbound::http::patch::pick;
/// use serde_json::json;
///
/// let payload = json!({ "role": "manager", "id": "forged" });
/// let picked = pick(payload.as_object().cloned().unwrap_or_default(), &["role"]);
/// assert_eq!(picked.len(), 1);
/// assert!(picked.contains_key("role"));
/// ```
pub fn pick(mut payload: Map<String, Value>, whitelist: &[&str]) -> Map<String, Value> {
    payload.retain(|key, _| whitelist.contains(&key.as_str()));
    payload
}

fn object_body(body: Value) -> Result<Map<String, Value>, ValidationErrors> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(FieldViolation::new(
            "body",
            codes::INVALID_TYPE,
            "request body must be a JSON object",
        )
        .into()),
    }
}

fn wrong_type(field: &'static str, expected: &str) -> FieldViolation {
    FieldViolation::new(field, codes::INVALID_TYPE, format!("{field} must be {expected}"))
}

fn text_update(
    picked: &mut Map<String, Value>,
    field: &'static str,
) -> Result<FieldUpdate<String>, FieldViolation> {
    match picked.remove(field) {
        None => Ok(FieldUpdate::Unchanged),
        Some(Value::Null) => Ok(FieldUpdate::Cleared),
        Some(Value::String(text)) => Ok(FieldUpdate::Set(text)),
        Some(_) => Err(wrong_type(field, "a string")),
    }
}

fn number_update(
    picked: &mut Map<String, Value>,
    field: &'static str,
) -> Result<FieldUpdate<f64>, FieldViolation> {
    match picked.remove(field) {
        None => Ok(FieldUpdate::Unchanged),
        Some(Value::Null) => Ok(FieldUpdate::Cleared),
        Some(Value::Number(number)) => number
            .as_f64()
            .map(FieldUpdate::Set)
            .ok_or_else(|| wrong_type(field, "a number")),
        Some(_) => Err(wrong_type(field, "a number")),
    }
}

/// Project a PATCH body onto the user whitelist.
pub fn user_patch(body: Value) -> Result<UserPatch, ValidationErrors> {
    let mut picked = pick(object_body(body)?, USER_PATCH_FIELDS);
    let mut errors = ValidationErrors::default();
    let first_name = errors.capture(text_update(&mut picked, "firstName"));
    let last_name = errors.capture(text_update(&mut picked, "lastName"));
    let role = errors.capture(text_update(&mut picked, "role"));

    errors.finish(UserPatch {
        first_name: first_name.unwrap_or_default(),
        last_name: last_name.unwrap_or_default(),
        role: role.unwrap_or_default(),
    })
}

/// Project a PATCH body onto the issue whitelist.
pub fn issue_patch(body: Value) -> Result<IssuePatch, ValidationErrors> {
    let mut picked = pick(object_body(body)?, ISSUE_PATCH_FIELDS);
    let mut errors = ValidationErrors::default();
    let status = errors.capture(text_update(&mut picked, "status"));
    let description = errors.capture(text_update(&mut picked, "description"));
    let image_url = errors.capture(text_update(&mut picked, "imageUrl"));
    let latitude = errors.capture(number_update(&mut picked, "latitude"));
    let longitude = errors.capture(number_update(&mut picked, "longitude"));

    errors.finish(IssuePatch {
        status: status.unwrap_or_default(),
        description: description.unwrap_or_default(),
        image_url: image_url.unwrap_or_default(),
        latitude: latitude.unwrap_or_default(),
        longitude: longitude.unwrap_or_default(),
    })
}
