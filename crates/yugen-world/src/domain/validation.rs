//! Write-time checks for world settings.

use serde_json::{Map, Value};
use yugen_core::error::{DomainError, FieldError};
use yugen_core::model::{WorldSettingAttributes, WorldSettingCategory};
use yugen_core::validation::Validator;

use super::commands::{CreateWorldSetting, WorldSettingChanges};

const NOT_IN_LIST: &str = "is not included in the list";
const NOT_AN_OBJECT: &str = "must be a JSON object";

/// Parses a category token. Missing, empty and unknown tokens are all
/// rejected the same way.
///
/// # Errors
///
/// Returns a `FieldError` on `category`.
pub fn parse_category(raw: Option<&str>) -> Result<WorldSettingCategory, FieldError> {
    raw.and_then(|token| token.parse().ok())
        .ok_or_else(|| FieldError::new("category", NOT_IN_LIST))
}

/// Normalizes details: absent and `null` become `{}`.
///
/// # Errors
///
/// Returns a `FieldError` on `details` for anything but an object.
pub fn parse_details(raw: Option<Value>) -> Result<Value, FieldError> {
    match raw {
        None | Some(Value::Null) => Ok(Value::Object(Map::new())),
        Some(value @ Value::Object(_)) => Ok(value),
        Some(_) => Err(FieldError::new("details", NOT_AN_OBJECT)),
    }
}

/// Turns a create command into attributes.
///
/// # Errors
///
/// Returns `DomainError::Validation` listing every offending field.
pub fn world_setting_attributes(
    command: &CreateWorldSetting,
) -> Result<WorldSettingAttributes, DomainError> {
    let mut v = Validator::new();
    let category = v.check(parse_category(command.category.as_deref()));
    let title = command.title.clone().unwrap_or_default();
    v.require_text("title", &title);
    let details = v.check(parse_details(command.details.clone()));

    match (category, details) {
        (Some(category), Some(details)) if v.is_valid() => Ok(WorldSettingAttributes {
            category,
            title,
            description: command.description.clone(),
            details,
        }),
        _ => Err(v.into_error()),
    }
}

/// Applies an update change set to `attributes` and re-checks the result.
///
/// # Errors
///
/// Returns `DomainError::Validation` when the result is invalid; fields are
/// only written when the whole change set is valid.
pub fn apply_changes(
    changes: WorldSettingChanges,
    attributes: &mut WorldSettingAttributes,
) -> Result<(), DomainError> {
    let mut v = Validator::new();
    let category = changes
        .category
        .as_deref()
        .map(|token| v.check(parse_category(Some(token))));
    let details = changes.details.map(|raw| v.check(parse_details(Some(raw))));
    if let Some(title) = &changes.title {
        v.require_text("title", title);
    }
    v.finish()?;

    if let Some(Some(category)) = category {
        attributes.category = category;
    }
    if let Some(title) = changes.title {
        attributes.title = title;
    }
    if let Some(description) = changes.description {
        attributes.description = description;
    }
    if let Some(Some(details)) = details {
        attributes.details = details;
    }
    Ok(())
}
