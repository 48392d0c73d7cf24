//! Request extractors whose rejections render the error envelope.

use std::fmt;
use std::str::FromStr;

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};

use crate::error::ApiError;

/// JSON body extractor; malformed bodies become `400 BAD_REQUEST`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query-string extractor; malformed values become `400 BAD_REQUEST`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Path extractor; malformed segments become `400 BAD_REQUEST`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Decodes an optional JSON body. An empty body yields `T::default()`.
///
/// # Errors
///
/// Returns `ApiError::BadRequest` when a non-empty body is not valid JSON for
/// `T`.
pub fn optional_json<T>(body: &Bytes) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`). Use with `#[serde(default, deserialize_with = ...)]`.
///
/// # Errors
///
/// Propagates the inner deserialization error.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Reads an optional query value, treating a blank value (`?status=`) the
/// same as an absent one. Use with `#[serde(default, deserialize_with = ...)]`.
///
/// # Errors
///
/// Returns a deserialization error when a non-blank value does not parse.
pub fn blank_as_none<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: FromStr,
    T::Err: fmt::Display,
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use yugen_core::ids::EpisodeId;

    use super::*;

    #[derive(Debug, Default, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        role: Option<Option<String>>,
    }

    #[test]
    fn test_double_option_separates_absent_and_null() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let cleared: Patch = serde_json::from_str(r#"{"role": null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"role": "mentor"}"#).unwrap();

        assert_eq!(absent.role, None);
        assert_eq!(cleared.role, Some(None));
        assert_eq!(set.role, Some(Some("mentor".into())));
    }

    #[derive(Debug, Default, Deserialize)]
    struct Filter {
        #[serde(default, deserialize_with = "blank_as_none")]
        status: Option<String>,
        #[serde(default, deserialize_with = "blank_as_none")]
        episode_id: Option<EpisodeId>,
    }

    #[test]
    fn test_blank_filter_values_read_as_absent() {
        let blank: Filter = serde_json::from_str(r#"{"status": "", "episode_id": " "}"#).unwrap();
        let set: Filter = serde_json::from_str(r#"{"status": "open", "episode_id": "4"}"#).unwrap();
        let absent: Filter = serde_json::from_str("{}").unwrap();

        assert_eq!(blank.status, None);
        assert_eq!(blank.episode_id, None);
        assert_eq!(set.status.as_deref(), Some("open"));
        assert_eq!(set.episode_id, Some(EpisodeId(4)));
        assert_eq!(absent.episode_id, None);
    }

    #[test]
    fn test_non_numeric_id_is_still_rejected() {
        let result = serde_json::from_str::<Filter>(r#"{"episode_id": "five"}"#);

        assert!(result.is_err());
    }

    #[test]
    fn test_optional_json_accepts_empty_body() {
        let patch: Patch = optional_json(&Bytes::from_static(b"  ")).unwrap();

        assert_eq!(patch.role, None);
    }

    #[test]
    fn test_optional_json_rejects_malformed_body() {
        let result = optional_json::<Patch>(&Bytes::from_static(b"{role"));

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
