//! The success envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use yugen_core::pagination::{Page, PageMeta};

#[derive(Debug, Serialize)]
struct Envelope<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<PageMeta>,
}

fn render<T: Serialize>(status: StatusCode, data: T, meta: Option<PageMeta>) -> Response {
    let body = Envelope {
        success: true,
        data,
        meta,
    };
    (status, Json(body)).into_response()
}

/// `200` with `data`.
pub fn ok<T: Serialize>(data: T) -> Response {
    render(StatusCode::OK, data, None)
}

/// `201` with the created record.
pub fn created<T: Serialize>(data: T) -> Response {
    render(StatusCode::CREATED, data, None)
}

/// `200` with one page of records and its `meta`.
pub fn paginated<T: Serialize>(page: Page<T>) -> Response {
    let meta = page.meta();
    render(StatusCode::OK, page.items, Some(meta))
}

/// `204` with an empty body.
pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}
