//! API response helpers.

use axum::{
    Json,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Cache policy for public reads.
pub const PUBLIC_CACHE: &str = "public, s-maxage=10, stale-while-revalidate=30";
/// Cache policy for reads that depend on the viewer.
pub const PRIVATE_CACHE: &str = "private, s-maxage=10, stale-while-revalidate=30";

/// JSON body with a `Cache-Control` header.
pub struct Cached<T>(pub &'static str, pub T);

impl<T: Serialize> IntoResponse for Cached<T> {
    fn into_response(self) -> Response {
        let mut response = Json(self.1).into_response();
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static(self.0));
        response
    }
}

/// Cache policy for a read that is personalized when signed in.
#[must_use]
pub const fn viewer_cache(authenticated: bool) -> &'static str {
    if authenticated {
        PRIVATE_CACHE
    } else {
        PUBLIC_CACHE
    }
}

/// Wrap a value under a single resource key, e.g. `{"post": {...}}`.
#[must_use]
pub fn named<T: Serialize>(key: &str, value: T) -> Json<Value> {
    let value = serde_json::to_value(value).unwrap_or(Value::Null);
    let mut body = serde_json::Map::new();
    body.insert(key.to_string(), value);
    Json(Value::Object(body))
}

/// `{"success": true}`.
#[must_use]
pub fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}
