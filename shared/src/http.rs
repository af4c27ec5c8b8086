//! HTTP helpers for the overrides Lambda.

use lambda_http::http::response::Builder;
use lambda_http::{Body, Response};
use serde::Serialize;

const ALLOW_ORIGIN: &str = "*";
const ALLOW_HEADERS: &str = "Content-Type, x-admin-key";
const ALLOW_METHODS: &str = "GET,POST,DELETE,OPTIONS";

/// Error body returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

fn cors_response(status: u16) -> Builder {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .header("access-control-allow-origin", ALLOW_ORIGIN)
        .header("access-control-allow-headers", ALLOW_HEADERS)
        .header("access-control-allow-methods", ALLOW_METHODS)
}

/// Create a JSON response with the given status code and data.
pub fn json_response<T: Serialize>(status: u16, data: &T) -> Result<Response<Body>, lambda_http::Error> {
    let response = cors_response(status)
        .body(Body::from(serde_json::to_string(data)?))
        .map_err(Box::new)?;
    Ok(response)
}

/// Create an error response with the given status code and message.
pub fn error_response(status: u16, message: impl Into<String>) -> Result<Response<Body>, lambda_http::Error> {
    json_response(status, &ErrorBody { error: message.into() })
}

/// Empty 204 answer to a CORS preflight.
pub fn preflight_response() -> Result<Response<Body>, lambda_http::Error> {
    let response = cors_response(204).body(Body::Empty).map_err(Box::new)?;
    Ok(response)
}
