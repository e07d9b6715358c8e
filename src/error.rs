use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Debug;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub struct Error {
    pub code: i32,
    pub message: String,
    pub errors: Vec<FieldError>,
}

impl Error {
    pub fn is_invalid_input_error(&self) -> bool {
        self.code == 101
    }

    pub fn is_not_found_error(&self) -> bool {
        self.code == 102
    }

    pub fn is_expired_error(&self) -> bool {
        self.code == 103
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            102 => (StatusCode::NOT_FOUND, self.message.as_str()),
            103 => (StatusCode::GONE, self.message.as_str()),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "success": false,
            "code": self.code,
            "error": error_message,
            "errors": self.errors,
        }));

        (status, body).into_response()
    }
}

pub fn validation_error(errors: Vec<FieldError>) -> Error {
    Error {
        code: 101,
        message: "validation error".into(),
        errors,
    }
}

pub fn not_found_error() -> Error {
    Error {
        code: 102,
        message: "quote not found".into(),
        errors: vec![],
    }
}

pub fn expired_error() -> Error {
    Error {
        code: 103,
        message: "quote has expired".into(),
        errors: vec![],
    }
}

pub fn config_error<T: Debug>(_: T) -> Error {
    Error {
        code: 2,
        message: "configuration error".into(),
        errors: vec![],
    }
}

pub fn unexpected_error() -> Error {
    Error {
        code: 5,
        message: "unexpected error".into(),
        errors: vec![],
    }
}

#[test]
fn internal_errors_hide_message() {
    let response = config_error("bad port").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = unexpected_error().into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn lookup_errors_map_to_distinct_statuses() {
    assert_eq!(
        not_found_error().into_response().status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(expired_error().into_response().status(), StatusCode::GONE);
    assert_eq!(
        validation_error(vec![FieldError::new("numPassengers", "too many")])
            .into_response()
            .status(),
        StatusCode::BAD_REQUEST
    );
}
