use axum::http::header::{CONTENT_TYPE, LOCATION, WWW_AUTHENTICATE};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use jsend::{JSendError, JSendResult, Status};
use serde::Serialize;
use serde_json::Value;
use tracing::error;

const SERIALIZATION_FAILED: &str =
    r#"{"status":"error","message":"Failed to serialize the response payload"}"#;

/// A JSend envelope together with the HTTP status and headers it is sent with.
#[derive(Debug, Clone)]
pub struct JSendReply<T> {
    result: JSendResult<T>,
    status: StatusCode,
    headers: HeaderMap,
}

/// The status code a result is sent with unless overridden.
pub fn default_status<T>(result: &JSendResult<T>) -> StatusCode {
    match result.status() {
        Status::Success => StatusCode::OK,
        Status::Fail => StatusCode::BAD_REQUEST,
        Status::Error => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl<T> JSendReply<T> {
    pub fn new(result: JSendResult<T>, status: StatusCode) -> Self {
        Self {
            result,
            status,
            headers: HeaderMap::new(),
        }
    }

    pub fn ok(data: T) -> Self {
        Self::new(JSendResult::success(data), StatusCode::OK)
    }

    pub fn ok_empty() -> Self {
        Self::new(JSendResult::success_empty(), StatusCode::OK)
    }

    pub fn created(location: HeaderValue, data: T) -> Self {
        Self::new(JSendResult::success(data), StatusCode::CREATED).with_header(LOCATION, location)
    }

    pub fn fail(detail: impl Into<Value>) -> Self {
        Self::new(JSendResult::fail(detail), StatusCode::BAD_REQUEST)
    }

    pub fn not_found(detail: impl Into<Value>) -> Self {
        Self::new(JSendResult::fail(detail), StatusCode::NOT_FOUND)
    }

    /// 401 with one `WWW-Authenticate` header per challenge.
    pub fn unauthorized<I>(challenges: I, detail: impl Into<Value>) -> Self
    where
        I: IntoIterator<Item = HeaderValue>,
    {
        let mut reply = Self::new(JSendResult::fail(detail), StatusCode::UNAUTHORIZED);
        for challenge in challenges {
            reply.headers.append(WWW_AUTHENTICATE, challenge);
        }
        reply
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(JSendResult::error(message), StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn error_with(message: impl Into<String>, code: Option<i64>, detail: Option<Value>) -> Self {
        Self::new(
            JSendResult::error_with(message, code, detail),
            StatusCode::INTERNAL_SERVER_ERROR,
        )
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn result(&self) -> &JSendResult<T> {
        &self.result
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl<T> From<JSendResult<T>> for JSendReply<T> {
    fn from(result: JSendResult<T>) -> Self {
        let status = default_status(&result);
        Self::new(result, status)
    }
}

impl<T> From<JSendError> for JSendReply<T> {
    fn from(error: JSendError) -> Self {
        error.into_result().into()
    }
}

impl<T: Serialize> IntoResponse for JSendReply<T> {
    fn into_response(self) -> Response {
        let json = HeaderValue::from_static("application/json");

        let mut response = match serde_json::to_vec(&self.result) {
            Ok(body) => (self.status, [(CONTENT_TYPE, json)], body).into_response(),
            Err(e) => {
                error!("Failed to serialize JSend reply: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(CONTENT_TYPE, json)],
                    SERIALIZATION_FAILED,
                )
                    .into_response();
            }
        };

        response.headers_mut().extend(self.headers);
        response
    }
}
