use crate::status::Status;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// A parsed (or to-be-encoded) JSend response.
///
/// Serializing a `JSendResult` produces the wire envelope, so encoding a value
/// and feeding the bytes back through a parser yields an equal value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JSendResult<T> {
    Success {
        data: Option<T>,
    },
    /// `detail` is never written as `null`; a null detail goes out as `{}`.
    Fail {
        #[serde(rename = "data", serialize_with = "serialize_fail_detail")]
        detail: Value,
    },
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<i64>,
        #[serde(rename = "data", skip_serializing_if = "Option::is_none")]
        detail: Option<Value>,
    },
}

/// The statuses a [`JSendError`] can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStatus {
    Fail,
    Error,
}

impl From<FailureStatus> for Status {
    fn from(status: FailureStatus) -> Self {
        match status {
            FailureStatus::Fail => Status::Fail,
            FailureStatus::Error => Status::Error,
        }
    }
}

/// The failure half of a [`JSendResult`], independent of the payload type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JSendError {
    status: FailureStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<i64>,
    #[serde(default)]
    data: Value,
}

/// Fail details must not be null on the wire.
fn fail_detail(detail: Value) -> Value {
    match detail {
        Value::Null => Value::Object(Map::new()),
        detail => detail,
    }
}

fn serialize_fail_detail<S: Serializer>(detail: &Value, serializer: S) -> Result<S::Ok, S::Error> {
    match detail {
        Value::Null => Map::<String, Value>::new().serialize(serializer),
        detail => detail.serialize(serializer),
    }
}

fn error_detail(detail: Option<Value>) -> Option<Value> {
    detail.filter(|data| !data.is_null())
}

impl<T> JSendResult<T> {
    pub fn success(data: T) -> Self {
        Self::Success { data: Some(data) }
    }

    pub fn success_empty() -> Self {
        Self::Success { data: None }
    }

    /// A fail result; a detail that converts to `null` becomes `{}`.
    pub fn fail(detail: impl Into<Value>) -> Self {
        Self::Fail {
            detail: fail_detail(detail.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            code: None,
            detail: None,
        }
    }

    pub fn error_with(message: impl Into<String>, code: Option<i64>, detail: Option<Value>) -> Self {
        Self::Error {
            message: message.into(),
            code,
            detail: error_detail(detail),
        }
    }

    pub fn status(&self) -> Status {
        match self {
            Self::Success { .. } => Status::Success,
            Self::Fail { .. } => Status::Fail,
            Self::Error { .. } => Status::Error,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Payload of a success response; `None` for fail/error or `data: null`.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => data.as_ref(),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success { data } => data,
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<JSendError> {
        match self {
            Self::Success { .. } => None,
            Self::Fail { detail } => Some(JSendError {
                status: FailureStatus::Fail,
                message: None,
                code: None,
                data: detail.clone(),
            }),
            Self::Error {
                message,
                code,
                detail,
            } => Some(JSendError {
                status: FailureStatus::Error,
                message: Some(message.clone()),
                code: *code,
                data: detail.clone().unwrap_or(Value::Null),
            }),
        }
    }

    /// Returns the success payload, or the fail/error half as a [`JSendError`].
    pub fn ensure_success(self) -> Result<Option<T>, JSendError> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Fail { detail } => Err(JSendError {
                status: FailureStatus::Fail,
                message: None,
                code: None,
                data: detail,
            }),
            Self::Error {
                message,
                code,
                detail,
            } => Err(JSendError {
                status: FailureStatus::Error,
                message: Some(message),
                code,
                data: detail.unwrap_or(Value::Null),
            }),
        }
    }

    pub fn map<U, F>(self, f: F) -> JSendResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Success { data } => JSendResult::Success { data: data.map(f) },
            Self::Fail { detail } => JSendResult::Fail { detail },
            Self::Error {
                message,
                code,
                detail,
            } => JSendResult::Error {
                message,
                code,
                detail,
            },
        }
    }
}

impl<T: Serialize> JSendResult<T> {
    pub fn to_envelope(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl JSendError {
    /// A fail error; a detail that converts to `null` becomes `{}`.
    pub fn fail(data: impl Into<Value>) -> Self {
        Self {
            status: FailureStatus::Fail,
            message: None,
            code: None,
            data: fail_detail(data.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: FailureStatus::Error,
            message: Some(message.into()),
            code: None,
            data: Value::Null,
        }
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = match self.status {
            FailureStatus::Fail => fail_detail(data.into()),
            FailureStatus::Error => data.into(),
        };
        self
    }

    pub fn status(&self) -> Status {
        self.status.into()
    }

    pub fn failure_status(&self) -> FailureStatus {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn code(&self) -> Option<i64> {
        self.code
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Rebuilds the envelope this error was taken from.
    pub fn into_result<T>(self) -> JSendResult<T> {
        match self.status {
            FailureStatus::Fail => JSendResult::Fail {
                detail: fail_detail(self.data),
            },
            FailureStatus::Error => JSendResult::Error {
                message: self.message.unwrap_or_default(),
                code: self.code,
                detail: error_detail(Some(self.data)),
            },
        }
    }
}

impl fmt::Display for JSendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.message, self.code) {
            (Some(message), Some(code)) => write!(f, "JSend {} ({}): {}", self.status(), code, message),
            (Some(message), None) => write!(f, "JSend {}: {}", self.status(), message),
            _ => write!(f, "JSend {}: {}", self.status(), self.data),
        }
    }
}

impl std::error::Error for JSendError {}
