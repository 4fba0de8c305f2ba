use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::schema::SchemaKind;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The single error kind produced by every parser.
///
/// Carries the name of the type the caller asked for and the verbatim body
/// text, with the underlying failure available through [`std::error::Error::source`].
#[derive(Error, Debug)]
pub struct ParseError {
    pub type_name: String,
    pub body: String,
    #[source]
    pub cause: ParseCause,
}

#[derive(Error, Debug)]
pub enum ParseCause {
    #[error("The response body is empty or contains only whitespace")]
    EmptyBody,

    #[error("The response body is not valid UTF-8")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("The response body is not valid JSON")]
    Syntax(#[source] serde_json::Error),

    #[error(transparent)]
    Envelope(#[from] SchemaViolation),

    #[error("The payload could not be deserialized")]
    Payload(#[source] BoxError),
}

/// A JSON document that does not match one of the envelope schemas.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub schema: SchemaKind,
    pub errors: Vec<Violation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum SchemaLoadError {
    #[error("Failed to parse embedded {schema} schema: {source}")]
    InvalidJson {
        schema: SchemaKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to compile embedded {schema} schema: {message}")]
    CompilationFailed { schema: SchemaKind, message: String },
}

impl ParseError {
    pub fn new<T: ?Sized>(body: &[u8], cause: ParseCause) -> Self {
        Self {
            type_name: std::any::type_name::<T>().to_string(),
            body: String::from_utf8_lossy(body).into_owned(),
            cause,
        }
    }

    fn headline(&self) -> String {
        match self.cause {
            ParseCause::EmptyBody => format!(
                "Expected a JSend envelope for {} but the response body was empty.",
                self.type_name
            ),
            _ => format!(
                "Failed to parse the response body into an instance of {}.",
                self.type_name
            ),
        }
    }

    pub fn is_empty_body(&self) -> bool {
        matches!(self.cause, ParseCause::EmptyBody)
    }

    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self.cause,
            ParseCause::Syntax(_) | ParseCause::Encoding(_)
        )
    }

    pub fn is_envelope_violation(&self) -> bool {
        matches!(self.cause, ParseCause::Envelope(_))
    }

    pub fn is_payload_mismatch(&self) -> bool {
        matches!(self.cause, ParseCause::Payload(_))
    }

    pub fn violation(&self) -> Option<&SchemaViolation> {
        match &self.cause {
            ParseCause::Envelope(violation) => Some(violation),
            _ => None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.headline(), self.body)
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .errors
            .iter()
            .map(|error| {
                if error.path.is_empty() {
                    error.message.clone()
                } else {
                    format!("{} at {}", error.message, error.path)
                }
            })
            .collect();

        write!(
            f,
            "{} envelope validation failed: {}",
            self.schema,
            messages.join(", ")
        )
    }
}

impl SchemaViolation {
    pub fn new(schema: SchemaKind, message: impl Into<String>) -> Self {
        Self {
            schema,
            errors: vec![Violation {
                path: String::new(),
                message: message.into(),
            }],
        }
    }
}
