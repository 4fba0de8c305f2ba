//! # JSend
//!
//! Parsing, validation and encoding of [JSend](https://github.com/omniti-labs/jsend)
//! response envelopes. A JSend body is a JSON object whose `status` field is
//! `success`, `fail` or `error`, with status-specific fields next to it.
//!
//! ## Parsing
//!
//! ```rust
//! use jsend::*;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize, PartialEq)]
//! struct User {
//!     name: String,
//! }
//!
//! let parser = StrictParser::new();
//!
//! let result: JSendResult<User> = parser
//!     .parse_str(r#"{"status": "success", "data": {"name": "ann"}}"#)
//!     .expect("valid envelope");
//! assert_eq!(result.data().map(|u| u.name.as_str()), Some("ann"));
//!
//! let result: JSendResult<User> = parser
//!     .parse_str(r#"{"status": "fail", "data": "bad username"}"#)
//!     .expect("valid envelope");
//! assert!(result.is_fail());
//! ```
//!
//! ## Strict and naked parsing
//!
//! [`StrictParser`] rejects any body that is not an envelope.
//! [`NakedContentParser`] reads such a body as the payload of an implicit
//! success envelope instead, which keeps clients usable against servers
//! that return bare resources:
//!
//! ```rust
//! use jsend::*;
//!
//! let body = r#"{"id": 3}"#;
//! assert!(StrictParser::new().parse_str::<serde_json::Value>(body).is_err());
//!
//! let result = NakedContentParser::new()
//!     .parse_str::<serde_json::Value>(body)
//!     .expect("naked content");
//! assert_eq!(result.into_data(), Some(serde_json::json!({"id": 3})));
//! ```
//!
//! ## Encoding
//!
//! ```rust
//! use jsend::*;
//! use serde_json::json;
//!
//! let envelope = JSendResult::<()>::error_with("Service unavailable", Some(503), None)
//!     .to_envelope()
//!     .expect("serializable");
//! assert_eq!(
//!     envelope,
//!     json!({"status": "error", "message": "Service unavailable", "code": 503})
//! );
//! assert_eq!(SchemaRegistry::global().check_envelope(&envelope), Ok(Status::Error));
//! ```

mod decode;
mod error;
mod parser;
mod response;
mod schema;
mod status;

pub use decode::*;
pub use error::*;
pub use parser::*;
pub use response::*;
pub use schema::*;
pub use status::*;
