use crate::decode::{build_payload, JsonDecoder, PayloadDecoder};
use crate::error::{ParseCause, ParseError};
use crate::response::JSendResult;
use crate::schema::{SchemaKind, SchemaRegistry};
use crate::status::Status;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// What to do with a JSON body that is not a JSend envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Reject it.
    #[default]
    Strict,
    /// Read the whole document as the `data` of an implicit success envelope.
    Naked,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown parse policy: {value} (expected \"strict\" or \"naked\")")]
pub struct UnknownParsePolicy {
    pub value: String,
}

impl FromStr for ParsePolicy {
    type Err = UnknownParsePolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ParsePolicy::Strict),
            "naked" => Ok(ParsePolicy::Naked),
            _ => Err(UnknownParsePolicy {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ParsePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsePolicy::Strict => f.write_str("strict"),
            ParsePolicy::Naked => f.write_str("naked"),
        }
    }
}

/// A response body as handed over by the transport.
#[derive(Debug, Clone, Copy)]
pub struct ResponseBody<'a> {
    bytes: &'a [u8],
    no_content: bool,
}

impl<'a> ResponseBody<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            no_content: false,
        }
    }

    pub fn from_text(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }

    /// A transport-level "no body" signal such as HTTP 204.
    pub fn no_content() -> Self {
        Self {
            bytes: &[],
            no_content: true,
        }
    }

    pub fn declared_no_content(mut self, no_content: bool) -> Self {
        self.no_content = no_content;
        self
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.no_content || self.bytes.is_empty()
    }
}

/// Turns response bodies into typed [`JSendResult`]s.
pub trait JSendParser {
    fn parse<T: DeserializeOwned>(&self, body: ResponseBody<'_>) -> Result<JSendResult<T>, ParseError>;

    fn parse_slice<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<JSendResult<T>, ParseError> {
        self.parse(ResponseBody::new(bytes))
    }

    fn parse_str<T: DeserializeOwned>(&self, text: &str) -> Result<JSendResult<T>, ParseError> {
        self.parse(ResponseBody::from_text(text))
    }
}

/// The parsing pipeline, parameterized by a [`ParsePolicy`] and a payload decoder.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeParser<D = JsonDecoder> {
    policy: ParsePolicy,
    decoder: D,
}

#[derive(Deserialize)]
struct ErrorFields {
    message: String,
    code: Option<Number>,
    data: Option<Value>,
}

#[derive(Error, Debug)]
#[error("Error code {code} does not fit in a 64-bit signed integer")]
struct CodeOutOfRange {
    code: Number,
}

/// Integral JSON numbers, including ones written with a zero fraction such
/// as `2.0`, become the error code. Anything outside `i64` is rejected.
fn error_code(code: Number) -> Result<i64, ParseCause> {
    if let Some(value) = code.as_i64() {
        return Ok(value);
    }
    match code.as_f64() {
        Some(value)
            if code.is_f64()
                && value.fract() == 0.0
                && value >= i64::MIN as f64
                && value < i64::MAX as f64 =>
        {
            Ok(value as i64)
        }
        _ => Err(ParseCause::Payload(Box::new(CodeOutOfRange { code }))),
    }
}

impl EnvelopeParser<JsonDecoder> {
    pub fn new(policy: ParsePolicy) -> Self {
        Self::with_decoder(policy, JsonDecoder)
    }

    pub fn strict() -> Self {
        Self::new(ParsePolicy::Strict)
    }

    pub fn naked() -> Self {
        Self::new(ParsePolicy::Naked)
    }
}

impl<D: PayloadDecoder> EnvelopeParser<D> {
    pub fn with_decoder(policy: ParsePolicy, decoder: D) -> Self {
        Self { policy, decoder }
    }

    pub fn policy(&self) -> ParsePolicy {
        self.policy
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    fn read_body<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<JSendResult<T>, ParseCause> {
        let text = std::str::from_utf8(bytes)?;
        let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
        if text.trim().is_empty() {
            return Err(ParseCause::EmptyBody);
        }

        let document: Value = serde_json::from_str(text).map_err(ParseCause::Syntax)?;
        let registry = SchemaRegistry::global();

        match registry.check_base(&document) {
            Ok(status) => self.read_envelope(registry, status, document),
            Err(violation) => match self.policy {
                ParsePolicy::Strict => Err(violation.into()),
                ParsePolicy::Naked => {
                    debug!(%violation, "Body is not a JSend envelope, reading it as naked content");
                    self.read_naked(document)
                }
            },
        }
    }

    fn read_envelope<T: DeserializeOwned>(
        &self,
        registry: &SchemaRegistry,
        status: Status,
        document: Value,
    ) -> Result<JSendResult<T>, ParseCause> {
        registry.validate(SchemaKind::from(status), &document)?;

        match status {
            Status::Success => Ok(JSendResult::Success {
                data: build_payload(&self.decoder, take_field(document, "data"))?,
            }),
            Status::Fail => Ok(JSendResult::Fail {
                detail: take_field(document, "data"),
            }),
            Status::Error => {
                let fields: ErrorFields = serde_json::from_value(document)
                    .map_err(|e| ParseCause::Payload(Box::new(e)))?;
                Ok(JSendResult::Error {
                    message: fields.message,
                    code: fields.code.map(error_code).transpose()?,
                    detail: fields.data.filter(|data| !data.is_null()),
                })
            }
        }
    }

    fn read_naked<T: DeserializeOwned>(&self, document: Value) -> Result<JSendResult<T>, ParseCause> {
        Ok(JSendResult::Success {
            data: build_payload(&self.decoder, document)?,
        })
    }
}

impl<D: PayloadDecoder> JSendParser for EnvelopeParser<D> {
    fn parse<T: DeserializeOwned>(&self, body: ResponseBody<'_>) -> Result<JSendResult<T>, ParseError> {
        if body.is_empty() {
            debug!("Empty response body, treating it as success without data");
            return Ok(JSendResult::success_empty());
        }

        self.read_body(body.bytes())
            .map_err(|cause| ParseError::new::<JSendResult<T>>(body.bytes(), cause))
    }
}

/// Requires every body to be a JSend envelope.
#[derive(Debug, Clone, Default)]
pub struct StrictParser<D = JsonDecoder>(EnvelopeParser<D>);

/// Accepts JSend envelopes and, failing that, any JSON document as an
/// implicit success payload.
#[derive(Debug, Clone)]
pub struct NakedContentParser<D = JsonDecoder>(EnvelopeParser<D>);

impl StrictParser<JsonDecoder> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: PayloadDecoder> StrictParser<D> {
    pub fn with_decoder(decoder: D) -> Self {
        Self(EnvelopeParser::with_decoder(ParsePolicy::Strict, decoder))
    }
}

impl<D: PayloadDecoder> JSendParser for StrictParser<D> {
    fn parse<T: DeserializeOwned>(&self, body: ResponseBody<'_>) -> Result<JSendResult<T>, ParseError> {
        self.0.parse(body)
    }
}

impl NakedContentParser<JsonDecoder> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for NakedContentParser<JsonDecoder> {
    fn default() -> Self {
        Self(EnvelopeParser::naked())
    }
}

impl<D: PayloadDecoder> NakedContentParser<D> {
    pub fn with_decoder(decoder: D) -> Self {
        Self(EnvelopeParser::with_decoder(ParsePolicy::Naked, decoder))
    }
}

impl<D: PayloadDecoder> JSendParser for NakedContentParser<D> {
    fn parse<T: DeserializeOwned>(&self, body: ResponseBody<'_>) -> Result<JSendResult<T>, ParseError> {
        self.0.parse(body)
    }
}

fn take_field(document: Value, key: &str) -> Value {
    match document {
        Value::Object(mut fields) => fields.remove(key).unwrap_or(Value::Null),
        _ => Value::Null,
    }
}
