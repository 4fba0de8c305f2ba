use crate::error::ParseCause;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Turns the JSON payload of an envelope into the caller's type.
///
/// This is where deserialization settings live. The parser hands every
/// payload to the decoder it was built with and never applies a policy of
/// its own.
pub trait PayloadDecoder {
    type Error: std::error::Error + Send + Sync + 'static;

    fn decode<T: DeserializeOwned>(&self, value: Value) -> Result<T, Self::Error>;
}

/// Plain `serde_json` decoding; construction and naming rules come from the
/// target type's own serde attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl PayloadDecoder for JsonDecoder {
    type Error = serde_json::Error;

    fn decode<T: DeserializeOwned>(&self, value: Value) -> Result<T, Self::Error> {
        serde_json::from_value(value)
    }
}

impl<D: PayloadDecoder> PayloadDecoder for &D {
    type Error = D::Error;

    fn decode<T: DeserializeOwned>(&self, value: Value) -> Result<T, Self::Error> {
        (**self).decode(value)
    }
}

/// Materializes a payload. JSON `null` yields `None` without consulting `T`.
pub fn build_payload<T, D>(decoder: &D, data: Value) -> Result<Option<T>, ParseCause>
where
    T: DeserializeOwned,
    D: PayloadDecoder,
{
    if data.is_null() {
        return Ok(None);
    }

    decoder
        .decode(data)
        .map(Some)
        .map_err(|e| ParseCause::Payload(Box::new(e)))
}
