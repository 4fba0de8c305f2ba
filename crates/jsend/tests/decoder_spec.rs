use jsend::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Built only through validation; there is no public constructor.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(try_from = "RawAccount")]
struct Account {
    handle: String,
}

#[derive(Deserialize)]
struct RawAccount {
    handle: String,
}

impl TryFrom<RawAccount> for Account {
    type Error = String;

    fn try_from(raw: RawAccount) -> Result<Self, Self::Error> {
        if raw.handle.starts_with('@') {
            Ok(Account { handle: raw.handle })
        } else {
            Err(format!("handle must start with @: {}", raw.handle))
        }
    }
}

/// Lower-cases object keys before handing the payload to serde.
struct LowercaseKeys;

fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), lowercase_keys(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

impl PayloadDecoder for LowercaseKeys {
    type Error = serde_json::Error;

    fn decode<T: DeserializeOwned>(&self, value: Value) -> Result<T, Self::Error> {
        serde_json::from_value(lowercase_keys(value))
    }
}

#[test]
fn given_type_with_validated_construction_when_parsing_then_serde_attributes_apply() {
    let parser = StrictParser::new();

    let ok: JSendResult<Account> = parser
        .parse_str(r#"{"status":"success","data":{"handle":"@ann"}}"#)
        .unwrap();
    assert_eq!(
        ok.into_data(),
        Some(Account {
            handle: "@ann".to_string()
        })
    );

    let err = parser
        .parse_str::<Account>(r#"{"status":"success","data":{"handle":"ann"}}"#)
        .unwrap_err();
    assert!(err.is_payload_mismatch());
    assert!(err.cause.to_string().contains("handle must start with @"));
}

#[test]
fn given_custom_decoder_when_parsing_then_it_receives_the_payload() {
    let body = json!({"status": "success", "data": {"HANDLE": "@bob"}}).to_string();

    let result: JSendResult<Account> = StrictParser::with_decoder(LowercaseKeys)
        .parse_str(&body)
        .unwrap();

    assert_eq!(result.data().map(|a| a.handle.as_str()), Some("@bob"));
    assert!(StrictParser::new().parse_str::<Account>(&body).is_err());
}

#[test]
fn given_custom_decoder_when_falling_back_then_naked_payload_uses_it_too() {
    let result: JSendResult<Account> = NakedContentParser::with_decoder(LowercaseKeys)
        .parse_str(r#"{"Handle": "@eve"}"#)
        .unwrap();

    assert_eq!(result.data().map(|a| a.handle.as_str()), Some("@eve"));
}

#[test]
fn given_custom_decoder_when_reading_fail_detail_then_detail_is_untouched() {
    let result: JSendResult<Account> = EnvelopeParser::with_decoder(ParsePolicy::Strict, LowercaseKeys)
        .parse_str(r#"{"status":"fail","data":{"Handle":"taken"}}"#)
        .unwrap();

    assert_eq!(result, JSendResult::fail(json!({"Handle": "taken"})));
}
