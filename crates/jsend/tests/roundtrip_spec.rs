use jsend::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Article {
    id: u32,
    title: String,
    tags: Vec<String>,
}

fn article() -> Article {
    Article {
        id: 12,
        title: "Envelopes".to_string(),
        tags: vec!["json".to_string(), "http".to_string()],
    }
}

fn round_trip(result: &JSendResult<Article>) -> JSendResult<Article> {
    let bytes = serde_json::to_vec(result).expect("encodes");
    StrictParser::new().parse_slice(&bytes).expect("decodes")
}

#[test]
fn given_each_status_when_encoding_then_parsing_then_value_is_preserved() {
    let results = [
        JSendResult::success(article()),
        JSendResult::success_empty(),
        JSendResult::fail(json!({"title": "already taken"})),
        JSendResult::fail(json!("nope")),
        JSendResult::fail(Value::Null),
        JSendResult::fail(None::<String>),
        JSendResult::error("boom"),
        JSendResult::error_with("boom", Some(-1), None),
        JSendResult::error_with("boom", None, Some(json!([1, 2]))),
        JSendResult::error_with("boom", Some(i64::MAX), Some(json!({"trace": "abc"}))),
        JSendResult::error_with("boom", Some(1), Some(Value::Null)),
    ];

    for result in results {
        assert_eq!(round_trip(&result), result);
    }
}

#[test]
fn given_encoded_envelopes_when_checking_then_they_satisfy_the_schemas() {
    let registry = SchemaRegistry::global();

    let cases = [
        (JSendResult::success(article()), Status::Success),
        (JSendResult::success_empty(), Status::Success),
        (JSendResult::fail(json!({})), Status::Fail),
        (JSendResult::fail(Value::Null), Status::Fail),
        (JSendResult::Fail { detail: Value::Null }, Status::Fail),
        (
            JSendResult::error_with("boom", Some(1), Some(json!(null))),
            Status::Error,
        ),
    ];

    for (result, status) in cases {
        let envelope = result.to_envelope().unwrap();
        assert_eq!(registry.check_envelope(&envelope), Ok(status));
    }
}

#[test]
fn given_error_half_when_converted_back_then_envelope_is_equal() {
    let original: JSendResult<Article> = JSendResult::error_with("gone", Some(410), None);

    let error = original.clone().ensure_success().unwrap_err();

    assert_eq!(error.into_result::<Article>(), original);
}
