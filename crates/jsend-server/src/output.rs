use crate::reply::JSendReply;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// What a handler produced: a value to wrap as `data`, or nothing.
///
/// Both cases become a 200 success envelope; `NoValue` is written with
/// `"data": null`.
#[derive(Debug, Clone, PartialEq)]
pub enum JSendOutput<T> {
    Value(T),
    NoValue,
}

impl<T> JSendOutput<T> {
    pub fn into_reply(self) -> JSendReply<T> {
        match self {
            JSendOutput::Value(value) => JSendReply::ok(value),
            JSendOutput::NoValue => JSendReply::ok_empty(),
        }
    }
}

impl<T> From<Option<T>> for JSendOutput<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(JSendOutput::NoValue, JSendOutput::Value)
    }
}

impl From<()> for JSendOutput<()> {
    fn from(_: ()) -> Self {
        JSendOutput::NoValue
    }
}

impl<T: Serialize> IntoResponse for JSendOutput<T> {
    fn into_response(self) -> Response {
        self.into_reply().into_response()
    }
}
