//! Server-side JSend replies for `axum` handlers.
//!
//! ```rust
//! use axum::http::HeaderValue;
//! use jsend_server::{JSendOutput, JSendReply};
//! use serde_json::json;
//!
//! async fn create_user() -> JSendReply<serde_json::Value> {
//!     JSendReply::created(HeaderValue::from_static("/users/7"), json!({"id": 7}))
//! }
//!
//! async fn find_user(id: u32) -> JSendReply<serde_json::Value> {
//!     if id == 0 {
//!         return JSendReply::not_found(json!({"id": "no such user"}));
//!     }
//!     JSendReply::ok(json!({"id": id}))
//! }
//!
//! async fn touch_user() -> JSendOutput<()> {
//!     JSendOutput::NoValue
//! }
//! ```

mod output;
mod reply;

pub use output::*;
pub use reply::*;
