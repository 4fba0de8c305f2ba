//! Blocking HTTP client helpers for JSend APIs.
//!
//! ```no_run
//! use jsend_client::{ClientConfig, JSendClient};
//! use jsend::{JSendResult, ParsePolicy};
//! use serde_json::Value;
//!
//! let config = ClientConfig::default()
//!     .with_base_url("https://api.example.com/v1")
//!     .with_parse_policy(ParsePolicy::Naked);
//! let client = JSendClient::from_config(config).expect("valid config");
//!
//! let users: JSendResult<Vec<Value>> = client.get("/users").expect("JSend response");
//! ```

mod client;
mod config;
mod transport;

pub use client::*;
pub use config::*;
pub use transport::*;
