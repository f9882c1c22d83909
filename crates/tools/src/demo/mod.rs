//! The demo tool set.
//!
//! Seven stub tools exercising the function-calling contract. All are
//! simulated except the GitHub repository search, which performs live HTTP.

mod clock;
mod critique;
mod fan;
mod github;
mod knowledge;
mod sandbox;
mod weather;

use crate::{Registry, RegistryError, ToolError};
use serde_json::Value;

/// Build the registry holding the full demo tool set.
pub fn registry() -> Result<Registry, RegistryError> {
    let client = reqwest::Client::new();

    Registry::builder()
        .register(weather::spec(), weather::run)
        .register(clock::spec(), clock::run)
        .register(fan::spec(), fan::run)
        .register(github::spec(), move |args| github::run(client.clone(), args))
        .register(sandbox::spec(), sandbox::run)
        .register(knowledge::spec(), knowledge::run)
        .register(critique::spec(), critique::run)
        .build()
}

/// Pull a required string field out of the argument payload.
fn require_str(args: &Value, key: &str) -> Result<String, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| ToolError::InvalidInput(format!("missing or non-string field: {key}")))
}

/// Pull an optional string field out of the argument payload.
fn optional_str(args: &Value, key: &str) -> Option<String> {
    args.get(key).and_then(Value::as_str).map(str::to_owned)
}
