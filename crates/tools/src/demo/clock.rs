//! Current wall-clock time.

use super::optional_str;
use crate::{ToolError, ToolSpec};
use chrono::Local;
use serde_json::{Value, json};

pub fn spec() -> ToolSpec {
    ToolSpec::builder("getCurrentTime", "Get the current date and time.")
        .string("timezone", "IANA timezone name; defaults to the local zone")
        .build()
}

pub async fn run(args: Value) -> Result<Value, ToolError> {
    let now = Local::now();
    let timezone =
        optional_str(&args, "timezone").unwrap_or_else(|| now.format("UTC%:z").to_string());

    Ok(json!({
        "time": now.format("%Y-%m-%d %H:%M:%S").to_string(),
        "timezone": timezone,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoes_requested_timezone() {
        let out = run(json!({"timezone": "Asia/Tokyo"})).await.unwrap();
        assert_eq!(out["timezone"], "Asia/Tokyo");
        assert!(out["time"].as_str().is_some());
    }

    #[tokio::test]
    async fn defaults_to_local_offset() {
        let out = run(json!({})).await.unwrap();
        assert!(out["timezone"].as_str().unwrap().starts_with("UTC"));
    }
}
