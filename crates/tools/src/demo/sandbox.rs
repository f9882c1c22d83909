//! Simulated sandboxed code execution.

use super::{optional_str, require_str};
use crate::{ToolError, ToolSpec};
use serde_json::{Value, json};
use std::time::Duration;

/// Fixed latency standing in for a real sandbox round trip.
const SIMULATED_LATENCY: Duration = Duration::from_millis(1200);

pub fn spec() -> ToolSpec {
    ToolSpec::builder(
        "execute_code",
        "Run a code snippet in an isolated sandbox and return its output.",
    )
    .string_enum("language", "Language of the snippet", &["python", "javascript", "rust"])
    .string("code", "Source code to execute")
    .require("code")
    .build()
}

pub async fn run(args: Value) -> Result<Value, ToolError> {
    let code = require_str(&args, "code")?;
    let language = optional_str(&args, "language").unwrap_or_else(|| "python".to_string());

    tokio::time::sleep(SIMULATED_LATENCY).await;

    let line_count = code.lines().count();
    Ok(json!({
        "status": "success",
        "stdout": format!("[simulated {language} run] {line_count} line(s) executed"),
        "exit_code": 0,
        "duration_ms": SIMULATED_LATENCY.as_millis() as u64,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn reports_a_simulated_run() {
        let out = run(json!({"language": "rust", "code": "fn main() {}\n"})).await.unwrap();
        assert_eq!(out["status"], "success");
        assert_eq!(out["exit_code"], 0);
        assert!(out["stdout"].as_str().unwrap().contains("rust"));
    }

    #[tokio::test]
    async fn missing_code_is_invalid_input() {
        let err = run(json!({"language": "python"})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }
}
