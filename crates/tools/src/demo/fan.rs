//! Mock fan controller.

use super::require_str;
use crate::{ToolError, ToolSpec};
use serde_json::{Value, json};

pub fn spec() -> ToolSpec {
    ToolSpec::builder("controlFan", "Set the fan's speed and operating mode.")
        .number("speed", "Fan speed as a percentage of maximum, 0-100")
        .string_enum("mode", "Operating mode", &["low", "medium", "high", "auto"])
        .require("speed")
        .require("mode")
        .build()
}

pub async fn run(args: Value) -> Result<Value, ToolError> {
    let speed = args
        .get("speed")
        .and_then(Value::as_f64)
        .ok_or_else(|| ToolError::InvalidInput("missing or non-numeric field: speed".into()))?;
    let mode = require_str(&args, "mode")?;

    Ok(json!({
        "status": "success",
        "message": format!("Fan set to {speed}% speed in {mode} mode."),
    }))
}
