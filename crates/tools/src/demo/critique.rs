//! Simulated code critique.

use super::require_str;
use crate::{ToolError, ToolSpec};
use serde_json::{Value, json};

pub fn spec() -> ToolSpec {
    ToolSpec::builder(
        "perform_code_critique",
        "Review a code snippet and return critique remarks.",
    )
    .string("code", "Source code to review")
    .require("code")
    .build()
}

/// Deterministic remarks from shallow inspection of the snippet.
pub async fn run(args: Value) -> Result<Value, ToolError> {
    let code = require_str(&args, "code")?;

    let mut remarks = Vec::new();
    if code.contains("unwrap(") {
        remarks.push("unwrap() will panic on the error path; propagate the error instead");
    }
    if code.contains("TODO") {
        remarks.push("unresolved TODO marker left in the snippet");
    }
    if code.lines().count() > 50 {
        remarks.push("long function; consider splitting it up");
    }
    if code.lines().any(|l| l.len() > 120) {
        remarks.push("lines exceed 120 columns");
    }

    let critique = if remarks.is_empty() {
        "No obvious issues found.".to_string()
    } else {
        format!("{} issue(s) worth a look.", remarks.len())
    };

    Ok(json!({
        "status": "success",
        "critique": critique,
        "remarks": remarks,
    }))
}
