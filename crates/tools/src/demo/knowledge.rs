//! Simulated knowledge retrieval.

use super::require_str;
use crate::{ToolError, ToolSpec};
use serde_json::{Value, json};

pub fn spec() -> ToolSpec {
    ToolSpec::builder(
        "retrieve_knowledge",
        "Retrieve the most relevant knowledge-base passages for a query.",
    )
    .string("query", "What to look up")
    .require("query")
    .build()
}

/// Canned, deterministic snippets standing in for a vector search.
pub async fn run(args: Value) -> Result<Value, ToolError> {
    let query = require_str(&args, "query")?;

    Ok(json!({
        "status": "success",
        "snippets": [
            {
                "source": "handbook/overview.md",
                "text": format!("Closest indexed passage for \"{query}\"."),
                "score": 0.92,
            },
            {
                "source": "handbook/faq.md",
                "text": format!("A frequently asked question touching on \"{query}\"."),
                "score": 0.81,
            },
            {
                "source": "notes/archive.md",
                "text": format!("Older archived note loosely related to \"{query}\"."),
                "score": 0.64,
            },
        ],
    }))
}
