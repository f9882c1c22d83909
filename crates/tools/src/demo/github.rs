//! Live GitHub repository search.

use super::require_str;
use crate::{ToolError, ToolSpec};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

const SEARCH_URL: &str = "https://api.github.com/search/repositories";
const RESULT_LIMIT: usize = 5;

pub fn spec() -> ToolSpec {
    ToolSpec::builder(
        "search_github_repo",
        "Search GitHub for repositories matching a query.",
    )
    .string("query", "Search terms, e.g. \"rust web framework\"")
    .require("query")
    .build()
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<RepoItem>,
}

#[derive(Debug, Deserialize)]
struct RepoItem {
    full_name: String,
    html_url: String,
    description: Option<String>,
    stargazers_count: u64,
}

/// Upstream failures are returned as a `{status: "failure"}` payload rather
/// than an error, so the model can see them and react.
pub async fn run(client: reqwest::Client, args: Value) -> Result<Value, ToolError> {
    let query = require_str(&args, "query")?;

    Ok(match search(&client, &query).await {
        Ok(results) => json!({ "status": "success", "results": results }),
        Err(error) => {
            warn!(%query, %error, "repository search failed");
            json!({ "status": "failure", "error": error })
        }
    })
}

async fn search(client: &reqwest::Client, query: &str) -> Result<Vec<Value>, String> {
    let response = client
        .get(SEARCH_URL)
        .query(&[("q", query.to_string()), ("per_page", RESULT_LIMIT.to_string())])
        .header("user-agent", "skiff")
        .header("accept", "application/vnd.github+json")
        .send()
        .await
        .map_err(|e| format!("request failed: {e}"))?;

    if !response.status().is_success() {
        return Err(format!("GitHub API returned {}", response.status()));
    }

    let body: SearchResponse = response
        .json()
        .await
        .map_err(|e| format!("invalid search response: {e}"))?;

    Ok(body
        .items
        .into_iter()
        .take(RESULT_LIMIT)
        .map(|item| {
            json!({
                "name": item.full_name,
                "url": item.html_url,
                "description": item.description.unwrap_or_default(),
                "stars": item.stargazers_count,
            })
        })
        .collect())
}
