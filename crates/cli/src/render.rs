//! Terminal renderer for session events.

use chat::{EventSink, SessionEvent, ToolOutcome};
use serde_json::Value;

/// Prints each session event to stdout as it happens.
///
/// Purely an observer; nothing rendered here feeds back into the loop.
pub struct TermRenderer;

impl EventSink for TermRenderer {
    fn emit(&self, event: SessionEvent) {
        match event {
            // The prompt already echoes the user's line.
            SessionEvent::UserMessage { .. } => {}
            SessionEvent::ToolCallStarted { name, args } => {
                println!("  → {name} {args}");
            }
            SessionEvent::ToolCallFinished { name, outcome } => match outcome {
                ToolOutcome::Success { output } => print_output(&name, &output),
                ToolOutcome::Failure { error } => println!("  ✗ {name}: {error}"),
            },
            SessionEvent::ModelText { text } => {
                println!("\n{text}\n");
            }
        }
    }
}

fn print_output(name: &str, output: &Value) {
    // Repository search results get a structured listing; everything else
    // is a generic key-value dump.
    if name == "search_github_repo" {
        if let Some(results) = output.get("results").and_then(Value::as_array) {
            print_repo_list(results);
            return;
        }
    }
    print_key_values(name, output);
}

fn print_repo_list(results: &[Value]) {
    if results.is_empty() {
        println!("  ✓ search_github_repo: no matches");
        return;
    }
    for repo in results {
        let stars = repo["stars"].as_u64().unwrap_or(0);
        let name = repo["name"].as_str().unwrap_or("<unnamed>");
        println!("  ★ {stars:>6}  {name}");
        if let Some(description) = repo["description"].as_str().filter(|d| !d.is_empty()) {
            println!("           {description}");
        }
        if let Some(url) = repo["url"].as_str() {
            println!("           {url}");
        }
    }
}

fn print_key_values(name: &str, output: &Value) {
    match output.as_object() {
        Some(map) => {
            println!("  ✓ {name}");
            for (key, value) in map {
                println!("      {key}: {}", flat(value));
            }
        }
        None => println!("  ✓ {name}: {output}"),
    }
}

/// Strings without quotes, everything else as compact JSON.
fn flat(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
