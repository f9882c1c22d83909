//! Mock weather lookup.

use super::{optional_str, require_str};
use crate::{ToolError, ToolSpec};
use rand::Rng;
use serde_json::{Value, json};

const CONDITIONS: [&str; 4] = ["clear", "partly cloudy", "overcast", "light rain"];

pub fn spec() -> ToolSpec {
    ToolSpec::builder("getWeather", "Get the current weather for a location.")
        .string("location", "City and country, e.g. \"Tokyo, JP\"")
        .string_enum("unit", "Temperature unit", &["C", "F"])
        .require("location")
        .build()
}

/// Returns a random temperature between 10 and 49 degrees; the location is
/// echoed back unchanged. Unit defaults to Fahrenheit.
pub async fn run(args: Value) -> Result<Value, ToolError> {
    let location = require_str(&args, "location")?;
    let unit = optional_str(&args, "unit").unwrap_or_else(|| "F".to_string());

    let mut rng = rand::thread_rng();
    let degrees: i32 = rng.gen_range(10..50);
    let conditions = CONDITIONS[rng.gen_range(0..CONDITIONS.len())];

    Ok(json!({
        "temperature": format!("{degrees}° {unit}"),
        "location": location,
        "conditions": conditions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoes_location_and_formats_temperature() {
        let out = run(json!({"location": "Tokyo, JP"})).await.unwrap();
        assert_eq!(out["location"], "Tokyo, JP");

        let temperature = out["temperature"].as_str().unwrap();
        let degrees: i32 = temperature.strip_suffix("° F").unwrap().parse().unwrap();
        assert!((10..50).contains(&degrees));
    }

    #[tokio::test]
    async fn honors_requested_unit() {
        let out = run(json!({"location": "Oslo, NO", "unit": "C"})).await.unwrap();
        assert!(out["temperature"].as_str().unwrap().ends_with("° C"));
    }

    #[tokio::test]
    async fn missing_location_is_invalid_input() {
        let err = run(json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }
}
