//! Google Gemini API backend.

use crate::model::{
    Backend, ModelError, ModelReply, ModelRequest, ModelResponse, ToolCall, Turn, Usage,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

// ─────────────────────────────────────────────────────────────────────────────
// API Wire Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ApiRequest {
    #[serde(skip_serializing_if = "Option::is_none", rename = "systemInstruction")]
    system_instruction: Option<ApiSystemInstruction>,
    contents: Vec<ApiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ApiToolGroup>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "generationConfig")]
    generation_config: Option<ApiGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct ApiSystemInstruction {
    parts: Vec<ApiTextPart>,
}

#[derive(Debug, Serialize)]
struct ApiTextPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct ApiContent {
    role: &'static str,
    parts: Vec<ApiPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ApiPart {
    Text {
        text: String,
    },
    FunctionCall {
        #[serde(rename = "functionCall")]
        function_call: ApiFunctionCall,
    },
    FunctionResponse {
        #[serde(rename = "functionResponse")]
        function_response: ApiFunctionResponse,
    },
}

#[derive(Debug, Serialize)]
struct ApiFunctionCall {
    name: String,
    args: Value,
}

#[derive(Debug, Serialize)]
struct ApiFunctionResponse {
    name: String,
    response: Value,
}

#[derive(Debug, Serialize)]
struct ApiToolGroup {
    #[serde(rename = "functionDeclarations")]
    function_declarations: Vec<Value>,
}

#[derive(Debug, Serialize)]
struct ApiGenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<ApiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct ApiCandidate {
    content: Option<ApiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ApiResponseContent {
    #[serde(default)]
    parts: Vec<ApiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ApiResponsePart {
    text: Option<String>,
    #[serde(rename = "functionCall")]
    function_call: Option<ApiResponseFunctionCall>,
}

#[derive(Debug, Deserialize)]
struct ApiResponseFunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Deserialize)]
struct ApiUsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    prompt_token_count: u32,
    #[serde(rename = "candidatesTokenCount", default)]
    candidates_token_count: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend Implementation
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for creating a Gemini backend.
#[derive(Debug, Clone)]
pub struct GeminiBackendBuilder {
    api_key: String,
    model: String,
    max_output_tokens: Option<u32>,
}

impl GeminiBackendBuilder {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            max_output_tokens: None,
        }
    }

    pub fn max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    pub fn build(self) -> GeminiBackend {
        GeminiBackend {
            client: reqwest::Client::new(),
            api_key: self.api_key,
            model: self.model,
            max_output_tokens: self.max_output_tokens,
        }
    }
}

/// Gemini API backend.
pub struct GeminiBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_output_tokens: Option<u32>,
}

impl GeminiBackend {
    pub fn builder(api_key: impl Into<String>, model: impl Into<String>) -> GeminiBackendBuilder {
        GeminiBackendBuilder::new(api_key, model)
    }

    fn turn_to_api(turn: &Turn) -> ApiContent {
        match turn {
            Turn::User(text) => ApiContent {
                role: "user",
                parts: vec![ApiPart::Text { text: text.clone() }],
            },
            Turn::Model(text) => ApiContent {
                role: "model",
                parts: vec![ApiPart::Text { text: text.clone() }],
            },
            Turn::ToolCalls(calls) => ApiContent {
                role: "model",
                parts: calls
                    .iter()
                    .map(|call| ApiPart::FunctionCall {
                        function_call: ApiFunctionCall {
                            name: call.name.clone(),
                            args: call.args.clone(),
                        },
                    })
                    .collect(),
            },
            Turn::ToolResults(results) => ApiContent {
                role: "user",
                parts: results
                    .iter()
                    .map(|result| ApiPart::FunctionResponse {
                        function_response: ApiFunctionResponse {
                            name: result.name.clone(),
                            response: result.outcome.payload(),
                        },
                    })
                    .collect(),
            },
        }
    }

    fn response_to_reply(candidates: Vec<ApiCandidate>) -> Result<ModelReply, ModelError> {
        let candidate = candidates
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::InvalidResponse("no candidates".into()))?;
        let parts = candidate.content.map(|c| c.parts).unwrap_or_default();

        let mut text = String::new();
        let mut calls = Vec::new();
        for part in parts {
            if let Some(t) = part.text {
                text.push_str(&t);
            }
            if let Some(fc) = part.function_call {
                calls.push(ToolCall {
                    name: fc.name,
                    args: fc.args,
                });
            }
        }

        Ok(ModelReply { text, calls })
    }
}

impl std::fmt::Display for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gemini({})", self.model)
    }
}

impl Backend for GeminiBackend {
    async fn call(&self, request: ModelRequest<'_>) -> Result<ModelResponse, ModelError> {
        let contents: Vec<ApiContent> = request.turns.iter().map(Self::turn_to_api).collect();

        let tools = if request.tools.is_empty() {
            Vec::new()
        } else {
            vec![ApiToolGroup {
                function_declarations: request.tools.iter().map(|s| s.declaration()).collect(),
            }]
        };

        let api_request = ApiRequest {
            system_instruction: request.system.map(|s| ApiSystemInstruction {
                parts: vec![ApiTextPart {
                    text: s.to_string(),
                }],
            }),
            contents,
            tools,
            generation_config: self
                .max_output_tokens
                .map(|max_output_tokens| ApiGenerationConfig { max_output_tokens }),
        };

        let url = format!("{GEMINI_API_BASE}/{}:generateContent", self.model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api(format!("{status}: {body}")));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        let reply = Self::response_to_reply(api_response.candidates)?;
        let usage = api_response
            .usage_metadata
            .map(|u| Usage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        Ok(ModelResponse { reply, usage })
    }
}
