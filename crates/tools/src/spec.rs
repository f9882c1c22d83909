//! Tool specifications and their declaration schema.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// The type of a declared parameter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParamKind {
    String,
    Number,
}

impl ParamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Number => "NUMBER",
        }
    }
}

/// A single named parameter field in a tool declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamField {
    pub name: String,
    pub kind: ParamKind,
    pub description: String,
    /// Allowed values, when the field is restricted to an enumerated set.
    pub values: Option<Vec<String>>,
}

/// A tool definition exposed to the model.
///
/// Immutable once built; the registry sends these verbatim on every model
/// call. A malformed spec is a configuration-time defect and is rejected
/// when the registry is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub fields: Vec<ParamField>,
    pub required: Vec<String>,
}

impl ToolSpec {
    pub fn builder(name: impl Into<String>, description: impl Into<String>) -> ToolSpecBuilder {
        ToolSpecBuilder::new(name, description)
    }

    /// Render this spec as a function declaration object for the model.
    ///
    /// Fields become an OBJECT schema with STRING/NUMBER properties and an
    /// optional enum restriction; parameterless tools omit the schema.
    pub fn declaration(&self) -> Value {
        if self.fields.is_empty() {
            return json!({
                "name": self.name,
                "description": self.description,
            });
        }

        let mut properties = Map::new();
        for field in &self.fields {
            let mut prop = Map::new();
            prop.insert("type".into(), Value::String(field.kind.as_str().into()));
            prop.insert("description".into(), Value::String(field.description.clone()));
            if let Some(values) = &field.values {
                prop.insert("enum".into(), json!(values));
            }
            properties.insert(field.name.clone(), Value::Object(prop));
        }

        json!({
            "name": self.name,
            "description": self.description,
            "parameters": {
                "type": "OBJECT",
                "properties": properties,
                "required": self.required,
            },
        })
    }
}

/// Builder for creating a tool spec.
#[derive(Debug, Clone)]
pub struct ToolSpecBuilder {
    name: String,
    description: String,
    fields: Vec<ParamField>,
    required: Vec<String>,
}

impl ToolSpecBuilder {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            fields: Vec::new(),
            required: Vec::new(),
        }
    }

    /// Add a free-form string field.
    pub fn string(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.fields.push(ParamField {
            name: name.into(),
            kind: ParamKind::String,
            description: description.into(),
            values: None,
        });
        self
    }

    /// Add a string field restricted to an enumerated value set.
    pub fn string_enum(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        values: &[&str],
    ) -> Self {
        self.fields.push(ParamField {
            name: name.into(),
            kind: ParamKind::String,
            description: description.into(),
            values: Some(values.iter().map(|v| v.to_string()).collect()),
        });
        self
    }

    /// Add a numeric field.
    pub fn number(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.fields.push(ParamField {
            name: name.into(),
            kind: ParamKind::Number,
            description: description.into(),
            values: None,
        });
        self
    }

    /// Mark a previously added field as required.
    pub fn require(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    pub fn build(self) -> ToolSpec {
        ToolSpec {
            name: self.name,
            description: self.description,
            fields: self.fields,
            required: self.required,
        }
    }
}
