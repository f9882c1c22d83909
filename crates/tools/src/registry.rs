//! Registry of tool executors keyed by name.

use crate::{ToolError, ToolSpec};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;
use tracing::debug;

/// A boxed, in-flight tool execution.
pub type BoxedExecution = Pin<Box<dyn Future<Output = Result<Value, ToolError>> + Send>>;

type Executor = Box<dyn Fn(Value) -> BoxedExecution + Send + Sync>;

/// Errors detected while assembling a registry.
///
/// These are configuration defects, surfaced at startup rather than at
/// dispatch time.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate tool name: {0}")]
    DuplicateTool(String),
    #[error("tool {tool} requires undeclared field {field}")]
    UnknownRequiredField { tool: String, field: String },
}

/// Immutable set of tool specs with one executor per spec.
///
/// Built once at startup via [`RegistryBuilder`]; `register` pairs every
/// spec with its executor, so the declared set and the executable set
/// cannot drift apart.
pub struct Registry {
    specs: Vec<ToolSpec>,
    executors: HashMap<String, Executor>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Declared tool specs, in registration order.
    pub fn specs(&self) -> &[ToolSpec] {
        &self.specs
    }

    /// Whether a tool with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.executors.contains_key(name)
    }

    /// Resolve a tool name to its executor and invoke it.
    ///
    /// An unregistered name yields `ToolError::NotFound`. Argument shape is
    /// not validated here; each executor fails on its own terms.
    pub async fn dispatch(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let executor = self
            .executors
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        debug!(tool = name, "dispatching");
        executor(args).await
    }
}

/// Builder for assembling a [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<(ToolSpec, Executor)>,
}

impl RegistryBuilder {
    /// Register a tool spec together with its executor.
    pub fn register<F, Fut>(mut self, spec: ToolSpec, executor: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
    {
        let boxed: Executor = Box::new(move |args| Box::pin(executor(args)));
        self.entries.push((spec, boxed));
        self
    }

    /// Validate the declared set and produce the registry.
    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut specs = Vec::with_capacity(self.entries.len());
        let mut executors = HashMap::with_capacity(self.entries.len());

        for (spec, executor) in self.entries {
            for field in &spec.required {
                if !spec.fields.iter().any(|f| &f.name == field) {
                    return Err(RegistryError::UnknownRequiredField {
                        tool: spec.name.clone(),
                        field: field.clone(),
                    });
                }
            }
            if executors.insert(spec.name.clone(), executor).is_some() {
                return Err(RegistryError::DuplicateTool(spec.name));
            }
            specs.push(spec);
        }

        Ok(Registry { specs, executors })
    }
}
