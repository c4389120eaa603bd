//! Workflow prompt: the host's node-id to node-record mapping
//!
//! Programs reach this through the `node()` and `nodes()` builtins. Node
//! records are plain mapping values (`class_type`, `inputs`, `_meta`), so
//! attribute access on them follows the usual mapping rules.

use indexmap::IndexMap;
use thiserror::Error;
use tracing::warn;

use crate::value::Value;

/// Failure loading a prompt from JSON.
#[derive(Error, Debug)]
pub enum PromptError {
    /// Text is not valid JSON
    #[error("invalid prompt JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Top level is not an object keyed by node id
    #[error("prompt must be a JSON object keyed by node id, found {0}")]
    NotAnObject(&'static str),
}

/// The hidden workflow prompt of one execution.
#[derive(Debug, Clone, Default)]
pub struct Prompt {
    nodes: IndexMap<String, Value>,
}

impl Prompt {
    /// Create an empty prompt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the host's prompt JSON.
    ///
    /// # Errors
    ///
    /// Returns `PromptError` if the text isn't a JSON object.
    pub fn from_json_str(text: &str) -> Result<Self, PromptError> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json(json)
    }

    /// Build from an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns `PromptError::NotAnObject` if the top level isn't an object.
    pub fn from_json(json: serde_json::Value) -> Result<Self, PromptError> {
        let serde_json::Value::Object(fields) = json else {
            return Err(PromptError::NotAnObject(json_kind(&json)));
        };
        Ok(Self {
            nodes: fields
                .into_iter()
                .map(|(id, node)| (id, Value::from(node)))
                .collect(),
        })
    }

    /// Add or replace a node record.
    pub fn insert(&mut self, id: impl Into<String>, node: Value) {
        self.nodes.insert(id.into(), node);
    }

    /// Node record by exact id.
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.nodes.get(id)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the prompt has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up one node by id or, failing that, by `_meta.title`.
    ///
    /// Ids are compared as text, so `node(14)` and `node('14')` agree. When
    /// several nodes share the title the first is returned.
    pub fn find_node(&self, key: &Value) -> Option<&Value> {
        let key = key_text(key);
        if let Some(node) = self.nodes.get(&key) {
            return Some(node);
        }

        let mut matches = self
            .nodes
            .values()
            .filter(|node| title(node) == Some(key.as_str()));
        let first = matches.next()?;
        let others = matches.count();
        if others > 0 {
            warn!(
                title = %key,
                count = others + 1,
                "multiple nodes share this title; using the first"
            );
        }
        Some(first)
    }

    /// All nodes, or every node whose id or title matches `key`.
    pub fn find_nodes(&self, key: Option<&Value>) -> Vec<Value> {
        let Some(key) = key else {
            return self.nodes.values().cloned().collect();
        };
        let key = key_text(key);
        self.nodes
            .iter()
            .filter(|(id, node)| **id == key || title(node) == Some(key.as_str()))
            .map(|(_, node)| node.clone())
            .collect()
    }
}

fn title(node: &Value) -> Option<&str> {
    node.get("_meta")?.get("title")?.as_str()
}

fn key_text(key: &Value) -> String {
    match key {
        Value::Str(s) => s.to_string(),
        other => other.to_string(),
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PROMPT: &str = r#"{
        "3": {"class_type": "KSampler", "inputs": {"seed": 42}, "_meta": {"title": "Sampler"}},
        "7": {"class_type": "CLIPTextEncode", "inputs": {"text": "a cat"}, "_meta": {"title": "Prompt"}},
        "8": {"class_type": "CLIPTextEncode", "inputs": {"text": "a dog"}, "_meta": {"title": "Prompt"}}
    }"#;

    #[test]
    fn test_find_node_by_id() {
        let prompt = Prompt::from_json_str(PROMPT).unwrap();
        let node = prompt.find_node(&Value::Int(3)).unwrap();
        assert_eq!(node.get("class_type"), Some(&Value::string("KSampler")));
    }

    #[test]
    fn test_find_node_by_title_takes_first() {
        let prompt = Prompt::from_json_str(PROMPT).unwrap();
        let node = prompt.find_node(&Value::string("Prompt")).unwrap();
        let text = node.get("inputs").and_then(|i| i.get("text"));
        assert_eq!(text, Some(&Value::string("a cat")));
    }

    #[test]
    fn test_find_node_missing() {
        let prompt = Prompt::from_json_str(PROMPT).unwrap();
        assert!(prompt.find_node(&Value::string("Nope")).is_none());
    }

    #[test]
    fn test_find_nodes() {
        let prompt = Prompt::from_json_str(PROMPT).unwrap();
        assert_eq!(prompt.find_nodes(None).len(), 3);
        assert_eq!(prompt.find_nodes(Some(&Value::string("Prompt"))).len(), 2);
        assert_eq!(prompt.find_nodes(Some(&Value::Int(7))).len(), 1);
    }

    #[test]
    fn test_rejects_non_object() {
        let err = Prompt::from_json_str("[1, 2]").unwrap_err();
        assert_eq!(
            err.to_string(),
            "prompt must be a JSON object keyed by node id, found an array"
        );
    }
}
