//! Editor tools and their resolution from instance configuration

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::collaborators::CollaboratorError;

/// Client-side description of a tool, embedded in the activation script
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

impl ToolDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            options: Map::new(),
        }
    }
}

/// A plugin unit that extends the client editor
pub trait Tool: fmt::Debug + Send + Sync {
    fn id(&self) -> &str;

    /// Register the tool's client assets for the current render
    fn init_assets(&self) -> Result<(), CollaboratorError>;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(self.id())
    }
}

/// Looks up a tool by id for a given editor instance
pub trait ToolLookup {
    fn get_tool(
        &self,
        tool_id: &str,
        instance_id: &str,
    ) -> Result<Option<Arc<dyn Tool>>, CollaboratorError>;
}

/// The resolved tools of an editor instance, in configured order
#[derive(Debug, Clone, Default)]
pub struct ToolSet {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolSet {
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    /// Resolve configured tool ids through `lookup`.
    ///
    /// Ids the lookup does not know are dropped; lookup failures propagate.
    pub fn resolve(
        instance_id: &str,
        tool_ids: &[String],
        lookup: &dyn ToolLookup,
    ) -> Result<Self, CollaboratorError> {
        let mut tools = Vec::with_capacity(tool_ids.len());
        for tool_id in tool_ids {
            match lookup.get_tool(tool_id, instance_id)? {
                Some(tool) => tools.push(tool),
                None => tracing::debug!(tool_id = %tool_id, instance_id, "dropping unknown tool"),
            }
        }
        Ok(Self { tools })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.id()).collect()
    }

    /// Trigger every tool's asset initialization
    pub fn load(&self) -> Result<(), CollaboratorError> {
        for tool in &self.tools {
            tool.init_assets()?;
        }
        Ok(())
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }
}

/// Tool ids listed under the `tools` key of an instance config
pub fn configured_tool_ids(config: &Map<String, Value>) -> Vec<String> {
    match config.get("tools") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct CountingTool {
        id: String,
        loads: AtomicUsize,
    }

    impl Tool for CountingTool {
        fn id(&self) -> &str {
            &self.id
        }

        fn init_assets(&self) -> Result<(), CollaboratorError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct MapLookup(HashMap<String, Arc<CountingTool>>);

    impl ToolLookup for MapLookup {
        fn get_tool(
            &self,
            tool_id: &str,
            _instance_id: &str,
        ) -> Result<Option<Arc<dyn Tool>>, CollaboratorError> {
            Ok(self
                .0
                .get(tool_id)
                .map(|t| Arc::clone(t) as Arc<dyn Tool>))
        }
    }

    struct FailingLookup;

    impl ToolLookup for FailingLookup {
        fn get_tool(&self, _: &str, _: &str) -> Result<Option<Arc<dyn Tool>>, CollaboratorError> {
            Err(CollaboratorError::new("plugin registry unavailable"))
        }
    }

    fn tool(id: &str) -> Arc<CountingTool> {
        Arc::new(CountingTool {
            id: id.to_string(),
            loads: AtomicUsize::new(0),
        })
    }

    fn lookup(ids: &[&str]) -> MapLookup {
        MapLookup(ids.iter().map(|id| (id.to_string(), tool(id))).collect())
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_keeps_order_and_drops_unknown() {
        let set = ToolSet::resolve("board", &strings(&["emoji", "missing", "code"]), &lookup(&["code", "emoji"]))
            .unwrap();
        assert_eq!(set.ids(), vec!["emoji", "code"]);
    }

    #[test]
    fn test_lookup_failure_propagates() {
        let err = ToolSet::resolve("board", &strings(&["code"]), &FailingLookup).unwrap_err();
        assert_eq!(err.to_string(), "plugin registry unavailable");
    }

    #[test]
    fn test_load_triggers_each_tool_every_time() {
        let code = tool("code");
        let set = ToolSet::new(vec![code.clone() as Arc<dyn Tool>]);
        set.load().unwrap();
        set.load().unwrap();
        assert_eq!(code.loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_configured_tool_ids() {
        let config = json!({"tools": ["a", "b", 3]});
        assert_eq!(configured_tool_ids(config.as_object().unwrap()), strings(&["a", "b"]));

        let config = json!({"tools": "a, b"});
        assert_eq!(configured_tool_ids(config.as_object().unwrap()), strings(&["a", "b"]));

        let config = json!({});
        assert!(configured_tool_ids(config.as_object().unwrap()).is_empty());
    }

    #[test]
    fn test_descriptor_serialization() {
        let descriptor = ToolDescriptor::new("code");
        assert_eq!(serde_json::to_value(&descriptor).unwrap(), json!({"id": "code"}));
    }
}
