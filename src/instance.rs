//! Per-request editor state

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::collaborators::CollaboratorError;
use crate::tools::{configured_tool_ids, ToolLookup, ToolSet};

/// A file attached to the content being edited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachedFile {
    pub id: String,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Anything else the host application attaches to a file
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AttachedFile {
    pub fn new(id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            filename: filename.into(),
            mime: None,
            size: None,
            extra: Map::new(),
        }
    }
}

/// Display options for the content input; unset fields take the defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorArguments {
    pub content: Option<String>,
    pub content_dom_name: Option<String>,
    pub content_dom_id: Option<String>,
    /// Extra attributes of the input element, replacing the default set
    pub content_dom_options: Option<Vec<(String, String)>>,
    pub placeholder: Option<String>,
}

/// [`EditorArguments`] merged over the defaults
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedArguments {
    pub content: String,
    pub content_dom_name: String,
    pub content_dom_id: String,
    pub content_dom_options: Vec<(String, String)>,
    pub placeholder: String,
}

impl Default for ResolvedArguments {
    fn default() -> Self {
        Self {
            content: String::new(),
            content_dom_name: "content".to_string(),
            content_dom_id: "xeContentEditor".to_string(),
            content_dom_options: vec![
                ("class".to_string(), "form-control".to_string()),
                ("rows".to_string(), "20".to_string()),
                ("cols".to_string(), "80".to_string()),
            ],
            placeholder: "Content".to_string(),
        }
    }
}

impl EditorArguments {
    /// Merge over the defaults; each set field replaces its default wholesale
    pub fn resolve(&self) -> ResolvedArguments {
        let defaults = ResolvedArguments::default();
        ResolvedArguments {
            content: self.content.clone().unwrap_or(defaults.content),
            content_dom_name: self
                .content_dom_name
                .clone()
                .unwrap_or(defaults.content_dom_name),
            content_dom_id: self.content_dom_id.clone().unwrap_or(defaults.content_dom_id),
            content_dom_options: self
                .content_dom_options
                .clone()
                .unwrap_or(defaults.content_dom_options),
            placeholder: self.placeholder.clone().unwrap_or(defaults.placeholder),
        }
    }
}

/// How an editor renders itself
#[derive(Debug, Clone, PartialEq)]
pub enum RenderMode {
    /// Content input plus activation script
    Full(EditorArguments),
    /// Only tool assets are loaded; the host page provides the markup
    ScriptOnly,
}

impl Default for RenderMode {
    fn default() -> Self {
        RenderMode::Full(EditorArguments::default())
    }
}

/// One use of an editor: identity, configuration, display arguments,
/// attached files and the tools resolved from the configuration.
///
/// Tools are resolved once when the instance is built. The configuration
/// cannot change afterwards, so the tool list always reflects it.
#[derive(Debug, Clone)]
pub struct EditorInstance {
    instance_id: String,
    config: Option<Map<String, Value>>,
    mode: RenderMode,
    files: Vec<AttachedFile>,
    tools: ToolSet,
}

impl EditorInstance {
    pub fn builder(instance_id: impl Into<String>) -> EditorInstanceBuilder {
        EditorInstanceBuilder {
            instance_id: instance_id.into(),
            config: None,
            mode: RenderMode::default(),
            files: Vec::new(),
        }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// The configuration map, if one was set
    pub fn config(&self) -> Option<&Map<String, Value>> {
        self.config.as_ref()
    }

    pub fn mode(&self) -> &RenderMode {
        &self.mode
    }

    pub fn is_script_only(&self) -> bool {
        matches!(self.mode, RenderMode::ScriptOnly)
    }

    /// Display arguments merged over the defaults
    pub fn arguments(&self) -> ResolvedArguments {
        match &self.mode {
            RenderMode::Full(args) => args.resolve(),
            RenderMode::ScriptOnly => ResolvedArguments::default(),
        }
    }

    pub fn files(&self) -> &[AttachedFile] {
        &self.files
    }

    pub fn set_files(&mut self, files: Vec<AttachedFile>) {
        self.files = files;
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }
}

pub struct EditorInstanceBuilder {
    instance_id: String,
    config: Option<Map<String, Value>>,
    mode: RenderMode,
    files: Vec<AttachedFile>,
}

impl EditorInstanceBuilder {
    pub fn config(mut self, config: Map<String, Value>) -> Self {
        self.config = Some(config);
        self
    }

    pub fn arguments(mut self, arguments: EditorArguments) -> Self {
        self.mode = RenderMode::Full(arguments);
        self
    }

    pub fn script_only(mut self) -> Self {
        self.mode = RenderMode::ScriptOnly;
        self
    }

    pub fn files(mut self, files: Vec<AttachedFile>) -> Self {
        self.files = files;
        self
    }

    /// Build the instance, resolving its configured tools through `lookup`
    pub fn build(self, lookup: &dyn ToolLookup) -> Result<EditorInstance, CollaboratorError> {
        let tool_ids = self
            .config
            .as_ref()
            .map(configured_tool_ids)
            .unwrap_or_default();
        let tools = ToolSet::resolve(&self.instance_id, &tool_ids, lookup)?;

        Ok(EditorInstance {
            instance_id: self.instance_id,
            config: self.config,
            mode: self.mode,
            files: self.files,
            tools,
        })
    }

    /// Build an instance without tools
    pub fn build_without_tools(self) -> EditorInstance {
        EditorInstance {
            instance_id: self.instance_id,
            config: self.config,
            mode: self.mode,
            files: self.files,
            tools: ToolSet::default(),
        }
    }
}
