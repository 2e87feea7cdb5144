//! Editor settings loaded from TOML
//!
//! A settings file describes one editor instance together with the tables
//! backing the [standalone](crate::standalone) collaborators:
//!
//! ```toml
//! [editor]
//! instance_id = "board"
//! format = "html"
//!
//! [config]
//! tools = ["code"]
//! fontFamily = "Arial, serif"
//!
//! [permissions]
//! html = true
//!
//! [images]
//! base_url = "/media"
//!
//! [[tools]]
//! id = "code"
//! name = "Code block"
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::format::{builtin_format, HtmlFormat};
use crate::instance::{AttachedFile, EditorArguments, EditorInstance};
use crate::markers::MarkerNames;
use crate::standalone::{FileListView, ImageTable, PermissionTable, RouteTable, StaticTool, ToolCatalog};
use crate::tools::ToolDescriptor;
use crate::{Editor, EditorError};

/// Errors that can occur when loading settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse settings TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditorSection {
    pub instance_id: String,
    pub format: String,
    pub script_only: bool,
}

impl Default for EditorSection {
    fn default() -> Self {
        Self {
            instance_id: "default".to_string(),
            format: HtmlFormat::NAME.to_string(),
            script_only: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouteSettings {
    /// Prefix for routes without an explicit URL
    pub base: String,
    pub strict: bool,
    /// Route name to URL, e.g. `"editor.file.upload" = "/upload"`
    pub urls: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    pub base_url: Option<String>,
    pub urls: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolSettings {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub options: Map<String, Value>,
}

/// Everything needed to build a standalone [`Editor`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub editor: EditorSection,
    /// Instance configuration, passed through to the options payload
    pub config: Option<Map<String, Value>>,
    pub arguments: EditorArguments,
    pub routes: RouteSettings,
    pub permissions: BTreeMap<String, bool>,
    pub images: Option<ImageSettings>,
    pub files: Vec<AttachedFile>,
    pub tools: Vec<ToolSettings>,
    pub markers: Option<MarkerNames>,
}

impl Settings {
    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse settings from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Build an editor backed by the standalone collaborators.
    ///
    /// An image resolver is registered only when an `[images]` table exists.
    pub fn build_editor(&self) -> Result<Editor, EditorError> {
        let format = builtin_format(&self.editor.format).ok_or_else(|| {
            EditorError::configuration(format!("unknown editor format `{}`", self.editor.format))
        })?;

        let catalog = self.tools.iter().fold(ToolCatalog::new(), |catalog, tool| {
            catalog.with_tool(Arc::new(StaticTool::new(ToolDescriptor {
                id: tool.id.clone(),
                name: tool.name.clone(),
                options: tool.options.clone(),
            })))
        });

        let mut builder = EditorInstance::builder(self.editor.instance_id.clone())
            .files(self.files.clone());
        if let Some(config) = &self.config {
            builder = builder.config(config.clone());
        }
        builder = if self.editor.script_only {
            builder.script_only()
        } else {
            builder.arguments(self.arguments.clone())
        };
        let instance = builder.build(&catalog)?;

        let mut routes = RouteTable::new(self.routes.urls.clone()).with_base(self.routes.base.clone());
        if self.routes.strict {
            routes = routes.strict();
        }

        let mut editor = Editor::new(
            instance,
            format,
            Arc::new(routes),
            Arc::new(PermissionTable::new(self.permissions.clone())),
            Arc::new(FileListView),
        );
        if let Some(markers) = &self.markers {
            editor = editor.with_markers(markers.clone());
        }
        if let Some(images) = &self.images {
            let mut table = ImageTable::new(images.urls.clone());
            if let Some(base_url) = &images.base_url {
                table = table.with_base_url(base_url.clone());
            }
            editor.register_image_resolver(table)?;
        }
        Ok(editor)
    }
}
