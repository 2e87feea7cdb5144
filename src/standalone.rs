//! Self-contained collaborator implementations
//!
//! These back the command-line tool and tests with in-memory tables so the
//! editor runs without a host application.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::collaborators::{
    AuthorizationGate, CollaboratorError, PermissionScope, UrlGenerator, ViewRenderer,
};
use crate::instance::AttachedFile;
use crate::markup::entity::escape;
use crate::resolver::{ImageResolver, ResolvedImage};
use crate::tools::{Tool, ToolDescriptor, ToolLookup};

/// Route names mapped to URLs.
///
/// Names without an entry are derived from the name itself
/// (`editor.file.upload` becomes `<base>/editor/file/upload`) unless the
/// table is strict.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: BTreeMap<String, String>,
    base: String,
    strict: bool,
}

impl RouteTable {
    pub fn new(routes: BTreeMap<String, String>) -> Self {
        Self {
            routes,
            ..Default::default()
        }
    }

    /// Prefix for derived routes
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    /// Fail for names without an explicit entry
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}

impl UrlGenerator for RouteTable {
    fn route(&self, name: &str) -> Result<String, CollaboratorError> {
        if let Some(url) = self.routes.get(name) {
            return Ok(url.clone());
        }
        if self.strict {
            return Err(CollaboratorError::new(format!("route [{}] not defined", name)));
        }
        Ok(format!(
            "{}/{}",
            self.base.trim_end_matches('/'),
            name.replace('.', "/")
        ))
    }
}

/// Abilities granted in every scope; anything unlisted is denied
#[derive(Debug, Clone, Default)]
pub struct PermissionTable {
    grants: BTreeMap<String, bool>,
}

impl PermissionTable {
    pub fn new(grants: BTreeMap<String, bool>) -> Self {
        Self { grants }
    }

    pub fn allow(mut self, ability: impl Into<String>) -> Self {
        self.grants.insert(ability.into(), true);
        self
    }
}

impl AuthorizationGate for PermissionTable {
    fn allows(&self, ability: &str, scope: &PermissionScope) -> Result<bool, CollaboratorError> {
        let allowed = self.grants.get(ability).copied().unwrap_or(false);
        tracing::trace!(ability, scope = %scope, allowed, "permission check");
        Ok(allowed)
    }
}

/// Image ids mapped to URLs, with an optional URL prefix for unlisted ids
#[derive(Debug, Clone, Default)]
pub struct ImageTable {
    urls: BTreeMap<String, String>,
    base_url: Option<String>,
}

impl ImageTable {
    pub fn new(urls: BTreeMap<String, String>) -> Self {
        Self {
            urls,
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

impl ImageResolver for ImageTable {
    fn resolve(&self, ids: &[String]) -> Result<Vec<ResolvedImage>, CollaboratorError> {
        Ok(ids
            .iter()
            .filter_map(|id| {
                let url = match (self.urls.get(id), &self.base_url) {
                    (Some(url), _) => url.clone(),
                    (None, Some(base)) => format!("{}/{}", base.trim_end_matches('/'), id),
                    (None, None) => return None,
                };
                Some(ResolvedImage::new(id.clone(), url))
            })
            .collect())
    }
}

/// A tool with a fixed client descriptor and no assets of its own
#[derive(Debug, Clone)]
pub struct StaticTool {
    descriptor: ToolDescriptor,
}

impl StaticTool {
    pub fn new(descriptor: ToolDescriptor) -> Self {
        Self { descriptor }
    }
}

impl Tool for StaticTool {
    fn id(&self) -> &str {
        &self.descriptor.id
    }

    fn init_assets(&self) -> Result<(), CollaboratorError> {
        tracing::debug!(tool = %self.descriptor.id, "initializing tool assets");
        Ok(())
    }

    fn descriptor(&self) -> ToolDescriptor {
        self.descriptor.clone()
    }
}

/// Tools available to every instance
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.insert(tool.id().to_string(), tool);
        self
    }
}

impl ToolLookup for ToolCatalog {
    fn get_tool(
        &self,
        tool_id: &str,
        _instance_id: &str,
    ) -> Result<Option<Arc<dyn Tool>>, CollaboratorError> {
        Ok(self.tools.get(tool_id).cloned())
    }
}

/// Renders the attached-file list view as a plain HTML list
#[derive(Debug, Clone, Copy, Default)]
pub struct FileListView;

impl ViewRenderer for FileListView {
    fn render(&self, view: &str, data: &Value) -> Result<String, CollaboratorError> {
        if view != crate::compiler::FILES_VIEW {
            return Err(CollaboratorError::new(format!("view [{}] not found", view)));
        }
        let files: Vec<AttachedFile> = match data.get("files") {
            Some(files) => serde_json::from_value(files.clone())
                .map_err(|e| CollaboratorError::with_source("invalid file list", e))?,
            None => Vec::new(),
        };

        let mut html = String::from(r#"<ul class="xe-editor-files">"#);
        for file in &files {
            html.push_str(&format!(
                r#"<li data-id="{}">{}{}</li>"#,
                escape(&file.id),
                escape(&file.filename),
                file.size.map(|s| format!(" ({})", human_size(s))).unwrap_or_default()
            ));
        }
        html.push_str("</ul>");
        Ok(html)
    }
}

fn human_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
