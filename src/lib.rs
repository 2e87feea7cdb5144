//! Editor Compiler - rich-content compilation for a pluggable web editor
//!
//! Content produced by a client editor carries inline markers for hashtags,
//! mentions and image references. This library rewrites those markers into
//! final markup, resolves image references in one batched lookup, hands the
//! result to a content format for display, and assembles the options payload
//! the client editor is activated with.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use editor_compiler::format::HtmlFormat;
//! use editor_compiler::instance::EditorInstance;
//! use editor_compiler::standalone::{FileListView, PermissionTable, RouteTable};
//! use editor_compiler::Editor;
//!
//! let instance = EditorInstance::builder("board").build_without_tools();
//! let editor = Editor::new(
//!     instance,
//!     Arc::new(HtmlFormat),
//!     Arc::new(RouteTable::default()),
//!     Arc::new(PermissionTable::default()),
//!     Arc::new(FileListView),
//! );
//!
//! let html = editor
//!     .compile(r#"<p><span class="__xe_hashtag">#rust</span></p>"#)
//!     .unwrap();
//! assert_eq!(html, r##"<p><a href="#rust" class="__xe_hashtag">#rust</a></p>"##);
//! ```

pub mod collaborators;
mod compiler;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod instance;
pub mod markers;
pub mod markup;
mod options;
mod render;
pub mod resolver;
pub mod selector;
pub mod standalone;
pub mod tools;

use std::sync::Arc;

use thiserror::Error;

pub use collaborators::{
    AuthorizationGate, CollaboratorError, PermissionScope, UrlGenerator, ViewRenderer,
};
pub use config::{ConfigError, Settings};
pub use error::SelectorError;
pub use extract::{extract, InlineEntity};
pub use format::{ContentFormat, HtmlFormat, PlainTextFormat};
pub use instance::{AttachedFile, EditorArguments, EditorInstance};
pub use markers::MarkerNames;
pub use options::OptionsMap;
pub use resolver::{ImageResolver, ImageResolverRegistry, ResolvedImage};
pub use tools::{Tool, ToolLookup, ToolSet};

/// Errors that can occur while compiling or rendering
#[derive(Debug, Error)]
pub enum EditorError {
    /// The editor is missing something it needs, such as an image resolver
    #[error("configuration error: {reason}")]
    Configuration { reason: String },

    /// The image resolver returned no entry for an id found in the content
    #[error("image `{id}` is missing from the resolver result")]
    ResolutionLookup { id: String },

    /// Failure from a collaborator, passed through as is
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    #[error("invalid selector `{selector}`: {source}")]
    Selector {
        selector: String,
        #[source]
        source: SelectorError,
    },

    /// Options or script arguments that cannot be encoded as JSON
    #[error("failed to serialize editor data: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EditorError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}

/// An editor bound to one instance, one content format and the host's
/// collaborators.
///
/// Compiling and rendering never mutate the editor; the same editor can
/// compile any number of documents.
pub struct Editor {
    instance: EditorInstance,
    format: Arc<dyn ContentFormat>,
    markers: MarkerNames,
    urls: Arc<dyn UrlGenerator>,
    gate: Arc<dyn AuthorizationGate>,
    views: Arc<dyn ViewRenderer>,
    images: ImageResolverRegistry,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("instance", &self.instance)
            .field("format", &self.format.name())
            .field("markers", &self.markers)
            .field("images", &self.images)
            .finish()
    }
}

impl Editor {
    /// Create an editor; marker names come from the format
    pub fn new(
        instance: EditorInstance,
        format: Arc<dyn ContentFormat>,
        urls: Arc<dyn UrlGenerator>,
        gate: Arc<dyn AuthorizationGate>,
        views: Arc<dyn ViewRenderer>,
    ) -> Self {
        let markers = format.marker_names();
        Self {
            instance,
            format,
            markers,
            urls,
            gate,
            views,
            images: ImageResolverRegistry::new(),
        }
    }

    /// Override the format's marker names
    pub fn with_markers(mut self, markers: MarkerNames) -> Self {
        self.markers = markers;
        self
    }

    /// Use an existing resolver registry
    pub fn with_images(mut self, images: ImageResolverRegistry) -> Self {
        self.images = images;
        self
    }

    /// Register the image resolver; fails if one is already registered
    pub fn register_image_resolver(
        &mut self,
        resolver: impl ImageResolver + 'static,
    ) -> Result<(), EditorError> {
        self.images.register(resolver)
    }

    pub fn instance(&self) -> &EditorInstance {
        &self.instance
    }

    /// Replace the attached files of the instance
    pub fn set_files(&mut self, files: Vec<AttachedFile>) {
        self.instance.set_files(files);
    }

    pub fn format(&self) -> &dyn ContentFormat {
        self.format.as_ref()
    }

    pub fn markers(&self) -> &MarkerNames {
        &self.markers
    }

    pub fn images(&self) -> &ImageResolverRegistry {
        &self.images
    }

    /// Tools resolved for this instance, in configured order
    pub fn tools(&self) -> &ToolSet {
        self.instance.tools()
    }

    /// Trigger asset initialization for every tool of the instance
    pub fn load_tools(&self) -> Result<(), EditorError> {
        self.instance.tools().load()?;
        Ok(())
    }

    /// Format-specific options passed to the client next to the payload
    pub fn custom_options(&self) -> OptionsMap {
        self.format.custom_options()
    }

    /// Settings page of this editor for `instance_id`, if the format has one
    pub fn instance_setting_uri(&self, instance_id: &str) -> Option<String> {
        self.format.instance_setting_uri(instance_id)
    }
}
