//! Content formats: the format-specific half of compilation
//!
//! The compiler runs the shared entity stages and hands the result to a
//! [`ContentFormat`] for the body step. Formats are interchangeable values,
//! not subclasses of the compiler.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::collaborators::CollaboratorError;
use crate::instance::EditorInstance;
use crate::markers::MarkerNames;
use crate::markup::Document;
use crate::EditorError;

pub trait ContentFormat: Send + Sync {
    /// Name the client runtime knows this editor by
    fn name(&self) -> &str;

    /// Turn stage-processed markup into displayable HTML
    fn compile_body(&self, content: &str) -> Result<String, CollaboratorError>;

    /// Link rewriting stage; leaves the document untouched by default
    fn rewrite_links(&self, _doc: &mut Document<'_>) -> Result<(), EditorError> {
        Ok(())
    }

    fn marker_names(&self) -> MarkerNames {
        MarkerNames::default()
    }

    /// Extra entries for the options payload; base keys cannot be replaced
    fn format_options(&self, _instance: &EditorInstance) -> Map<String, Value> {
        Map::new()
    }

    /// Options passed to the client editor separately from the payload
    fn custom_options(&self) -> Map<String, Value> {
        Map::new()
    }

    /// Location of a per-instance settings page, if the format has one
    fn instance_setting_uri(&self, _instance_id: &str) -> Option<String> {
        None
    }
}

/// Rich text: the processed markup is already displayable
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFormat;

impl HtmlFormat {
    pub const NAME: &'static str = "html";
}

impl ContentFormat for HtmlFormat {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn compile_body(&self, content: &str) -> Result<String, CollaboratorError> {
        Ok(content.to_string())
    }
}

/// Plain textarea content: line breaks become `<br />`
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextFormat;

impl PlainTextFormat {
    pub const NAME: &'static str = "textarea";
}

impl ContentFormat for PlainTextFormat {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn compile_body(&self, content: &str) -> Result<String, CollaboratorError> {
        Ok(nl2br(content))
    }
}

/// Insert `<br />` before every line break, keeping the break itself
fn nl2br(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                out.push_str("<br />\r\n");
            }
            '\r' | '\n' => {
                out.push_str("<br />");
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Look up a built-in format by name
pub fn builtin_format(name: &str) -> Option<Arc<dyn ContentFormat>> {
    match name {
        HtmlFormat::NAME => Some(Arc::new(HtmlFormat)),
        PlainTextFormat::NAME | "text" => Some(Arc::new(PlainTextFormat)),
        _ => None,
    }
}
