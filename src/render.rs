//! Editor markup for the page: content input plus activation script

use serde::Serialize;

use crate::instance::ResolvedArguments;
use crate::markup::entity::escape;
use crate::{Editor, EditorError};

impl Editor {
    /// Load the instance's tools and, unless the instance is script-only,
    /// produce the content input and the activation script.
    ///
    /// Tool assets are initialized on every call.
    pub fn render(&self) -> Result<String, EditorError> {
        self.load_tools()?;

        if self.instance.is_script_only() {
            return Ok(String::new());
        }

        let args = self.instance.arguments();
        let mut html = content_html(&args);
        html.push_str(&self.editor_script(&args.content_dom_id)?);
        Ok(html)
    }

    fn editor_script(&self, dom_id: &str) -> Result<String, EditorError> {
        let options = self.options()?;
        let custom = self.custom_options();
        let tools = self.instance.tools().descriptors();

        Ok(format!(
            "<script>\n    $(function() {{\n        XEeditor.getEditor({}).create({}, {}, {}, {});\n    }});\n</script>",
            script_json(self.format.name())?,
            script_json(dom_id)?,
            script_json(&options)?,
            script_json(&custom)?,
            script_json(&tools)?,
        ))
    }
}

fn content_html(args: &ResolvedArguments) -> String {
    let mut html = format!(
        r#"<textarea name="{}" id="{}""#,
        escape(&args.content_dom_name),
        escape(&args.content_dom_id)
    );
    for (key, value) in &args.content_dom_options {
        html.push_str(&format!(r#" {}="{}""#, escape(key), escape(value)));
    }
    html.push_str(&format!(
        r#" placeholder="{}">{}</textarea>"#,
        escape(&args.placeholder),
        escape(&args.content)
    ));
    html
}

/// JSON for embedding inside a `<script>` element
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, EditorError> {
    let json = serde_json::to_string(value)?;
    Ok(json.replace("</", "<\\/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::EditorArguments;
    use std::collections::BTreeMap;

    #[test]
    fn test_unencodable_value_is_serialization_error() {
        let value: BTreeMap<(u8, u8), u8> = BTreeMap::from([((1, 2), 3)]);
        let err = script_json(&value).unwrap_err();
        assert!(matches!(err, EditorError::Serialization(_)));
    }

    #[test]
    fn test_default_content_html() {
        let html = content_html(&EditorArguments::default().resolve());
        assert_eq!(
            html,
            r#"<textarea name="content" id="xeContentEditor" class="form-control" rows="20" cols="80" placeholder="Content"></textarea>"#
        );
    }

    #[test]
    fn test_content_is_escaped() {
        let args = EditorArguments {
            content: Some("</textarea><b>".to_string()),
            ..Default::default()
        };
        let html = content_html(&args.resolve());
        assert!(html.ends_with("&lt;/textarea&gt;&lt;b&gt;</textarea>"));
    }

    #[test]
    fn test_script_json_escapes_closing_tags() {
        assert_eq!(script_json("</script>").unwrap(), r#""<\/script>""#);
    }
}
