//! Options payload consumed by the client editor runtime

use serde_json::{json, Map, Value};

use crate::collaborators::PermissionScope;
use crate::{Editor, EditorError};

pub type OptionsMap = Map<String, Value>;

/// Keys owned by the base payload; pass-through and format options never replace them
const BASE_KEYS: &[&str] = &[
    "fileUpload",
    "suggestion",
    "names",
    "perms",
    "files",
    "fontFamily",
    "extensions",
];

const FILE_ROUTES: &[(&str, &str)] = &[
    ("upload_url", "editor.file.upload"),
    ("source_url", "editor.file.source"),
    ("download_url", "editor.file.download"),
    ("destroy_url", "editor.file.destroy"),
];

const ABILITIES: &[&str] = &["html", "tool", "upload"];

impl Editor {
    /// Build the options payload for the client editor.
    ///
    /// The base keys are always present. Instance config entries and the
    /// format's extra options are merged on top but cannot replace them.
    pub fn options(&self) -> Result<OptionsMap, EditorError> {
        let mut options = OptionsMap::new();

        let mut file_upload = OptionsMap::new();
        for (key, route) in FILE_ROUTES {
            file_upload.insert(key.to_string(), Value::String(self.urls.route(route)?));
        }
        options.insert("fileUpload".to_string(), Value::Object(file_upload));

        options.insert(
            "suggestion".to_string(),
            json!({
                "hashtag_api": self.urls.route("editor.hashTag")?,
                "mention_api": self.urls.route("editor.mention")?,
            }),
        );

        let names = &self.markers;
        options.insert(
            "names".to_string(),
            json!({
                "file": {
                    "input": names.file_input,
                    "image": {
                        "class": names.image_class,
                        "identifier": names.image_identifier,
                    },
                },
                "tag": {
                    "input": names.tag_input,
                    "class": names.tag_class,
                },
                "mention": {
                    "input": names.mention_input,
                    "class": names.mention_class,
                    "identifier": names.mention_identifier,
                },
            }),
        );

        let config = self.instance.config();
        options.insert(
            "fontFamily".to_string(),
            Value::Array(list_setting(config.and_then(|c| c.get("fontFamily")))),
        );
        options.insert(
            "extensions".to_string(),
            Value::Array(list_setting(config.and_then(|c| c.get("extensions")))),
        );

        let scope = PermissionScope::for_instance(self.instance.instance_id());
        let mut perms = OptionsMap::new();
        for ability in ABILITIES {
            let allowed = self.gate.allows(ability, &scope)?;
            perms.insert(ability.to_string(), Value::Bool(allowed));
        }
        options.insert("perms".to_string(), Value::Object(perms));

        options.insert(
            "files".to_string(),
            serde_json::to_value(self.instance.files())?,
        );

        if let Some(config) = config {
            let passthrough = config
                .iter()
                .filter(|(key, _)| key.as_str() != "tools")
                .map(|(key, value)| (key.clone(), value.clone()));
            merge_protected(&mut options, passthrough, "instance config");
        }

        let extra = self.format.format_options(&self.instance);
        merge_protected(&mut options, extra, self.format.name());

        Ok(options)
    }
}

/// Normalize a comma-separated setting into a list of trimmed entries
fn list_setting(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::String(s)) => s
            .split(',')
            .map(|item| Value::String(item.trim().to_string()))
            .collect(),
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

fn merge_protected(
    options: &mut OptionsMap,
    entries: impl IntoIterator<Item = (String, Value)>,
    origin: &str,
) {
    for (key, value) in entries {
        if BASE_KEYS.contains(&key.as_str()) {
            tracing::warn!(key = %key, origin, "option key is reserved; keeping base value");
            continue;
        }
        options.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_list_setting_splits_and_trims() {
        let value = json!("Arial, Helvetica ,serif");
        assert_eq!(
            list_setting(Some(&value)),
            vec![json!("Arial"), json!("Helvetica"), json!("serif")]
        );
    }

    #[test]
    fn test_list_setting_missing_or_odd() {
        assert!(list_setting(None).is_empty());
        assert!(list_setting(Some(&json!(12))).is_empty());
        assert_eq!(list_setting(Some(&json!(["a"]))), vec![json!("a")]);
    }

    #[test]
    fn test_merge_skips_base_keys() {
        let mut options = OptionsMap::new();
        options.insert("perms".to_string(), json!({"html": false}));
        merge_protected(
            &mut options,
            vec![
                ("perms".to_string(), json!("overridden")),
                ("height".to_string(), json!(400)),
            ],
            "test",
        );
        assert_eq!(options["perms"], json!({"html": false}));
        assert_eq!(options["height"], json!(400));
    }
}
