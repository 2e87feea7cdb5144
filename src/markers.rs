//! Naming conventions shared by the compiler and the client editor

use serde::{Deserialize, Serialize};

/// Input field names and marker class/attribute names.
///
/// Each field can be overridden independently; unset fields in a TOML
/// `[markers]` table keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerNames {
    pub file_input: String,
    pub tag_input: String,
    pub mention_input: String,
    pub image_class: String,
    pub tag_class: String,
    pub mention_class: String,
    pub image_identifier: String,
    pub mention_identifier: String,
}

impl Default for MarkerNames {
    fn default() -> Self {
        Self {
            file_input: "_files".to_string(),
            tag_input: "_tags".to_string(),
            mention_input: "_mentions".to_string(),
            image_class: "__xe_image".to_string(),
            tag_class: "__xe_hashtag".to_string(),
            mention_class: "__xe_mention".to_string(),
            image_identifier: "data-id".to_string(),
            mention_identifier: "data-id".to_string(),
        }
    }
}

impl MarkerNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hashtag marker class
    pub fn with_tag_class(mut self, class: impl Into<String>) -> Self {
        self.tag_class = class.into();
        self
    }

    /// Set the mention marker class
    pub fn with_mention_class(mut self, class: impl Into<String>) -> Self {
        self.mention_class = class.into();
        self
    }

    /// Set the image marker class
    pub fn with_image_class(mut self, class: impl Into<String>) -> Self {
        self.image_class = class.into();
        self
    }

    pub fn hashtag_selector(&self) -> String {
        format!(".{}", self.tag_class)
    }

    pub fn mention_selector(&self) -> String {
        format!(".{}[{}]", self.mention_class, self.mention_identifier)
    }

    pub fn image_selector(&self) -> String {
        format!("img.{}[{}]", self.image_class, self.image_identifier)
    }
}
