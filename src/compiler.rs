//! Content compilation pipeline
//!
//! The content is parsed once. Hashtag, mention, link and image stages then
//! rewrite matched nodes in place by identity, the document is serialized
//! once and handed to the content format. Rewritten nodes become opaque
//! fragments, so no stage ever sees markup produced by an earlier one.

use std::collections::HashMap;

use serde_json::json;

use crate::markup::entity::escape;
use crate::markup::{self, Document, Fragment};
use crate::resolver::ResolvedImage;
use crate::selector::{parse_selector, SelectorList};
use crate::{Editor, EditorError};

/// View rendered after the body when files are attached
pub const FILES_VIEW: &str = "files";

impl Editor {
    /// Compile raw editor content into displayable HTML.
    ///
    /// Any failure aborts the whole call; there is no partial output.
    pub fn compile(&self, content: &str) -> Result<String, EditorError> {
        let mut doc = markup::parse(content);

        self.rewrite_hashtags(&mut doc)?;
        self.rewrite_mentions(&mut doc)?;
        self.format.rewrite_links(&mut doc)?;
        self.rewrite_images(&mut doc)?;

        let mut output = self.format.compile_body(&doc.to_html())?;
        output.push_str(&self.file_view()?);
        Ok(output)
    }

    fn rewrite_hashtags(&self, doc: &mut Document<'_>) -> Result<(), EditorError> {
        let selector = marker_selector(self.markers.hashtag_selector())?;
        let class = escape(&self.markers.tag_class);

        let matches = doc.entities(&selector, &[]);
        tracing::debug!(count = matches.len(), "hashtag stage");
        for (id, entity) in matches {
            let word = entity.text.strip_prefix('#').unwrap_or(&entity.text);
            let html = format!(
                r##"<a href="#{word}" class="{class}">#{word}</a>"##,
                word = escape(word),
                class = class,
            );
            doc.replace(id, Fragment::new(html, format!("#{}", word)));
        }
        Ok(())
    }

    fn rewrite_mentions(&self, doc: &mut Document<'_>) -> Result<(), EditorError> {
        let selector = marker_selector(self.markers.mention_selector())?;
        let identifier = self.markers.mention_identifier.as_str();
        let class = escape(&self.markers.mention_class);

        let matches = doc.entities(&selector, &[identifier]);
        tracing::debug!(count = matches.len(), "mention stage");
        for (id, entity) in matches {
            let name = entity.text.strip_prefix('@').unwrap_or(&entity.text);
            let user_id = entity.attribute(identifier).unwrap_or_default();
            let html = format!(
                r#"<span role="button" class="{}" data-toggle="xeUserMenu" data-user-id="{}">@{}</span>"#,
                class,
                escape(user_id),
                escape(name),
            );
            doc.replace(id, Fragment::new(html, format!("@{}", name)));
        }
        Ok(())
    }

    fn rewrite_images(&self, doc: &mut Document<'_>) -> Result<(), EditorError> {
        let selector = marker_selector(self.markers.image_selector())?;
        let identifier = self.markers.image_identifier.as_str();

        let matches = doc.entities(&selector, &[identifier]);
        tracing::debug!(count = matches.len(), "image stage");
        if matches.is_empty() {
            return Ok(());
        }

        let ids: Vec<String> = matches
            .iter()
            .map(|(_, entity)| entity.attribute(identifier).unwrap_or_default().to_string())
            .collect();
        let resolved: HashMap<String, ResolvedImage> = self
            .images
            .resolve(&ids)?
            .into_iter()
            .map(|image| (image.origin_key.clone(), image))
            .collect();

        // Look every id up before rewriting so a miss leaves nothing half done
        let mut rewrites = Vec::with_capacity(matches.len());
        for ((node, _), image_id) in matches.into_iter().zip(ids) {
            let image = resolved
                .get(&image_id)
                .ok_or_else(|| EditorError::ResolutionLookup {
                    id: image_id.clone(),
                })?;
            let html = format!(
                r#"<img src="{}" class="{}" data-id="{}" />"#,
                escape(&image.url),
                escape(&self.markers.image_class),
                escape(&image_id),
            );
            rewrites.push((node, html));
        }
        for (node, html) in rewrites {
            doc.replace(node, Fragment::new(html, ""));
        }
        Ok(())
    }

    /// Rendered file list, empty when nothing is attached
    fn file_view(&self) -> Result<String, EditorError> {
        let files = self.instance.files();
        if files.is_empty() {
            return Ok(String::new());
        }
        Ok(self.views.render(FILES_VIEW, &json!({ "files": files }))?)
    }
}

fn marker_selector(selector: String) -> Result<SelectorList, EditorError> {
    parse_selector(&selector).map_err(|source| EditorError::Selector { selector, source })
}
