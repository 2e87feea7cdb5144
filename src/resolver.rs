//! Batched image identifier to URL resolution

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::collaborators::CollaboratorError;
use crate::EditorError;

/// A resolved image reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedImage {
    /// The identifier the image was requested with
    pub origin_key: String,
    pub url: String,
}

impl ResolvedImage {
    pub fn new(origin_key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            origin_key: origin_key.into(),
            url: url.into(),
        }
    }
}

/// Resolves a batch of image identifiers in a single call
pub trait ImageResolver: Send + Sync {
    fn resolve(&self, ids: &[String]) -> Result<Vec<ResolvedImage>, CollaboratorError>;
}

impl<F> ImageResolver for F
where
    F: Fn(&[String]) -> Result<Vec<ResolvedImage>, CollaboratorError> + Send + Sync,
{
    fn resolve(&self, ids: &[String]) -> Result<Vec<ResolvedImage>, CollaboratorError> {
        self(ids)
    }
}

/// Holds the image resolver for an editor.
///
/// The resolver is registered once; a second registration is rejected.
/// Nothing is cached between calls.
#[derive(Clone, Default)]
pub struct ImageResolverRegistry {
    resolver: Option<Arc<dyn ImageResolver>>,
}

impl fmt::Debug for ImageResolverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageResolverRegistry")
            .field("registered", &self.is_registered())
            .finish()
    }
}

impl ImageResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with a resolver already registered
    pub fn with_resolver(resolver: impl ImageResolver + 'static) -> Self {
        Self {
            resolver: Some(Arc::new(resolver)),
        }
    }

    pub fn register(&mut self, resolver: impl ImageResolver + 'static) -> Result<(), EditorError> {
        self.register_shared(Arc::new(resolver))
    }

    pub fn register_shared(&mut self, resolver: Arc<dyn ImageResolver>) -> Result<(), EditorError> {
        if self.resolver.is_some() {
            return Err(EditorError::configuration(
                "an image resolver is already registered",
            ));
        }
        self.resolver = Some(resolver);
        Ok(())
    }

    pub fn is_registered(&self) -> bool {
        self.resolver.is_some()
    }

    /// Resolve `ids` with one call to the registered resolver.
    ///
    /// Duplicates are removed before the call, keeping first-seen order.
    pub fn resolve(&self, ids: &[String]) -> Result<Vec<ResolvedImage>, EditorError> {
        let resolver = self
            .resolver
            .as_ref()
            .ok_or_else(|| EditorError::configuration("no image resolver is registered"))?;

        let unique = dedup_first_seen(ids);
        tracing::debug!(count = unique.len(), "resolving image identifiers");
        Ok(resolver.resolve(&unique)?)
    }
}

/// Remove duplicates, keeping the first occurrence of each id
pub fn dedup_first_seen(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}
