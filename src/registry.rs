//! # Transform Registry Module
//!
//! Maps media type identifiers to transform functions with two-tier
//! resolution: exact matches first, then suffix-family patterns. A family
//! registration for `json` covers every media type whose subtype ends in
//! `/json` or `+json`, which is what makes vendor subtypes such as
//! `application/vnd.api+json` resolve to the JSON transform.
//!
//! The registry is assembled once through [`RegistryBuilder`] and frozen;
//! after `build()` there is no mutation, so a single instance can be shared
//! across worker tasks without synchronization. A failed lookup is not an
//! error — it is the signal for the pipeline's verbatim-copy fallback.

use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::sync::Arc;

/// A transform receives the resolved media type plus output and input
/// streams, and writes the transformed bytes to the output.
pub type TransformFn =
    Arc<dyn Fn(&str, &mut dyn Write, &mut dyn BufRead) -> anyhow::Result<()> + Send + Sync>;

/// Read-only mapping from media type to transform function
pub struct TransformRegistry {
    exact: HashMap<String, TransformFn>,
    families: Vec<(String, TransformFn)>,
}

impl TransformRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Resolve a media type to its transform, exact matches first.
    pub fn resolve(&self, media_type: &str) -> Option<&TransformFn> {
        if let Some(transform) = self.exact.get(media_type) {
            return Some(transform);
        }
        self.families
            .iter()
            .find(|(family, _)| {
                media_type.ends_with(&format!("/{}", family))
                    || media_type.ends_with(&format!("+{}", family))
            })
            .map(|(_, transform)| transform)
    }
}

/// Accumulates registrations before the registry is frozen
#[derive(Default)]
pub struct RegistryBuilder {
    exact: HashMap<String, TransformFn>,
    families: Vec<(String, TransformFn)>,
}

impl RegistryBuilder {
    /// Register a transform for one exact media type.
    pub fn add_exact(
        mut self,
        media_type: &str,
        transform: impl Fn(&str, &mut dyn Write, &mut dyn BufRead) -> anyhow::Result<()>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.exact.insert(media_type.to_string(), Arc::new(transform));
        self
    }

    /// Register a transform for a whole subtype family (`json` matches
    /// `*/json` and `*+json`). Families are checked in registration order.
    pub fn add_family(
        mut self,
        family: &str,
        transform: impl Fn(&str, &mut dyn Write, &mut dyn BufRead) -> anyhow::Result<()>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.families.push((family.to_string(), Arc::new(transform)));
        self
    }

    pub fn build(self) -> TransformRegistry {
        TransformRegistry {
            exact: self.exact,
            families: self.families,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagging_transform(tag: &'static str) -> impl Fn(&str, &mut dyn Write, &mut dyn BufRead) -> anyhow::Result<()>
           + Send
           + Sync
           + 'static {
        move |_media_type, out, _input| {
            out.write_all(tag.as_bytes())?;
            Ok(())
        }
    }

    fn apply(transform: &TransformFn, media_type: &str) -> String {
        let mut out = Vec::new();
        let mut input = std::io::Cursor::new(Vec::new());
        transform(media_type, &mut out, &mut input).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_exact_resolution() {
        let registry = TransformRegistry::builder()
            .add_exact("text/css", tagging_transform("css"))
            .build();

        let transform = registry.resolve("text/css").unwrap();
        assert_eq!(apply(transform, "text/css"), "css");
        assert!(registry.resolve("text/html").is_none());
    }

    #[test]
    fn test_family_matches_vendor_subtypes() {
        let registry = TransformRegistry::builder()
            .add_family("json", tagging_transform("json"))
            .build();

        for media_type in ["application/json", "application/vnd.api+json", "text/json"] {
            let transform = registry.resolve(media_type).unwrap();
            assert_eq!(apply(transform, media_type), "json");
        }
        assert!(registry.resolve("application/jsonp").is_none());
    }

    #[test]
    fn test_exact_takes_precedence_over_family() {
        let registry = TransformRegistry::builder()
            .add_exact("application/json", tagging_transform("exact"))
            .add_family("json", tagging_transform("family"))
            .build();

        let transform = registry.resolve("application/json").unwrap();
        assert_eq!(apply(transform, "application/json"), "exact");

        let transform = registry.resolve("application/vnd.api+json").unwrap();
        assert_eq!(apply(transform, "application/vnd.api+json"), "family");
    }

    #[test]
    fn test_unregistered_type_resolves_to_none() {
        let registry = TransformRegistry::builder().build();
        assert!(registry.resolve("application/octet-stream").is_none());
        assert!(registry.resolve("").is_none());
    }
}
