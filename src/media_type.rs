//! # Media Type Classification Module
//!
//! Maps file extensions to the media type identifiers the transform registry
//! is keyed by.
//!
//! ## Supported extensions:
//! - `.css` → `text/css`
//! - `.html` → `text/html`
//! - `.js` → `application/javascript`
//! - `.json` → `application/json`
//! - `.svg` → `image/svg+xml`
//! - `.xml` → `text/xml`
//!
//! The table is a process-wide constant, never mutated after startup, so it
//! is safe to consult from any number of worker tasks concurrently. An
//! unknown or missing extension is a valid, non-exceptional result: the
//! pipeline treats it as "no media type" and falls back to a verbatim copy.

use std::path::Path;

/// Extension (without dot, lowercase) to media type. Keys are unique.
pub const EXT_MEDIA_TYPES: &[(&str, &str)] = &[
    ("css", "text/css"),
    ("html", "text/html"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("svg", "image/svg+xml"),
    ("xml", "text/xml"),
];

/// Classify a path by its extension, case-insensitively.
///
/// Returns `None` when the extension is absent or not one of the six
/// supported ones.
pub fn classify(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?;
    let ext_lower = ext.to_string_lossy().to_lowercase();
    lookup(&ext_lower)
}

/// Resolve an extension token as given on the command line (`css` or
/// `.css`, any case) to a media type.
pub fn from_token(token: &str) -> Option<&'static str> {
    let token = token.strip_prefix('.').unwrap_or(token);
    lookup(&token.to_lowercase())
}

/// True if the (lowercase, dotless) extension belongs to a supported type.
pub fn known_extension(ext: &str) -> bool {
    lookup(ext).is_some()
}

fn lookup(ext: &str) -> Option<&'static str> {
    EXT_MEDIA_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, media_type)| *media_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_classify_known_extensions() {
        assert_eq!(classify(Path::new("style.css")), Some("text/css"));
        assert_eq!(classify(Path::new("index.html")), Some("text/html"));
        assert_eq!(classify(Path::new("app.js")), Some("application/javascript"));
        assert_eq!(classify(Path::new("data.json")), Some("application/json"));
        assert_eq!(classify(Path::new("logo.svg")), Some("image/svg+xml"));
        assert_eq!(classify(Path::new("feed.xml")), Some("text/xml"));
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify(Path::new("STYLE.CSS")), Some("text/css"));
        assert_eq!(classify(Path::new("page.Html")), Some("text/html"));
    }

    #[test]
    fn test_classify_unknown_or_missing_extension() {
        assert_eq!(classify(Path::new("archive.tar")), None);
        assert_eq!(classify(Path::new("README")), None);
        assert_eq!(classify(Path::new("noext.")), None);
    }

    #[test]
    fn test_from_token_accepts_bare_and_dotted() {
        assert_eq!(from_token("css"), Some("text/css"));
        assert_eq!(from_token(".json"), Some("application/json"));
        assert_eq!(from_token("JS"), Some("application/javascript"));
        assert_eq!(from_token("png"), None);
    }

    #[test]
    fn test_table_keys_are_unique() {
        for (i, (ext, _)) in EXT_MEDIA_TYPES.iter().enumerate() {
            assert!(
                !EXT_MEDIA_TYPES.iter().skip(i + 1).any(|(e, _)| e == ext),
                "duplicate extension key: {}",
                ext
            );
        }
    }
}
