//! # Output Naming Module
//!
//! Derives the on-disk output path for a minified file: `style.css` becomes
//! `style.min.css`, a path without any dot gets `.min` appended. The marker
//! doubles as the "already minified" tag the enumerator uses to keep batch
//! runs from reprocessing their own output.

use std::path::{Path, PathBuf};

/// Substring that tags a file as already minified.
pub const MIN_MARKER: &str = ".min.";

/// Insert `.min` before the final extension of `path`.
///
/// The scan is over the last `.` in the whole path; paths without one get
/// `.min` appended. Pure and total for any non-empty path.
pub fn derive_output_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match raw.rfind('.') {
        Some(dot) => PathBuf::from(format!("{}.min{}", &raw[..dot], &raw[dot..])),
        None => PathBuf::from(format!("{}.min", raw)),
    }
}

/// True if the file name carries the minified marker.
pub fn is_minified_name(file_name: &str) -> bool {
    file_name.contains(MIN_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_marker_inserted_before_extension() {
        assert_eq!(
            derive_output_path(Path::new("assets/style.css")),
            PathBuf::from("assets/style.min.css")
        );
        assert_eq!(
            derive_output_path(Path::new("page.html")),
            PathBuf::from("page.min.html")
        );
    }

    #[test]
    fn test_no_dot_appends_marker() {
        assert_eq!(derive_output_path(Path::new("Makefile")), PathBuf::from("Makefile.min"));
    }

    #[test]
    fn test_bare_extension_boundary() {
        // Empty stem: the marker still goes before the final dot.
        assert_eq!(derive_output_path(Path::new(".css")), PathBuf::from(".min.css"));
    }

    #[test]
    fn test_multiple_dots_use_last() {
        assert_eq!(
            derive_output_path(Path::new("jquery.slim.js")),
            PathBuf::from("jquery.slim.min.js")
        );
    }

    #[test]
    fn test_derived_names_carry_marker() {
        for input in ["a.css", "b.html", "deep/dir/c.json", "d.svg"] {
            let out = derive_output_path(Path::new(input));
            let name = out.file_name().unwrap().to_string_lossy().into_owned();
            assert!(is_minified_name(&name), "{} should carry marker", name);
        }
    }
}
