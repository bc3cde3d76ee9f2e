//! Image reference resolution.
//!
//! Markdown image targets are either remote URLs (used as-is) or local
//! paths. Local paths are tried as given first, i.e. relative to the
//! working directory, then relative to the directory holding the Markdown
//! file, which is where editors usually put them.

use std::path::{Path, PathBuf};
use tracing::debug;

/// Where an image reference points after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Already hosted; no upload needed.
    Remote(String),
    /// An existing local file that must be uploaded first.
    Local(PathBuf),
    /// Neither candidate path exists. Holds the last path tried.
    Missing(PathBuf),
}

/// Check if the target looks like a URL.
pub fn is_url(target: &str) -> bool {
    target.starts_with("http")
}

/// Resolve `target` as referenced from the Markdown file at `markdown_path`.
pub fn resolve_image(target: &str, markdown_path: &Path) -> ImageSource {
    if is_url(target) {
        return ImageSource::Remote(target.to_string());
    }

    let as_given = PathBuf::from(target);
    if as_given.exists() {
        debug!("Resolved image as given: {}", as_given.display());
        return ImageSource::Local(as_given);
    }

    let base = markdown_path.parent().unwrap_or_else(|| Path::new(""));
    let relative = base.join(target);
    if relative.exists() {
        debug!("Resolved image next to Markdown: {}", relative.display());
        ImageSource::Local(relative)
    } else {
        ImageSource::Missing(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/a.png"));
        assert!(is_url("http://example.com/a.png"));
        assert!(!is_url("./a.png"));
        assert!(!is_url("/tmp/a.png"));
        assert!(!is_url(""));
    }

    #[test]
    fn remote_targets_pass_through() {
        assert_eq!(
            resolve_image("https://i.ibb.co/x.png", Path::new("doc.md")),
            ImageSource::Remote("https://i.ibb.co/x.png".into())
        );
    }

    #[test]
    fn falls_back_to_markdown_directory() {
        let dir = tempfile::tempdir().unwrap();
        let md = dir.path().join("notes.md");
        std::fs::write(dir.path().join("fig-only-in-tempdir.png"), b"png").unwrap();

        assert_eq!(
            resolve_image("fig-only-in-tempdir.png", &md),
            ImageSource::Local(dir.path().join("fig-only-in-tempdir.png"))
        );
    }

    #[test]
    fn absolute_existing_path_is_used_as_given() {
        let dir = tempfile::tempdir().unwrap();
        let img = dir.path().join("abs.png");
        std::fs::write(&img, b"png").unwrap();

        assert_eq!(
            resolve_image(img.to_str().unwrap(), Path::new("elsewhere/doc.md")),
            ImageSource::Local(img)
        );
    }

    #[test]
    fn missing_reports_directory_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        let md = dir.path().join("notes.md");
        assert_eq!(
            resolve_image("nope.png", &md),
            ImageSource::Missing(dir.path().join("nope.png"))
        );
    }
}
