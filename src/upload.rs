//! Upload entry points.
//!
//! These wire the real HTTP collaborators ([`NotionClient`],
//! [`ImgbbUploader`]) to a [`MarkdownParser`] and run it over one file.
//! Use [`MarkdownParser`] directly to plug in other sinks or image hosts.

use crate::config::{Credentials, UploadConfig};
use crate::error::Md2NotionError;
use crate::imgbb::ImgbbUploader;
use crate::notion::NotionClient;
use crate::output::UploadStats;
use crate::parser::MarkdownParser;
use std::path::Path;
use tracing::info;

/// Upload the Markdown file at `path` to the page named in `config`.
///
/// # Returns
/// `Ok(UploadStats)` once every line has been processed, even if some
/// blocks were rejected (check `stats.blocks_failed`).
///
/// # Errors
/// Returns `Err(Md2NotionError)` only for fatal errors:
/// - Markdown file not found or unreadable
/// - A local image is missing and the policy is `Abort`
/// - HTTP client construction failed
pub async fn upload_markdown(
    path: impl AsRef<Path>,
    config: &UploadConfig,
    credentials: &Credentials,
) -> Result<UploadStats, Md2NotionError> {
    let path = path.as_ref();
    let notion = NotionClient::new(&credentials.notion_api_key, config)?;
    let imgbb = ImgbbUploader::new(&credentials.imgbb_api_key, config)?;
    info!("Target: {}", notion.url());

    MarkdownParser::new(&notion, &imgbb, config)
        .parse_file(path)
        .await
}

/// Synchronous wrapper around [`upload_markdown`].
///
/// Creates a temporary tokio runtime internally.
pub fn upload_markdown_sync(
    path: impl AsRef<Path>,
    config: &UploadConfig,
    credentials: &Credentials,
) -> Result<UploadStats, Md2NotionError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Md2NotionError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(upload_markdown(path, config, credentials))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_wrapper_reports_missing_file() {
        let config = UploadConfig::builder("abc")
            .notion_base_url("http://127.0.0.1:9")
            .imgbb_url("http://127.0.0.1:9/upload")
            .build()
            .unwrap();
        let creds = Credentials::new("n", "i");
        let err = upload_markdown_sync("/definitely/not/here.md", &config, &creds).unwrap_err();
        assert!(matches!(err, Md2NotionError::FileNotFound { .. }));
    }
}
