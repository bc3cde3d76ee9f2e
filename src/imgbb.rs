//! Image hosting via imgbb.
//!
//! Notion's API cannot take file uploads for external image blocks, so local
//! images are pushed to imgbb first and referenced by the returned URL.

use crate::config::UploadConfig;
use crate::error::{BlockError, Md2NotionError};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Turns a local image file into a publicly reachable URL.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload the file at `path` (known to exist) and return its hosted URL.
    async fn upload(&self, path: &Path) -> Result<String, BlockError>;
}

/// `POST https://api.imgbb.com/1/upload` with a multipart form.
pub struct ImgbbUploader {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    data: UploadData,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    url: String,
}

impl ImgbbUploader {
    pub fn new(api_key: &str, config: &UploadConfig) -> Result<Self, Md2NotionError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Md2NotionError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            url: config.imgbb_url.clone(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl ImageHost for ImgbbUploader {
    async fn upload(&self, path: &Path) -> Result<String, BlockError> {
        let failed = |detail: String| BlockError::ImageUploadFailed {
            path: path.to_path_buf(),
            detail,
        };

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| failed(format!("read failed: {e}")))?;
        debug!("Uploading {} ({} bytes)", path.display(), bytes.len());

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        let form = Form::new()
            .text("key", self.api_key.clone())
            .part("image", Part::bytes(bytes).file_name(file_name));

        let response = self
            .http
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| failed(e.to_string()))?;
        if !status.is_success() {
            return Err(failed(format!("HTTP {status}: {body}")));
        }

        let parsed: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| failed(format!("unexpected response ({e}): {body}")))?;
        Ok(parsed.data.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_url_is_read_from_data() {
        let body = r#"{"data":{"id":"abc","url":"https://i.ibb.co/abc/cat.png"},"success":true,"status":200}"#;
        let parsed: UploadResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.url, "https://i.ibb.co/abc/cat.png");
    }

    #[tokio::test]
    async fn unreadable_file_is_a_block_error() {
        let config = UploadConfig::builder("abc")
            .imgbb_url("http://127.0.0.1:9/upload")
            .build()
            .unwrap();
        let uploader = ImgbbUploader::new("key", &config).unwrap();
        let err = uploader
            .upload(Path::new("/definitely/not/here.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, BlockError::ImageUploadFailed { .. }));
    }
}
