//! Notion block append client.
//!
//! [`BlockSink`] is the seam the parser talks to; [`NotionClient`] is the
//! real implementation. Each call appends exactly one block as the newest
//! child of the configured page. There is no batching and no retry: a
//! failure is returned to the caller, which logs it and moves on.

use crate::blocks::{children_payload, Block};
use crate::config::UploadConfig;
use crate::error::{BlockError, Md2NotionError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Destination for blocks produced by the parser.
#[async_trait]
pub trait BlockSink: Send + Sync {
    /// Append one block. `Ok(())` means the service accepted it.
    async fn append(&self, block: &Block) -> Result<(), BlockError>;
}

/// `PATCH /v1/blocks/{page_id}/children`, one block per request.
pub struct NotionClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
    notion_version: String,
}

impl NotionClient {
    pub fn new(api_key: &str, config: &UploadConfig) -> Result<Self, Md2NotionError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Md2NotionError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            url: config.children_url(),
            api_key: api_key.to_string(),
            notion_version: config.notion_version.clone(),
        })
    }

    /// The children-collection URL every block is sent to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl BlockSink for NotionClient {
    async fn append(&self, block: &Block) -> Result<(), BlockError> {
        let response = self
            .http
            .patch(&self.url)
            .bearer_auth(&self.api_key)
            .header("Notion-Version", self.notion_version.as_str())
            .json(&children_payload(block))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!("Appended {} block", block.kind());
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(BlockError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_targets_page_children() {
        let config = UploadConfig::builder("0123456789abcdef0123456789abcdef")
            .notion_base_url("http://localhost:1")
            .build()
            .unwrap();
        let client = NotionClient::new("secret", &config).unwrap();
        assert_eq!(
            client.url(),
            "http://localhost:1/v1/blocks/01234567-89ab-cdef-0123-456789abcdef/children"
        );
    }
}
