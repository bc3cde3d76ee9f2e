//! Error types for the notion-md library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Md2NotionError`] — **Fatal**: the run cannot proceed at all
//!   (missing credential, unreadable Markdown file, missing image under the
//!   `Abort` policy, provider not configured). Returned as
//!   `Err(Md2NotionError)` from the top-level entry points.
//!
//! * [`BlockError`] — **Non-fatal**: a single block or image failed (rejected
//!   by Notion, transport error, imgbb upload failure). The parser logs it,
//!   counts it in [`crate::output::UploadStats`], and moves on to the next
//!   line.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the notion-md library.
#[derive(Debug, Error)]
pub enum Md2NotionError {
    // ── Startup errors ────────────────────────────────────────────────────
    /// A required credential is unset or blank.
    #[error("Environment variable {var} is not set or is empty.\nSet it and try again: export {var}=...")]
    MissingCredential { var: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Markdown file was not found at the given path.
    #[error("Markdown file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Markdown file exists but could not be read as UTF-8 text.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A local image referenced by the Markdown does not exist, neither as
    /// given nor relative to the Markdown file's directory.
    #[error("Image file not found: '{path}' (referenced on line {line})")]
    MissingImage { path: PathBuf, line: usize },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider could not be initialised.
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The LLM API returned an error.
    #[error("LLM API error: {message}")]
    LlmApiError { message: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for one block or image.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum BlockError {
    /// The document service answered with a non-success status.
    #[error("Failed to add block: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The request never got a response (DNS, TLS, timeout, ...).
    #[error("Request failed: {0}")]
    Transport(String),

    /// The image host did not return a usable URL.
    #[error("Image upload failed for '{path}': {detail}")]
    ImageUploadFailed { path: PathBuf, detail: String },
}

impl From<reqwest::Error> for BlockError {
    fn from(e: reqwest::Error) -> Self {
        BlockError::Transport(e.to_string())
    }
}
