//! # notion-md
//!
//! Push Markdown files into Notion pages, and ask an LLM a quick question
//! from the terminal.
//!
//! ## Upload Pipeline
//!
//! ```text
//! Markdown file
//!  │
//!  ├─ 1. Read     one pass, line by line, whitespace trimmed
//!  ├─ 2. Classify heading / $$ delimiter / equation body / image / paragraph
//!  ├─ 3. Build    Block + RichSpans (bold, inline math, plain)
//!  ├─ 4. Images   local files → imgbb → hosted URL
//!  └─ 5. Submit   PATCH /v1/blocks/{page}/children, one block per call
//! ```
//!
//! Every block is sent as soon as it is built. A rejected block is logged
//! and the walk continues; only a missing Markdown file, a missing image
//! under [`MissingImagePolicy::Abort`], or a startup problem is fatal.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use notion_md::{upload_markdown, Credentials, UploadConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // NOTION_API_KEY and IMGBB_API_KEY
//!     let credentials = Credentials::from_env()?;
//!     let config = UploadConfig::builder("0123456789abcdef0123456789abcdef").build()?;
//!     let stats = upload_markdown("notes.md", &config, &credentials).await?;
//!     eprintln!("{} blocks, {} failed", stats.blocks_submitted, stats.blocks_failed);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `md2notion` and `ai` binaries (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod blocks;
pub mod chat;
pub mod config;
pub mod error;
pub mod imgbb;
pub mod notion;
pub mod output;
pub mod page_id;
pub mod parser;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod terminal;
pub mod upload;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use blocks::{Block, HeadingLevel, RichSpan};
pub use chat::{ask, ask_with, ChatReply};
pub use config::{
    check_chat_credentials, ChatConfig, ChatConfigBuilder, Credentials, MissingImagePolicy,
    UnterminatedEquationPolicy, UploadConfig, UploadConfigBuilder,
};
pub use error::{BlockError, Md2NotionError};
pub use imgbb::{ImageHost, ImgbbUploader};
pub use notion::{BlockSink, NotionClient};
pub use output::UploadStats;
pub use page_id::PageId;
pub use parser::MarkdownParser;
pub use progress::{NoopProgressCallback, ProgressCallback, UploadProgressCallback};
pub use upload::{upload_markdown, upload_markdown_sync};
