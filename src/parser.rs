//! The Markdown walker: classify each line, build blocks, submit them.
//!
//! [`MarkdownParser`] owns no network code of its own. It drives a
//! [`BlockSink`] and an [`ImageHost`], so tests can run the whole state
//! machine against in-memory fakes.
//!
//! ## Failure handling
//!
//! | Failure                                  | Effect                               |
//! |------------------------------------------|--------------------------------------|
//! | Block rejected / transport error         | logged, counted, next line           |
//! | Image upload failed                      | logged, no image or caption block    |
//! | Local image missing, `Abort` policy      | run stops with `MissingImage`        |
//! | Local image missing, `Skip` policy       | logged, next line                    |
//! | `$$` still open at EOF                   | per [`UnterminatedEquationPolicy`]   |
//!
//! Blocks already submitted are never rolled back.

use crate::blocks::Block;
use crate::config::{MissingImagePolicy, UnterminatedEquationPolicy, UploadConfig};
use crate::error::{BlockError, Md2NotionError};
use crate::imgbb::ImageHost;
use crate::notion::BlockSink;
use crate::output::UploadStats;
use crate::pipeline::images::{resolve_image, ImageSource};
use crate::pipeline::lines::{classify_line, split_lines, EquationAccumulator, LineKind};
use crate::pipeline::spans::split_spans;
use crate::progress::UploadProgressCallback;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Line-oriented Markdown to Notion converter.
pub struct MarkdownParser<'a> {
    sink: &'a dyn BlockSink,
    images: &'a dyn ImageHost,
    config: &'a UploadConfig,
}

impl<'a> MarkdownParser<'a> {
    pub fn new(sink: &'a dyn BlockSink, images: &'a dyn ImageHost, config: &'a UploadConfig) -> Self {
        Self {
            sink,
            images,
            config,
        }
    }

    /// Read `path` and upload its content.
    pub async fn parse_file(&self, path: &Path) -> Result<UploadStats, Md2NotionError> {
        if !path.exists() {
            return Err(Md2NotionError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let markdown = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Md2NotionError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        self.parse_str(&markdown, path).await
    }

    /// Upload `markdown`. `source_path` anchors relative image references.
    pub async fn parse_str(
        &self,
        markdown: &str,
        source_path: &Path,
    ) -> Result<UploadStats, Md2NotionError> {
        let start = Instant::now();
        let lines = split_lines(markdown);
        let total = lines.len();
        info!("Uploading {} ({} lines)", source_path.display(), total);

        if let Some(cb) = self.callback() {
            cb.on_upload_start(total);
        }

        let mut stats = UploadStats {
            total_lines: total,
            ..Default::default()
        };
        let mut equation = EquationAccumulator::new();

        for (idx, raw) in lines.iter().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();

            match classify_line(line, equation.is_open()) {
                LineKind::Heading { level, text } => {
                    self.submit(Block::heading(level, text), line_no, &mut stats)
                        .await;
                }
                LineKind::EquationDelimiter => {
                    if let Some(expression) = equation.toggle(line_no) {
                        self.submit(Block::equation(expression), line_no, &mut stats)
                            .await;
                    }
                }
                LineKind::EquationBody(body) => equation.push(body),
                LineKind::Image { alt, target } => {
                    self.handle_image(alt, target, source_path, line_no, &mut stats)
                        .await?;
                }
                LineKind::Paragraph(text) => {
                    self.submit(Block::Paragraph(split_spans(text)), line_no, &mut stats)
                        .await;
                }
                LineKind::Blank => {}
            }

            if let Some(cb) = self.callback() {
                cb.on_line_done(line_no, total);
            }
        }

        if let Some(opened_at) = equation.opened_at() {
            stats.unterminated_equations += 1;
            let expression = equation.finish().unwrap_or_default();
            match self.config.unterminated_equation {
                UnterminatedEquationPolicy::Discard => {
                    warn!(
                        "Equation opened on line {} is never closed; discarding {} buffered line(s)",
                        opened_at,
                        expression.lines().count()
                    );
                }
                UnterminatedEquationPolicy::Flush => {
                    warn!(
                        "Equation opened on line {} is never closed; submitting it anyway",
                        opened_at
                    );
                    self.submit(Block::equation(expression), opened_at, &mut stats)
                        .await;
                }
            }
        }

        stats.total_duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Upload complete: {} blocks submitted, {} failed, {}ms",
            stats.blocks_submitted, stats.blocks_failed, stats.total_duration_ms
        );

        if let Some(cb) = self.callback() {
            cb.on_upload_complete(stats.blocks_submitted, stats.blocks_failed);
        }

        Ok(stats)
    }

    async fn handle_image(
        &self,
        alt: &str,
        target: &str,
        source_path: &Path,
        line_no: usize,
        stats: &mut UploadStats,
    ) -> Result<(), Md2NotionError> {
        let url = match resolve_image(target, source_path) {
            ImageSource::Remote(url) => url,
            ImageSource::Local(path) => match self.images.upload(&path).await {
                Ok(url) => {
                    debug!("Line {}: {} → {}", line_no, path.display(), url);
                    stats.images_uploaded += 1;
                    url
                }
                Err(e) => {
                    self.image_skipped(line_no, &e.to_string(), stats);
                    return Ok(());
                }
            },
            ImageSource::Missing(path) => match self.config.missing_image {
                MissingImagePolicy::Abort => {
                    return Err(Md2NotionError::MissingImage {
                        path,
                        line: line_no,
                    });
                }
                MissingImagePolicy::Skip => {
                    let msg = format!("Image file not found: '{}'", path.display());
                    self.image_skipped(line_no, &msg, stats);
                    return Ok(());
                }
            },
        };

        for block in Block::image(url, Some(alt.to_string())).into_submissions() {
            self.submit(block, line_no, stats).await;
        }
        Ok(())
    }

    async fn submit(&self, block: Block, line_no: usize, stats: &mut UploadStats) {
        match self.sink.append(&block).await {
            Ok(()) => {
                stats.blocks_submitted += 1;
                if let Some(cb) = self.callback() {
                    cb.on_block_submitted(line_no, block.kind());
                }
            }
            Err(e) => {
                warn!("Line {}: {} block not added: {}", line_no, block.kind(), e);
                stats.blocks_failed += 1;
                self.report_error(line_no, &e);
            }
        }
    }

    fn image_skipped(&self, line_no: usize, msg: &str, stats: &mut UploadStats) {
        warn!("Line {}: skipping image: {}", line_no, msg);
        stats.images_skipped += 1;
        if let Some(cb) = self.callback() {
            cb.on_block_error(line_no, msg);
        }
    }

    fn report_error(&self, line_no: usize, e: &BlockError) {
        if let Some(cb) = self.callback() {
            cb.on_block_error(line_no, &e.to_string());
        }
    }

    fn callback(&self) -> Option<&dyn UploadProgressCallback> {
        self.config.progress_callback.as_deref()
    }
}
