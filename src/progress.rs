//! Progress-callback trait for per-line upload events.
//!
//! Inject an [`Arc<dyn UploadProgressCallback>`] via
//! [`crate::config::UploadConfigBuilder::progress_callback`] to receive
//! events while the parser walks the Markdown file. The CLI uses it to drive
//! a terminal progress bar; library callers can forward events anywhere.
//!
//! # Example
//!
//! ```rust
//! use notion_md::{UploadConfig, UploadProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     sent: AtomicUsize,
//! }
//!
//! impl UploadProgressCallback for CountingCallback {
//!     fn on_block_submitted(&self, line: usize, kind: &str) {
//!         self.sent.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("line {line}: {kind}");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { sent: AtomicUsize::new(0) });
//!
//! let config = UploadConfig::builder("0123456789abcdef0123456789abcdef")
//!     .progress_callback(counter as Arc<dyn UploadProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the parser as it processes each line.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait UploadProgressCallback: Send + Sync {
    /// Called once after the file is read, before any line is processed.
    fn on_upload_start(&self, total_lines: usize) {
        let _ = total_lines;
    }

    /// Called after each line (1-indexed) has been fully handled.
    fn on_line_done(&self, line: usize, total_lines: usize) {
        let _ = (line, total_lines);
    }

    /// Called when Notion accepted a block.
    ///
    /// # Arguments
    /// * `line` — 1-indexed source line that produced the block
    /// * `kind` — block type tag, e.g. `heading_1`, `paragraph`
    fn on_block_submitted(&self, line: usize, kind: &str) {
        let _ = (line, kind);
    }

    /// Called when a block or image failed; the run continues.
    fn on_block_error(&self, line: usize, error: &str) {
        let _ = (line, error);
    }

    /// Called once after the last line.
    fn on_upload_complete(&self, submitted: usize, failed: usize) {
        let _ = (submitted, failed);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl UploadProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::UploadConfig`].
pub type ProgressCallback = Arc<dyn UploadProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        total: AtomicUsize,
        lines: AtomicUsize,
        submitted: AtomicUsize,
        errors: AtomicUsize,
    }

    impl UploadProgressCallback for TrackingCallback {
        fn on_upload_start(&self, total_lines: usize) {
            self.total.store(total_lines, Ordering::SeqCst);
        }

        fn on_line_done(&self, _line: usize, _total: usize) {
            self.lines.fetch_add(1, Ordering::SeqCst);
        }

        fn on_block_submitted(&self, _line: usize, _kind: &str) {
            self.submitted.fetch_add(1, Ordering::SeqCst);
        }

        fn on_block_error(&self, _line: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_upload_start(3);
        cb.on_line_done(1, 3);
        cb.on_block_submitted(1, "paragraph");
        cb.on_block_error(2, "HTTP 400");
        cb.on_upload_complete(1, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_upload_start(2);
        tracker.on_block_submitted(1, "heading_1");
        tracker.on_line_done(1, 2);
        tracker.on_block_error(2, "boom");
        tracker.on_line_done(2, 2);

        assert_eq!(tracker.total.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.lines.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.submitted.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_upload_start(10);
        cb.on_line_done(1, 10);
    }
}
