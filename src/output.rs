//! Result of an upload run.

use serde::{Deserialize, Serialize};

/// Counters collected while walking one Markdown file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadStats {
    /// Lines read from the file, blank ones included.
    pub total_lines: usize,
    /// Blocks Notion accepted.
    pub blocks_submitted: usize,
    /// Blocks Notion rejected or that never reached it.
    pub blocks_failed: usize,
    /// Local images uploaded to the image host.
    pub images_uploaded: usize,
    /// Images dropped: upload failures and missing files under `Skip`.
    pub images_skipped: usize,
    /// Unterminated `$$` groups at end of file.
    pub unterminated_equations: usize,
    pub total_duration_ms: u64,
}

impl UploadStats {
    /// True when every block and image made it.
    pub fn is_clean(&self) -> bool {
        self.blocks_failed == 0 && self.images_skipped == 0 && self.unterminated_equations == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_clean() {
        assert!(UploadStats::default().is_clean());
    }

    #[test]
    fn failures_are_not_clean() {
        let s = UploadStats {
            blocks_failed: 1,
            ..Default::default()
        };
        assert!(!s.is_clean());
    }

    #[test]
    fn serialises_to_json() {
        let s = UploadStats {
            total_lines: 3,
            blocks_submitted: 2,
            ..Default::default()
        };
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["total_lines"], 3);
        assert_eq!(v["blocks_submitted"], 2);
    }
}
