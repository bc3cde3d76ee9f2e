//! Notion page identifiers.
//!
//! Notion accepts page ids in the dashed 8-4-4-4-12 form. Users usually copy
//! them from a page URL, where they appear as 32 bare hex digits, sometimes
//! glued to the page title (`My-Page-0123…cdef`). [`PageId::parse`] accepts
//! all of these shapes and produces the dashed form; anything it does not
//! recognise is passed through unchanged, since the API is the authority on
//! what a valid id is.

use std::fmt;

/// Number of hex digits in a compact Notion id.
const COMPACT_LEN: usize = 32;

/// Dash positions of the 8-4-4-4-12 grouping.
const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

/// A page identifier formatted for the Notion API.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageId(String);

impl PageId {
    /// Format a user-supplied identifier into the dashed shape.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        // Drop URL query/fragment and keep the last path segment.
        let segment = raw
            .split(['?', '#'])
            .next()
            .unwrap_or(raw)
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(raw);

        let compact: String = segment.chars().filter(|c| *c != '-').collect();
        if let Some(tail) = compact
            .len()
            .checked_sub(COMPACT_LEN)
            .and_then(|start| compact.get(start..))
        {
            if tail.chars().all(|c| c.is_ascii_hexdigit()) {
                return Self(dashed(tail));
            }
        }

        Self(raw.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn dashed(hex: &str) -> String {
    let mut out = String::with_capacity(COMPACT_LEN + GROUPS.len() - 1);
    let mut start = 0;
    for (i, len) in GROUPS.iter().enumerate() {
        if i > 0 {
            out.push('-');
        }
        out.push_str(&hex[start..start + len]);
        start += len;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DASHED: &str = "01234567-89ab-cdef-0123-456789abcdef";

    #[test]
    fn compact_id_is_dashed() {
        assert_eq!(
            PageId::parse("0123456789abcdef0123456789abcdef").as_str(),
            DASHED
        );
    }

    #[test]
    fn dashed_id_is_unchanged() {
        assert_eq!(PageId::parse(DASHED).as_str(), DASHED);
    }

    #[test]
    fn oddly_dashed_id_is_normalised() {
        assert_eq!(
            PageId::parse("0123-456789abcdef0123456789ab-cdef").as_str(),
            DASHED
        );
    }

    #[test]
    fn id_is_extracted_from_page_url() {
        let url = "https://www.notion.so/team/My-Page-0123456789abcdef0123456789abcdef?pvs=4";
        assert_eq!(PageId::parse(url).as_str(), DASHED);
    }

    #[test]
    fn unrecognised_id_passes_through() {
        assert_eq!(PageId::parse(" short-id ").as_str(), "short-id");
        assert_eq!(PageId::parse("not-hex").to_string(), "not-hex");
    }
}
