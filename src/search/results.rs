use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arxiv::{PublishedDate, extract_published_date};
use crate::tavily::types::RawHit;

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_SNIPPET: &str = "No description available";
pub const MAX_RAW_SNIPPET_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub published_date: PublishedDate,
}

/// Normalized, de-duplicated records for one cache key. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    pub key: String,
    pub records: Vec<ResultRecord>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Maps provider hits to records. Hits without a URL are dropped; the first hit
/// for each URL wins.
pub fn normalize_hits(key: &str, hits: Vec<RawHit>) -> ResultSet {
    let total = hits.len();
    let mut seen = HashSet::new();
    let records: Vec<ResultRecord> = hits
        .into_iter()
        .filter_map(|hit| {
            let url = hit.url.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
            if !seen.insert(url.to_string()) {
                return None;
            }
            Some(ResultRecord {
                published_date: extract_published_date(url),
                url: url.to_string(),
                title: non_empty(hit.title.as_deref()).unwrap_or(DEFAULT_TITLE).to_string(),
                snippet: pick_snippet(&hit),
            })
        })
        .collect();

    if records.len() != total {
        debug!(
            hits = total,
            kept = records.len(),
            "dropped duplicate or url-less hits"
        );
    }

    ResultSet {
        key: key.to_string(),
        records,
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// `content`, then `description`, then `snippet`, then truncated `raw_content`.
fn pick_snippet(hit: &RawHit) -> String {
    if let Some(s) = non_empty(hit.content.as_deref())
        .or_else(|| non_empty(hit.description.as_deref()))
        .or_else(|| non_empty(hit.snippet.as_deref()))
    {
        return s.to_string();
    }
    match non_empty(hit.raw_content.as_deref()) {
        Some(raw) => truncate(raw, MAX_RAW_SNIPPET_CHARS),
        None => DEFAULT_SNIPPET.to_string(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", text[..end].trim_end()),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(url: &str, title: Option<&str>) -> RawHit {
        RawHit {
            url: Some(url.into()),
            title: title.map(String::from),
            content: Some(format!("about {url}")),
            ..RawHit::default()
        }
    }

    #[test]
    fn maps_fields_and_extracts_date() {
        let set = normalize_hits(
            "k",
            vec![hit("https://arxiv.org/abs/2301.01234", Some("Paper"))],
        );
        assert_eq!(set.key, "k");
        assert_eq!(set.len(), 1);
        let r = &set.records[0];
        assert_eq!(r.title, "Paper");
        assert_eq!(r.snippet, "about https://arxiv.org/abs/2301.01234");
        assert_eq!(r.published_date.to_string(), "01.2023");
    }

    #[test]
    fn deduplicates_by_url_first_wins() {
        let set = normalize_hits(
            "k",
            vec![
                hit("https://arxiv.org/abs/2301.00001", Some("First")),
                hit("https://arxiv.org/abs/2301.00002", Some("Other")),
                hit("https://arxiv.org/abs/2301.00001", Some("Second")),
            ],
        );
        assert_eq!(set.len(), 2);
        assert_eq!(set.records[0].title, "First");
        assert_eq!(set.records[1].title, "Other");
    }

    #[test]
    fn skips_hits_without_url() {
        let set = normalize_hits(
            "k",
            vec![
                RawHit::default(),
                RawHit {
                    url: Some("  ".into()),
                    ..RawHit::default()
                },
                hit("https://arxiv.org/abs/2301.00001", None),
            ],
        );
        assert_eq!(set.len(), 1);
        assert_eq!(set.records[0].title, DEFAULT_TITLE);
    }

    #[test]
    fn snippet_fallback_order() {
        let base = RawHit {
            url: Some("https://arxiv.org/abs/2301.00001".into()),
            ..RawHit::default()
        };
        let with = |f: fn(&mut RawHit)| {
            let mut h = base.clone();
            f(&mut h);
            pick_snippet(&h)
        };

        assert_eq!(
            with(|h| {
                h.content = Some("c".into());
                h.description = Some("d".into());
            }),
            "c"
        );
        assert_eq!(
            with(|h| {
                h.content = Some("".into());
                h.description = Some("d".into());
                h.snippet = Some("s".into());
            }),
            "d"
        );
        assert_eq!(with(|h| h.snippet = Some("s".into())), "s");
        assert_eq!(with(|h| h.raw_content = Some("raw".into())), "raw");
        assert_eq!(with(|_| {}), DEFAULT_SNIPPET);
    }

    #[test]
    fn raw_content_is_truncated_on_char_boundary() {
        let hit = RawHit {
            url: Some("https://arxiv.org/abs/2301.00001".into()),
            raw_content: Some("ж".repeat(MAX_RAW_SNIPPET_CHARS + 50)),
            ..RawHit::default()
        };
        let snippet = pick_snippet(&hit);
        assert!(snippet.ends_with("..."));
        assert_eq!(snippet.chars().count(), MAX_RAW_SNIPPET_CHARS + 3);
    }

    #[test]
    fn record_serializes_date_as_string() {
        let set = normalize_hits("k", vec![hit("https://example.com/paper", Some("T"))]);
        let json = serde_json::to_value(&set.records[0]).unwrap();
        assert_eq!(json["published_date"], "unknown");
        assert_eq!(json["title"], "T");
    }
}
