use serde::{Deserialize, Serialize};

use crate::config::SearchDepth;

#[derive(Debug, Serialize)]
pub struct SearchRequestBody<'a> {
    pub query: &'a str,
    pub search_depth: SearchDepth,
    pub include_domains: &'a [String],
    pub max_results: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// `results` is required; a body without it is treated as malformed.
#[derive(Debug, Deserialize)]
pub struct SearchResponseBody {
    pub results: Vec<RawHit>,
}

/// A single provider hit. Field names for the snippet vary between
/// provider versions, so every text field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHit {
    pub title: Option<String>,
    pub url: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub snippet: Option<String>,
    pub raw_content: Option<String>,
}
