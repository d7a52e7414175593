use serde::Deserialize;

use crate::search::engine::{ExportInput, FilterInput, SearchInput};

/// Page numbers arrive as JSON numbers from programs and as strings from forms.
/// Any other JSON value is kept so it can be reported as an invalid page.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PageParam {
    Number(serde_json::Number),
    Text(String),
    Other(serde_json::Value),
}

impl PageParam {
    fn to_text(&self) -> String {
        match self {
            PageParam::Number(n) => n.to_string(),
            PageParam::Text(s) => s.clone(),
            PageParam::Other(v) => v.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    /// Free-text research query (Russian or English)
    #[serde(default)]
    pub query: String,
    /// 1-based page number (default: 1)
    pub page: Option<PageParam>,
    /// Inclusive lower bound, YYYY-MM-DD
    pub start_date: Option<String>,
    /// Inclusive upper bound, YYYY-MM-DD, not in the future
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
    /// `cache_key` returned by a previous search
    #[serde(default)]
    pub cache_key: String,
    pub page: Option<PageParam>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Markdown,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportParams {
    /// `cache_key` returned by a previous search
    #[serde(default)]
    pub cache_key: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// `json` (default) or `markdown`
    #[serde(default)]
    pub format: ExportFormat,
}

/// One line of the stdio protocol.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Request {
    Search(SearchParams),
    Filter(FilterParams),
    Export(ExportParams),
}

/// Owned text views of optional params. Blank values count as absent.
pub(super) struct Fields {
    page: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
}

impl Fields {
    fn new(page: &Option<PageParam>, start: &Option<String>, end: &Option<String>) -> Self {
        let blank_to_none = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        Self {
            page: page.as_ref().map(PageParam::to_text),
            start_date: blank_to_none(start),
            end_date: blank_to_none(end),
        }
    }

    pub(super) fn search<'a>(&'a self, query: &'a str) -> SearchInput<'a> {
        SearchInput {
            query,
            page: self.page.as_deref(),
            start_date: self.start_date.as_deref(),
            end_date: self.end_date.as_deref(),
        }
    }

    pub(super) fn filter<'a>(&'a self, cache_key: &'a str) -> FilterInput<'a> {
        FilterInput {
            cache_key,
            page: self.page.as_deref(),
            start_date: self.start_date.as_deref(),
            end_date: self.end_date.as_deref(),
        }
    }

    pub(super) fn export<'a>(&'a self, cache_key: &'a str) -> ExportInput<'a> {
        ExportInput {
            cache_key,
            start_date: self.start_date.as_deref(),
            end_date: self.end_date.as_deref(),
        }
    }
}

impl SearchParams {
    pub(super) fn fields(&self) -> Fields {
        Fields::new(&self.page, &self.start_date, &self.end_date)
    }
}

impl FilterParams {
    pub(super) fn fields(&self) -> Fields {
        Fields::new(&self.page, &self.start_date, &self.end_date)
    }
}

impl ExportParams {
    pub(super) fn fields(&self) -> Fields {
        Fields::new(&None, &self.start_date, &self.end_date)
    }
}
