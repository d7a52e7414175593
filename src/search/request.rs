use std::num::IntErrorKind;

use chrono::NaiveDate;

use crate::arxiv::ARXIV_DOMAIN;
use crate::config::{Config, DateHintMode, SearchDepth};
use crate::error::SearchError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive publication-date window. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    /// Parses and validates optional `YYYY-MM-DD` bounds against `today`.
    pub fn parse(
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, SearchError> {
        let start = start.map(parse_date).transpose()?;
        let end = end.map(parse_date).transpose()?;

        if let (Some(s), Some(e)) = (start, end)
            && s > e
        {
            return Err(SearchError::InvalidDateRange);
        }
        if end.is_some_and(|e| e > today) {
            return Err(SearchError::FutureDateNotAllowed);
        }
        Ok(Self { start, end })
    }

    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start.zip(self.end)
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, SearchError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| SearchError::InvalidDateFormat(raw.to_string()))
}

/// Blank or absent pages default to 1; anything else must be an integer and is
/// clamped to `1..=u32::MAX`, including integers too large for `i64`.
pub fn parse_page(raw: Option<&str>) -> Result<u32, SearchError> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(1);
    };
    match raw.parse::<i64>() {
        Ok(page) => Ok(page.clamp(1, i64::from(u32::MAX)) as u32),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(u32::MAX),
            IntErrorKind::NegOverflow => Ok(1),
            _ => Err(SearchError::InvalidPage(raw.to_string())),
        },
    }
}

/// Parameters of the provider call that are not part of the query text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOptions {
    pub include_domains: Vec<String>,
    pub search_depth: SearchDepth,
    pub max_results: u32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            include_domains: vec![ARXIV_DOMAIN.to_string()],
            search_depth: SearchDepth::default(),
            max_results: crate::config::DEFAULT_MAX_RESULTS,
            start_date: None,
            end_date: None,
        }
    }
}

/// Fully resolved provider request for one user search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub window: DateWindow,
    pub page: u32,
    pub options: ProviderOptions,
}

impl SearchRequest {
    /// Key under which the unpaginated result set is cached.
    pub fn cache_key(&self) -> String {
        match (self.options.start_date, self.options.end_date) {
            (Some(start), Some(end)) => format!("{} [{start}..{end}]", self.query),
            _ => self.query.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestBuilder {
    date_hints: DateHintMode,
    search_depth: SearchDepth,
    max_results: u32,
}

impl RequestBuilder {
    pub fn new(config: &Config) -> Self {
        Self {
            date_hints: config.date_hints,
            search_depth: config.search_depth,
            max_results: config.max_results,
        }
    }

    /// Input checks that must pass before any external call is made.
    pub fn validate(
        start: Option<&str>,
        end: Option<&str>,
        page: Option<&str>,
        today: NaiveDate,
    ) -> Result<(u32, DateWindow), SearchError> {
        let page = parse_page(page)?;
        let window = DateWindow::parse(start, end, today)?;
        Ok((page, window))
    }

    /// Composes the provider query from already validated parts.
    pub fn assemble(&self, translated: &str, page: u32, window: DateWindow) -> SearchRequest {
        let mut query = format!("site:{ARXIV_DOMAIN} {translated}")
            .trim_end()
            .to_string();
        let mut options = ProviderOptions {
            search_depth: self.search_depth,
            max_results: self.max_results,
            ..ProviderOptions::default()
        };

        if let Some((start, end)) = window.bounds() {
            match self.date_hints {
                DateHintMode::Inline => {
                    query.push_str(&format!(" after:{start} before:{end}"));
                }
                DateHintMode::Structured => {
                    options.start_date = Some(start);
                    options.end_date = Some(end);
                }
            }
        }

        SearchRequest {
            query,
            window,
            page,
            options,
        }
    }
}
