use std::time::Duration;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::cache::ResultCache;
use super::filter::filter_by_window;
use super::page::{Page, paginate};
use super::query::SearchQuery;
use super::request::{DateWindow, RequestBuilder, SearchRequest};
use super::results::{ResultRecord, ResultSet, normalize_hits};
use super::translate::QueryTranslator;
use crate::config::Config;
use crate::error::SearchError;
use crate::tavily::client::{SearchProvider, TavilyClient};
use crate::translation::{LibreTranslateClient, TranslationClient};

/// A user search as received from the front door. All fields are untrusted text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchInput<'a> {
    pub query: &'a str,
    pub page: Option<&'a str>,
    pub start_date: Option<&'a str>,
    pub end_date: Option<&'a str>,
}

/// A re-query of an already cached result set.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterInput<'a> {
    pub cache_key: &'a str,
    pub page: Option<&'a str>,
    pub start_date: Option<&'a str>,
    pub end_date: Option<&'a str>,
}

/// Whole-set export of a cached result set.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportInput<'a> {
    pub cache_key: &'a str,
    pub start_date: Option<&'a str>,
    pub end_date: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub page: Page<ResultRecord>,
    pub cache_key: String,
}

/// Every record of a cached set that falls in the window, unpaginated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub records: Vec<ResultRecord>,
    pub cache_key: String,
}

/// Owns the translator, request builder, and result cache for the process.
pub struct SearchService<P = TavilyClient, C = LibreTranslateClient> {
    provider: Option<P>,
    translator: QueryTranslator<C>,
    builder: RequestBuilder,
    cache: ResultCache,
    page_size: usize,
    provider_timeout: Duration,
}

impl<P: SearchProvider, C: TranslationClient> SearchService<P, C> {
    /// `provider` is `None` when no API key is configured; searches then fail
    /// with `MissingCredential` while cached filtering keeps working.
    pub fn new(config: &Config, provider: Option<P>, translator: QueryTranslator<C>) -> Self {
        Self {
            provider,
            translator,
            builder: RequestBuilder::new(config),
            cache: ResultCache::new(config.cache_max_entries, config.cache_ttl),
            page_size: config.page_size,
            provider_timeout: config.provider_timeout,
        }
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> &ResultCache {
        &self.cache
    }

    #[cfg(test)]
    pub(crate) fn provider(&self) -> Option<&P> {
        self.provider.as_ref()
    }

    pub async fn search(
        &self,
        input: SearchInput<'_>,
        today: NaiveDate,
    ) -> Result<SearchOutcome, SearchError> {
        let raw = input.query.trim();
        if raw.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let (page, window) =
            RequestBuilder::validate(input.start_date, input.end_date, input.page, today)?;
        let provider = self
            .provider
            .as_ref()
            .ok_or(SearchError::MissingCredential)?;

        let query = SearchQuery::resolve(raw, &self.translator).await;
        let request = self.builder.assemble(query.translated(), page, window);
        let key = request.cache_key();
        info!(
            query = %query.raw(),
            normalized = %query.normalized(),
            provider_query = %request.query,
            page,
            "search"
        );

        let set = self
            .cache
            .get_or_compute(&key, || self.fetch(provider, &request, &key))
            .await?;

        let outcome = self.view(&set, &request.window, page, today);
        info!(
            total = outcome.page.total_count,
            returned = outcome.page.items.len(),
            "search complete"
        );
        Ok(outcome)
    }

    /// Applies a date window and pagination to a cached set without calling the provider.
    pub fn filter_cached(
        &self,
        input: FilterInput<'_>,
        today: NaiveDate,
    ) -> Result<SearchOutcome, SearchError> {
        let (page, window) =
            RequestBuilder::validate(input.start_date, input.end_date, input.page, today)?;
        let set = self
            .cache
            .get(input.cache_key)
            .ok_or_else(|| SearchError::UnknownCacheKey(input.cache_key.to_string()))?;
        Ok(self.view(&set, &window, page, today))
    }

    /// Like `filter_cached` but returns every matching record instead of one page.
    pub fn export_cached(
        &self,
        input: ExportInput<'_>,
        today: NaiveDate,
    ) -> Result<ExportOutcome, SearchError> {
        let window = DateWindow::parse(input.start_date, input.end_date, today)?;
        let set = self
            .cache
            .get(input.cache_key)
            .ok_or_else(|| SearchError::UnknownCacheKey(input.cache_key.to_string()))?;
        let records = filter_by_window(&set.records, &window, today).into_owned();
        info!(
            cache_key = input.cache_key,
            exported = records.len(),
            cached = set.len(),
            "export"
        );
        Ok(ExportOutcome {
            records,
            cache_key: set.key.clone(),
        })
    }

    async fn fetch(
        &self,
        provider: &P,
        request: &SearchRequest,
        key: &str,
    ) -> Result<ResultSet, SearchError> {
        let call = provider.search(&request.query, &request.options);
        match tokio::time::timeout(self.provider_timeout, call).await {
            Ok(Ok(hits)) => {
                let set = normalize_hits(key, hits);
                if set.is_empty() {
                    info!(key, "provider returned no arXiv results");
                }
                Ok(set)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "search provider failed");
                Err(e.into())
            }
            Err(_) => {
                warn!(timeout_ms = self.provider_timeout.as_millis() as u64, "search provider timed out");
                Err(SearchError::ProviderTimeout)
            }
        }
    }

    fn view(&self, set: &ResultSet, window: &DateWindow, page: u32, today: NaiveDate) -> SearchOutcome {
        let filtered = filter_by_window(&set.records, window, today);
        SearchOutcome {
            page: paginate(&filtered, page, self.page_size),
            cache_key: set.key.clone(),
        }
    }
}
