mod errors;
mod params;

pub use errors::Response;
pub use params::{ExportFormat, ExportParams, FilterParams, PageParam, SearchParams};

use std::time::Duration;

use reqwest::Client;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

use errors::{Envelope, INTERNAL_ERROR_LINE};
use params::Request;

use crate::config::{Config, TranslatorMode};
use crate::error::SearchError;
use crate::markdown;
use crate::search::engine::SearchService;
use crate::search::translate::QueryTranslator;
use crate::tavily::client::{SearchProvider, TavilyClient};
use crate::translation::{LibreTranslateClient, TranslationClient};

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Global HTTP client timeout covering DNS + connect + response body.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
/// Maximum redirect hops before aborting.
const MAX_REDIRECTS: usize = 5;

/// Front door over the search core: search and filter-only entry points.
///
/// Configuration via environment variables:
/// - `TAVILY_API_KEY`: enables provider searches (filtering cached sets works without it)
/// - `LIBRETRANSLATE_URL` / `LIBRETRANSLATE_API_KEY`: token-mode translation (optional)
pub struct Scout<P = TavilyClient, C = LibreTranslateClient> {
    service: SearchService<P, C>,
}

impl Scout {
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(HTTP_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        let provider = TavilyClient::from_env(http.clone())
            .inspect_err(|e| warn!("Tavily client not available: {e}"))
            .ok();
        let translation = LibreTranslateClient::from_env(http);
        if config.translator == TranslatorMode::Token && translation.is_none() {
            warn!("token translator selected without LIBRETRANSLATE_URL; unknown words pass through");
        }
        let translator = QueryTranslator::from_mode(config.translator, translation);
        Ok(Self::new(SearchService::new(config, provider, translator)))
    }
}

impl<P: SearchProvider, C: TranslationClient> Scout<P, C> {
    pub fn new(service: SearchService<P, C>) -> Self {
        Self { service }
    }

    pub async fn search(&self, params: &SearchParams) -> Response {
        info!(query = %params.query, "tool:search");
        let fields = params.fields();
        match self.service.search(fields.search(&params.query), today()).await {
            Ok(outcome) => outcome.into(),
            Err(e) => e.into(),
        }
    }

    pub fn filter(&self, params: &FilterParams) -> Response {
        info!(cache_key = %params.cache_key, "tool:filter");
        let fields = params.fields();
        match self.service.filter_cached(fields.filter(&params.cache_key), today()) {
            Ok(outcome) => outcome.into(),
            Err(e) => e.into(),
        }
    }

    /// Whole filtered set for a cache key, with an optional Markdown rendering.
    pub fn export(&self, params: &ExportParams) -> Response {
        info!(cache_key = %params.cache_key, format = ?params.format, "tool:export");
        let fields = params.fields();
        let outcome = match self.service.export_cached(fields.export(&params.cache_key), today()) {
            Ok(outcome) => outcome,
            Err(e) => return e.into(),
        };
        let mut response = Response::from(outcome);
        if params.format == ExportFormat::Markdown
            && let Response::Export(body) = &mut response
        {
            body.markdown = Some(markdown::format_export(&body.cache_key, &body.results));
        }
        response
    }

    /// Handles one line of the stdio protocol and returns the JSON response line.
    pub async fn handle_line(&self, line: &str) -> String {
        let response = match serde_json::from_str::<Request>(line) {
            Ok(Request::Search(params)) => self.search(&params).await,
            Ok(Request::Filter(params)) => self.filter(&params),
            Ok(Request::Export(params)) => self.export(&params),
            Err(e) => SearchError::InvalidRequest(e.to_string()).into(),
        };
        to_json_line(&response)
    }

    /// Reads newline-delimited JSON requests until EOF, answering each on its own line.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("serving JSON requests on stdio");
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let reply = self.handle_line(&line).await;
            writer.write_all(reply.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
        debug!("stdin closed");
        Ok(())
    }
}

pub fn to_json_line(response: &Response) -> String {
    serialize_envelope(response)
        .or_else(|e| {
            error!(error = %e, "failed to serialize response");
            serialize_envelope(&Response::from(SearchError::UnexpectedInternal))
        })
        .unwrap_or_else(|_| INTERNAL_ERROR_LINE.to_string())
}

fn serialize_envelope(response: &Response) -> serde_json::Result<String> {
    serde_json::to_string(&Envelope {
        http_status: response.status_code(),
        response,
    })
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
