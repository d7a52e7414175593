use serde::Serialize;
use tracing::{error, warn};

use crate::error::{ErrorCode, SearchError};
use crate::search::engine::{ExportOutcome, SearchOutcome};
use crate::search::results::ResultRecord;

/// Last resort when not even the internal-error response serializes.
pub(super) const INTERNAL_ERROR_LINE: &str = r#"{"http_status":500,"status":"error","error":"internal error","code":"unexpected_internal"}"#;

#[derive(Debug, Serialize)]
pub struct SuccessBody {
    pub results: Vec<ResultRecord>,
    pub total: usize,
    pub current_page: u32,
    pub total_pages: usize,
    pub cache_key: String,
}

/// Every record of a cached set inside the requested window.
#[derive(Debug, Serialize)]
pub struct ExportBody {
    pub results: Vec<ResultRecord>,
    pub total: usize,
    pub cache_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: ErrorCode,
    #[serde(skip)]
    pub transport_status: u16,
}

/// Payload returned to the caller for both entry points.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response {
    Success(SuccessBody),
    #[serde(rename = "success")]
    Export(ExportBody),
    Error(ErrorBody),
}

impl Response {
    pub fn status_code(&self) -> u16 {
        match self {
            Response::Success(_) | Response::Export(_) => 200,
            Response::Error(body) => body.transport_status,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Response::Error(_))
    }
}

/// Response plus its transport status, as written by the stdio server.
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    pub http_status: u16,
    #[serde(flatten)]
    pub response: &'a Response,
}

impl From<SearchOutcome> for Response {
    fn from(outcome: SearchOutcome) -> Self {
        let page = outcome.page;
        Response::Success(SuccessBody {
            results: page.items,
            total: page.total_count,
            current_page: page.current_page,
            total_pages: page.total_pages,
            cache_key: outcome.cache_key,
        })
    }
}

impl From<ExportOutcome> for Response {
    fn from(outcome: ExportOutcome) -> Self {
        Response::Export(ExportBody {
            total: outcome.records.len(),
            results: outcome.records,
            cache_key: outcome.cache_key,
            markdown: None,
        })
    }
}

impl From<SearchError> for Response {
    fn from(e: SearchError) -> Self {
        if e.is_validation() {
            warn!(error = %e, "rejected request");
        } else {
            error!(error = %e, code = ?e.code(), "search failed");
        }
        Response::Error(ErrorBody {
            error: e.to_string(),
            code: e.code(),
            transport_status: e.status(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::page::Page;

    #[test]
    fn status_matches_search_error() {
        for e in [
            SearchError::MissingCredential,
            SearchError::EmptyQuery,
            SearchError::InvalidPage("x".into()),
            SearchError::InvalidRequest("bad".into()),
            SearchError::UnknownCacheKey("k".into()),
            SearchError::ProviderTimeout,
            SearchError::ProviderRequestFailed,
            SearchError::ProviderResponseMalformed,
            SearchError::UnexpectedInternal,
        ] {
            let expected = e.status();
            assert_eq!(Response::from(e).status_code(), expected);
        }
    }

    #[test]
    fn success_serializes_flat() {
        let outcome = SearchOutcome {
            page: Page {
                items: vec![],
                current_page: 2,
                total_pages: 3,
                total_count: 45,
            },
            cache_key: "site:arxiv.org llm".into(),
        };
        let json = serde_json::to_value(Response::from(outcome)).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["total"], 45);
        assert_eq!(json["current_page"], 2);
        assert_eq!(json["total_pages"], 3);
        assert_eq!(json["cache_key"], "site:arxiv.org llm");
        assert!(json["results"].as_array().unwrap().is_empty());
    }

    #[test]
    fn error_serializes_message_and_code() {
        let response = Response::from(SearchError::InvalidDateRange);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "invalid_date_range");
        assert!(json["error"].as_str().unwrap().contains("start date"));
    }

    #[test]
    fn envelope_adds_status() {
        let response = Response::from(SearchError::UnknownCacheKey("k".into()));
        let envelope = Envelope {
            http_status: response.status_code(),
            response: &response,
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["http_status"], 404);
        assert_eq!(json["status"], "error");
    }

    #[test]
    fn internal_error_line_matches_taxonomy() {
        let response = Response::from(SearchError::UnexpectedInternal);
        let envelope = Envelope {
            http_status: response.status_code(),
            response: &response,
        };
        let expected = serde_json::to_value(&envelope).unwrap();
        let line: serde_json::Value = serde_json::from_str(INTERNAL_ERROR_LINE).unwrap();
        assert_eq!(line, expected);
        assert_eq!(line["http_status"], 500);
    }

    #[test]
    fn export_serializes_as_success() {
        let response = Response::from(ExportOutcome {
            records: vec![],
            cache_key: "site:arxiv.org llm".into(),
        });
        assert_eq!(response.status_code(), 200);
        assert!(response.is_success());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["total"], 0);
        assert!(json.get("markdown").is_none());
        assert!(json.get("current_page").is_none());
    }
}
