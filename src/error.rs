use serde::Serialize;

use crate::tavily::client::ProviderError;

/// Every failure the search core can report to its caller.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("TAVILY_API_KEY is missing or still set to the placeholder value")]
    MissingCredential,

    #[error("search query must not be empty")]
    EmptyQuery,

    #[error("invalid page number: '{0}'")]
    InvalidPage(String),

    #[error("invalid date format: '{0}' (expected YYYY-MM-DD)")]
    InvalidDateFormat(String),

    #[error("start date cannot be later than end date")]
    InvalidDateRange,

    #[error("end date cannot be in the future")]
    FutureDateNotAllowed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("no cached results for key '{0}'")]
    UnknownCacheKey(String),

    #[error("search provider timed out")]
    ProviderTimeout,

    #[error("search provider request failed")]
    ProviderRequestFailed,

    #[error("search provider returned an unexpected response")]
    ProviderResponseMalformed,

    #[error("internal error")]
    UnexpectedInternal,
}

/// Stable categorical code carried in error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    MissingCredential,
    EmptyQuery,
    InvalidPage,
    InvalidDateFormat,
    InvalidDateRange,
    FutureDateNotAllowed,
    InvalidRequest,
    UnknownCacheKey,
    ProviderTimeout,
    ProviderRequestFailed,
    ProviderResponseMalformed,
    UnexpectedInternal,
}

impl SearchError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SearchError::MissingCredential => ErrorCode::MissingCredential,
            SearchError::EmptyQuery => ErrorCode::EmptyQuery,
            SearchError::InvalidPage(_) => ErrorCode::InvalidPage,
            SearchError::InvalidDateFormat(_) => ErrorCode::InvalidDateFormat,
            SearchError::InvalidDateRange => ErrorCode::InvalidDateRange,
            SearchError::FutureDateNotAllowed => ErrorCode::FutureDateNotAllowed,
            SearchError::InvalidRequest(_) => ErrorCode::InvalidRequest,
            SearchError::UnknownCacheKey(_) => ErrorCode::UnknownCacheKey,
            SearchError::ProviderTimeout => ErrorCode::ProviderTimeout,
            SearchError::ProviderRequestFailed => ErrorCode::ProviderRequestFailed,
            SearchError::ProviderResponseMalformed => ErrorCode::ProviderResponseMalformed,
            SearchError::UnexpectedInternal => ErrorCode::UnexpectedInternal,
        }
    }

    /// HTTP-equivalent status for transports that need one.
    pub fn status(&self) -> u16 {
        match self {
            SearchError::MissingCredential => 401,
            SearchError::EmptyQuery
            | SearchError::InvalidPage(_)
            | SearchError::InvalidDateFormat(_)
            | SearchError::InvalidDateRange
            | SearchError::FutureDateNotAllowed
            | SearchError::InvalidRequest(_) => 400,
            SearchError::UnknownCacheKey(_) => 404,
            SearchError::ProviderTimeout => 504,
            SearchError::ProviderRequestFailed | SearchError::ProviderResponseMalformed => 502,
            SearchError::UnexpectedInternal => 500,
        }
    }

    /// Validation failures are raised before any external call.
    pub fn is_validation(&self) -> bool {
        self.status() == 400
    }
}

/// Drops upstream detail. The call site logs `e` before converting.
impl From<ProviderError> for SearchError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::ApiKeyNotSet => SearchError::MissingCredential,
            ProviderError::Timeout => SearchError::ProviderTimeout,
            ProviderError::Malformed(_) => SearchError::ProviderResponseMalformed,
            ProviderError::RateLimited | ProviderError::Api { .. } | ProviderError::Network(_) => {
                SearchError::ProviderRequestFailed
            }
        }
    }
}
