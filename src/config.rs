use std::env;
use std::str::FromStr;
use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_CACHE_MAX: usize = 100;
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_RESULTS: u32 = 100;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: invalid value '{value}' ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// How the query translator resolves Russian terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TranslatorMode {
    /// Longest-first phrase substitution over the whole query
    #[default]
    Phrase,
    /// Per-token dictionary lookup, delegating unknown tokens to LibreTranslate
    Token,
}

/// Where a date window is expressed in the provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DateHintMode {
    /// `after:` / `before:` directives appended to the query text
    #[default]
    Inline,
    /// Separate `start_date` / `end_date` request fields
    Structured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    Basic,
    #[default]
    Advanced,
}

/// Runtime settings, read from `ARXIV_SCOUT_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub page_size: usize,
    pub cache_max_entries: usize,
    pub cache_ttl: Option<Duration>,
    pub provider_timeout: Duration,
    pub max_results: u32,
    pub search_depth: SearchDepth,
    pub translator: TranslatorMode,
    pub date_hints: DateHintMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            cache_max_entries: DEFAULT_CACHE_MAX,
            cache_ttl: None,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            max_results: DEFAULT_MAX_RESULTS,
            search_depth: SearchDepth::default(),
            translator: TranslatorMode::default(),
            date_hints: DateHintMode::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &'static str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(|v| (var, v))
        };
        let defaults = Self::default();

        Ok(Self {
            page_size: get("ARXIV_SCOUT_PAGE_SIZE")
                .map(|(var, v)| parse_positive(var, &v))
                .transpose()?
                .unwrap_or(defaults.page_size),
            cache_max_entries: get("ARXIV_SCOUT_CACHE_MAX")
                .map(|(var, v)| parse_positive(var, &v))
                .transpose()?
                .unwrap_or(defaults.cache_max_entries),
            cache_ttl: get("ARXIV_SCOUT_CACHE_TTL_SECS")
                .map(|(var, v)| parse_positive::<u64>(var, &v).map(Duration::from_secs))
                .transpose()?,
            provider_timeout: get("ARXIV_SCOUT_PROVIDER_TIMEOUT_SECS")
                .map(|(var, v)| parse_positive::<u64>(var, &v).map(Duration::from_secs))
                .transpose()?
                .unwrap_or(defaults.provider_timeout),
            max_results: get("ARXIV_SCOUT_MAX_RESULTS")
                .map(|(var, v)| parse_positive(var, &v))
                .transpose()?
                .unwrap_or(defaults.max_results),
            search_depth: get("ARXIV_SCOUT_SEARCH_DEPTH")
                .map(|(var, v)| parse_enum(var, &v))
                .transpose()?
                .unwrap_or(defaults.search_depth),
            translator: get("ARXIV_SCOUT_TRANSLATOR")
                .map(|(var, v)| parse_enum(var, &v))
                .transpose()?
                .unwrap_or(defaults.translator),
            date_hints: get("ARXIV_SCOUT_DATE_HINTS")
                .map(|(var, v)| parse_enum(var, &v))
                .transpose()?
                .unwrap_or(defaults.date_hints),
        })
    }
}

fn parse_positive<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
    T::Err: std::fmt::Display,
{
    let invalid = |reason: String| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason,
    };
    let parsed = value.parse::<T>().map_err(|e| invalid(e.to_string()))?;
    if parsed <= T::default() {
        return Err(invalid("must be greater than zero".into()));
    }
    Ok(parsed)
}

fn parse_enum<T: ValueEnum>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    <T as ValueEnum>::from_str(value, true).map_err(|reason| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason,
    })
}
