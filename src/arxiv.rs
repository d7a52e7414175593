//! arXiv identifier handling: publication month derived from an abstract/PDF URL.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const ARXIV_DOMAIN: &str = "arxiv.org";
pub const UNKNOWN_DATE: &str = "unknown";

/// Path segments that precede a modern identifier (`/abs/2301.01234`).
/// Anything else with letters in it is a legacy subject category (`/abs/quant-ph/9912345`).
const ROUTE_SEGMENTS: &[&str] = &["abs", "pdf", "html", "ps", "format"];

/// Publication month of a paper, or the "unknown" sentinel when it cannot be derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishedDate {
    Month { month: u32, year: i32 },
    Unknown,
}

impl PublishedDate {
    /// First day of the publication month.
    pub fn first_of_month(self) -> Option<chrono::NaiveDate> {
        match self {
            PublishedDate::Month { month, year } => chrono::NaiveDate::from_ymd_opt(year, month, 1),
            PublishedDate::Unknown => None,
        }
    }
}

impl fmt::Display for PublishedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishedDate::Month { month, year } => write!(f, "{month:02}.{year:04}"),
            PublishedDate::Unknown => f.write_str(UNKNOWN_DATE),
        }
    }
}

/// Parses `MM.YYYY`. The sentinel and anything malformed become `Unknown`.
impl FromStr for PublishedDate {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = s.split_once('.').and_then(|(m, y)| {
            if m.len() != 2 || y.len() != 4 {
                return None;
            }
            let month = m.parse::<u32>().ok().filter(|m| (1..=12).contains(m))?;
            let year = y.parse::<i32>().ok()?;
            Some(PublishedDate::Month { month, year })
        });
        Ok(parsed.unwrap_or(PublishedDate::Unknown))
    }
}

impl Serialize for PublishedDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PublishedDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let Ok(date) = raw.parse::<PublishedDate>();
        Ok(date)
    }
}

/// Derives the publication month from an arXiv URL.
///
/// Legacy identifiers (`quant-ph/9912345`) use a two-digit year where values `>= 80`
/// belong to the 1900s; modern identifiers (`2301.01234`) are always in the 2000s.
pub fn extract_published_date(url: &str) -> PublishedDate {
    parse_arxiv_url(url).unwrap_or(PublishedDate::Unknown)
}

fn parse_arxiv_url(raw: &str) -> Option<PublishedDate> {
    if raw.trim().is_empty() {
        return None;
    }
    let parsed = url::Url::parse(raw.trim()).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    if host != ARXIV_DOMAIN && !host.ends_with(".arxiv.org") {
        return None;
    }

    let segments: Vec<&str> = parsed
        .path_segments()?
        .filter(|s| !s.is_empty())
        .collect();
    let (id, rest) = segments.split_last()?;
    let legacy = rest.last().is_some_and(|prev| is_subject_category(prev));

    let year_digits = digits(id.get(0..2)?)?;
    let month = digits(id.get(2..4)?)?;
    if !(1..=12).contains(&month) {
        return None;
    }

    let century = if legacy && year_digits >= 80 { 1900 } else { 2000 };
    Some(PublishedDate::Month {
        month,
        year: century + year_digits as i32,
    })
}

fn is_subject_category(segment: &str) -> bool {
    segment.chars().any(|c| c.is_ascii_alphabetic())
        && !ROUTE_SEGMENTS.contains(&segment.to_ascii_lowercase().as_str())
}

fn digits(s: &str) -> Option<u32> {
    if s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(month: u32, year: i32) -> PublishedDate {
        PublishedDate::Month { month, year }
    }

    #[test]
    fn modern_identifier() {
        assert_eq!(
            extract_published_date("https://arxiv.org/abs/2301.01234"),
            month(1, 2023)
        );
        assert_eq!(
            extract_published_date("https://arxiv.org/abs/2301.01234").to_string(),
            "01.2023"
        );
    }

    #[test]
    fn modern_identifier_with_version_and_pdf_route() {
        assert_eq!(
            extract_published_date("https://arxiv.org/pdf/1706.03762v7"),
            month(6, 2017)
        );
    }

    #[test]
    fn legacy_identifier_in_1900s() {
        let date = extract_published_date("https://arxiv.org/abs/quant-ph/9912345");
        assert_eq!(date.to_string(), "12.1999");
    }

    #[test]
    fn legacy_identifier_in_2000s() {
        let date = extract_published_date("https://arxiv.org/abs/quant-ph/0512345");
        assert_eq!(date.to_string(), "12.2005");
    }

    #[test]
    fn legacy_year_boundary() {
        assert_eq!(
            extract_published_date("https://arxiv.org/abs/hep-th/8001001"),
            month(1, 1980)
        );
        assert_eq!(
            extract_published_date("https://arxiv.org/abs/hep-th/7901001"),
            month(1, 2079)
        );
    }

    #[test]
    fn modern_identifier_is_always_2000s() {
        assert_eq!(
            extract_published_date("https://arxiv.org/abs/8001.00001"),
            month(1, 2080)
        );
        assert_eq!(
            extract_published_date("https://arxiv.org/pdf/9912.12345v2").to_string(),
            "12.2099"
        );
    }

    #[test]
    fn empty_or_foreign_url_is_unknown() {
        assert_eq!(extract_published_date(""), PublishedDate::Unknown);
        assert_eq!(
            extract_published_date("https://example.com/abs/2301.01234"),
            PublishedDate::Unknown
        );
        assert_eq!(extract_published_date("not a url"), PublishedDate::Unknown);
    }

    #[test]
    fn malformed_identifier_is_unknown() {
        assert_eq!(
            extract_published_date("https://arxiv.org/abs/ab01.01234"),
            PublishedDate::Unknown
        );
        assert_eq!(
            extract_published_date("https://arxiv.org/abs/2"),
            PublishedDate::Unknown
        );
        assert_eq!(
            extract_published_date("https://arxiv.org/abs/2313.01234"),
            PublishedDate::Unknown
        );
        assert_eq!(extract_published_date("https://arxiv.org/"), PublishedDate::Unknown);
    }

    #[test]
    fn subdomain_is_accepted() {
        assert_eq!(
            extract_published_date("https://export.arxiv.org/abs/2204.00001"),
            month(4, 2022)
        );
    }

    #[test]
    fn parses_display_form() {
        assert_eq!("06.2022".parse::<PublishedDate>().unwrap(), month(6, 2022));
        assert_eq!(
            UNKNOWN_DATE.parse::<PublishedDate>().unwrap(),
            PublishedDate::Unknown
        );
        assert_eq!("6.2022".parse::<PublishedDate>().unwrap(), PublishedDate::Unknown);
        assert_eq!("13.2022".parse::<PublishedDate>().unwrap(), PublishedDate::Unknown);
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&month(3, 2021)).unwrap();
        assert_eq!(json, r#""03.2021""#);
        let back: PublishedDate = serde_json::from_str(r#""unknown""#).unwrap();
        assert_eq!(back, PublishedDate::Unknown);
    }
}
