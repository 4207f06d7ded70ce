//! Published-date token used as the filename prefix.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::trace;

/// Literal prefix used when no date can be found.
pub const UNKNOWN_DATE: &str = "unknown_date";

#[allow(clippy::expect_used)]
static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4})-(\d{2})-(\d{2})").expect("date regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static PUBLISHED_MARKER: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".post__published").expect("published selector is valid")
});

/// Date a post was published, normalized to `YY.M.D`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishedDate {
    /// A date was found on the page.
    Known {
        /// Full four-digit year.
        year: u16,
        /// Month as written (no range validation).
        month: u8,
        /// Day as written (no range validation).
        day: u8,
    },
    /// No marker element or no `YYYY-MM-DD` in it.
    Unknown,
}

impl PublishedDate {
    /// Extracts the first `YYYY-MM-DD` occurrence in `text`.
    ///
    /// ```
    /// use assetgrab_core::resolver::PublishedDate;
    ///
    /// assert_eq!(PublishedDate::from_text("Published: 2024-03-07 12:00").to_string(), "24.3.7");
    /// assert_eq!(PublishedDate::from_text("yesterday").to_string(), "unknown_date");
    /// ```
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let Some(caps) = ISO_DATE.captures(text) else {
            return Self::Unknown;
        };
        let year = caps[1].parse::<u16>();
        let month = caps[2].parse::<u8>();
        let day = caps[3].parse::<u8>();
        match (year, month, day) {
            (Ok(year), Ok(month), Ok(day)) => Self::Known { year, month, day },
            _ => Self::Unknown,
        }
    }

    /// Reads the date from the first element marked as the "post published" indicator.
    #[must_use]
    pub fn from_document(document: &Html) -> Self {
        let Some(marker) = document.select(&PUBLISHED_MARKER).next() else {
            trace!("no published marker in document");
            return Self::Unknown;
        };
        let text: String = marker.text().collect();
        Self::from_text(&text)
    }
}

impl fmt::Display for PublishedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known { year, month, day } => write!(f, "{:02}.{month}.{day}", year % 100),
            Self::Unknown => f.write_str(UNKNOWN_DATE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_normalizes_year_month_day() {
        assert_eq!(PublishedDate::from_text("2024-03-07").to_string(), "24.3.7");
        assert_eq!(PublishedDate::from_text("2023-12-25").to_string(), "23.12.25");
    }

    #[test]
    fn test_from_text_keeps_two_digit_year_padding() {
        assert_eq!(PublishedDate::from_text("2007-01-09").to_string(), "07.1.9");
        assert_eq!(PublishedDate::from_text("2000-10-01").to_string(), "00.10.1");
    }

    #[test]
    fn test_from_text_uses_first_match() {
        let text = "Published: 2021-05-04 Edited: 2022-06-07";
        assert_eq!(PublishedDate::from_text(text).to_string(), "21.5.4");
    }

    #[test]
    fn test_from_text_without_iso_date_is_unknown() {
        assert_eq!(PublishedDate::from_text(""), PublishedDate::Unknown);
        assert_eq!(PublishedDate::from_text("07/03/2024"), PublishedDate::Unknown);
        assert_eq!(PublishedDate::from_text("2024-3-7").to_string(), "unknown_date");
    }

    #[test]
    fn test_from_document_reads_first_marker_only() {
        let html = r#"<div><div class="post__published">Published: 2024-03-07</div>
            <div class="post__published">Published: 2020-01-01</div></div>"#;
        let document = Html::parse_document(html);
        assert_eq!(PublishedDate::from_document(&document).to_string(), "24.3.7");
    }

    #[test]
    fn test_from_document_marker_with_nested_text() {
        let html = r#"<div class="post__published"><span>Published:</span> <time>2019-11-30</time></div>"#;
        let document = Html::parse_document(html);
        assert_eq!(PublishedDate::from_document(&document).to_string(), "19.11.30");
    }

    #[test]
    fn test_from_document_first_marker_without_date_is_unknown() {
        let html = r#"<div class="post__published">soon</div><div class="post__published">2024-01-01</div>"#;
        let document = Html::parse_document(html);
        assert_eq!(PublishedDate::from_document(&document), PublishedDate::Unknown);
    }

    #[test]
    fn test_from_document_without_marker_is_unknown() {
        let document = Html::parse_document("<p>2024-03-07</p>");
        assert_eq!(PublishedDate::from_document(&document), PublishedDate::Unknown);
    }
}
