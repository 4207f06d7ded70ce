//! The set of file extensions treated as downloadable media.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Extensions accepted when no explicit list is configured.
pub const DEFAULT_EXTENSIONS: [&str; 2] = [".mp4", ".mov"];

/// Errors raised when building an [`AcceptedExtensions`] list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtensionError {
    /// No extension was supplied.
    #[error("at least one file extension is required")]
    Empty,

    /// An entry cannot be a file extension.
    #[error("invalid file extension '{value}'\n  Suggestion: use a bare suffix such as .mp4 or mkv")]
    Invalid {
        /// The rejected entry.
        value: String,
    },
}

/// Normalized, ordered, de-duplicated list of lowercase extensions with a leading dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedExtensions {
    extensions: Vec<String>,
}

impl AcceptedExtensions {
    /// Builds a list from user-supplied entries such as `mp4`, `.MOV` or `.webm`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::Empty`] for an empty list and
    /// [`ExtensionError::Invalid`] for entries containing separators,
    /// whitespace or nothing after the dot.
    pub fn new<I, S>(entries: I) -> Result<Self, ExtensionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut extensions: Vec<String> = Vec::new();
        for entry in entries {
            let normalized = normalize(entry.as_ref())?;
            if !extensions.contains(&normalized) {
                extensions.push(normalized);
            }
        }
        if extensions.is_empty() {
            return Err(ExtensionError::Empty);
        }
        Ok(Self { extensions })
    }

    /// Returns the normalized entries.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.extensions
    }

    /// Checks an href against the list.
    ///
    /// Only the path portion counts: anything from the first `?` or `#` on is
    /// ignored, so `clip.mp4?token=x` matches while `/get?file=clip.mp4` does not.
    /// A plain suffix test on the whole href would give the opposite answer
    /// for both.
    #[must_use]
    pub fn matches_href(&self, href: &str) -> bool {
        let path_end = href.find(['?', '#']).unwrap_or(href.len());
        let path = href[..path_end].to_lowercase();
        self.extensions.iter().any(|ext| path.ends_with(ext.as_str()))
    }
}

impl Default for AcceptedExtensions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl FromStr for AcceptedExtensions {
    type Err = ExtensionError;

    /// Parses a comma-separated list, e.g. `mp4,.mov, webm`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.split(',').map(str::trim).filter(|part| !part.is_empty()))
    }
}

impl fmt::Display for AcceptedExtensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extensions.join(","))
    }
}

fn normalize(raw: &str) -> Result<String, ExtensionError> {
    let trimmed = raw.trim();
    let bare = trimmed.strip_prefix('.').unwrap_or(trimmed);
    let valid = !bare.is_empty()
        && !bare
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '\\' | '?' | '#' | '&' | '='));
    if !valid {
        return Err(ExtensionError::Invalid {
            value: raw.to_string(),
        });
    }
    Ok(format!(".{}", bare.to_lowercase()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_mp4_and_mov() {
        let exts = AcceptedExtensions::default();
        assert_eq!(exts.as_slice(), [".mp4", ".mov"]);
        assert_eq!(exts.to_string(), ".mp4,.mov");
    }

    #[test]
    fn test_new_normalizes_and_dedups() {
        let exts = AcceptedExtensions::new(["MP4", ".mp4", " .WebM "]).unwrap();
        assert_eq!(exts.as_slice(), [".mp4", ".webm"]);
    }

    #[test]
    fn test_new_rejects_empty_and_invalid() {
        assert_eq!(
            AcceptedExtensions::new(Vec::<String>::new()),
            Err(ExtensionError::Empty)
        );
        assert!(matches!(
            AcceptedExtensions::new(["."]),
            Err(ExtensionError::Invalid { .. })
        ));
        assert!(matches!(
            AcceptedExtensions::new(["mp4/x"]),
            Err(ExtensionError::Invalid { .. })
        ));
    }

    #[test]
    fn test_from_str_comma_list() {
        let exts: AcceptedExtensions = "mp4, mkv,,".parse().unwrap();
        assert_eq!(exts.as_slice(), [".mp4", ".mkv"]);
        assert_eq!("".parse::<AcceptedExtensions>(), Err(ExtensionError::Empty));
    }

    #[test]
    fn test_matches_href_is_case_insensitive() {
        let exts = AcceptedExtensions::default();
        assert!(exts.matches_href("/data/ab/CLIP.MP4"));
        assert!(exts.matches_href("https://cdn.example.com/x.Mov"));
        assert!(!exts.matches_href("/data/ab/clip.mp3"));
    }

    #[test]
    fn test_matches_href_accepts_trailing_query() {
        let exts = AcceptedExtensions::default();
        assert!(exts.matches_href("/a/b.mp4?f=Real%20Name.mp4"));
        assert!(exts.matches_href("/a/b.mp4?token=abc"));
        assert!(exts.matches_href("/a/b.mov#t=10"));
    }

    #[test]
    fn test_matches_href_ignores_extension_only_in_query() {
        let exts = AcceptedExtensions::default();
        assert!(!exts.matches_href("/download?file=clip.mp4"));
        assert!(!exts.matches_href("/post/1#clip.mp4"));
    }
}
