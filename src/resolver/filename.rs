//! Filename fallback chain for a matched anchor.
//!
//! Posts encode the real attachment name inconsistently, so candidates are
//! tried in a fixed order and the first non-empty one wins:
//!
//! 1. `download` attribute (trimmed)
//! 2. `title` attribute (trimmed)
//! 3. `f` query parameter of the href (percent-decoded)
//! 4. nested `post__attachment-name` element text (trimmed)
//! 5. last path segment of the absolute URL (percent-decoded)

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};
use url::Url;

#[allow(clippy::expect_used)]
static F_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[?&]f=([^&#]+)").expect("f= regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static ATTACHMENT_NAME: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span.post__attachment-name, div.post__attachment-name")
        .expect("attachment selector is valid")
});

/// Which candidate produced the filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    /// The anchor's `download` attribute.
    DownloadAttr,
    /// The anchor's `title` attribute.
    TitleAttr,
    /// The `f` query parameter.
    QueryParam,
    /// A nested attachment-name element.
    AttachmentName,
    /// The URL's last path segment.
    UrlPath,
}

/// Resolves the filename for `anchor`, whose raw `href` joined to `absolute`.
#[must_use]
pub fn resolve_filename(anchor: ElementRef<'_>, href: &str, absolute: &Url) -> (String, NameSource) {
    if let Some(name) = trimmed_attr(anchor, "download") {
        return (name, NameSource::DownloadAttr);
    }
    if let Some(name) = trimmed_attr(anchor, "title") {
        return (name, NameSource::TitleAttr);
    }
    if let Some(name) = query_param_f(href) {
        return (name, NameSource::QueryParam);
    }
    if let Some(name) = attachment_name(anchor) {
        return (name, NameSource::AttachmentName);
    }
    (url_basename(absolute), NameSource::UrlPath)
}

fn trimmed_attr(anchor: ElementRef<'_>, name: &str) -> Option<String> {
    anchor
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

/// Percent-decoded value of the first `f` query parameter in a raw href.
#[must_use]
pub fn query_param_f(href: &str) -> Option<String> {
    let raw = F_PARAM.captures(href)?.get(1)?.as_str();
    let decoded = percent_decode(raw);
    (!decoded.is_empty()).then_some(decoded)
}

fn attachment_name(anchor: ElementRef<'_>) -> Option<String> {
    let element = anchor.select(&ATTACHMENT_NAME).next()?;
    let text: String = element.text().collect();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Percent-decoded last path segment of `url`.
#[must_use]
pub fn url_basename(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .map(percent_decode)
        .unwrap_or_default()
}

/// Decodes `%XX` escapes; invalid UTF-8 is replaced rather than rejected. `+` stays as is.
fn percent_decode(raw: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use scraper::{Html, Selector};

    use super::*;

    fn resolve_first(html: &str) -> (String, NameSource) {
        let document = Html::parse_document(html);
        let selector = Selector::parse("a[href]").unwrap();
        let anchor = document.select(&selector).next().unwrap();
        let href = anchor.value().attr("href").unwrap();
        let base = Url::parse("https://site.example/post/1").unwrap();
        let absolute = base.join(href).unwrap();
        resolve_filename(anchor, href, &absolute)
    }

    #[test]
    fn test_download_attr_wins() {
        let html = r#"<a href="/a/b.mp4?f=q.mp4" download=" dl.mp4 " title="t.mp4">x</a>"#;
        assert_eq!(
            resolve_first(html),
            ("dl.mp4".to_string(), NameSource::DownloadAttr)
        );
    }

    #[test]
    fn test_blank_download_falls_to_title() {
        let html = r#"<a href="/a/b.mp4" download="  " title=" Title Name.mp4 ">x</a>"#;
        assert_eq!(
            resolve_first(html),
            ("Title Name.mp4".to_string(), NameSource::TitleAttr)
        );
    }

    #[test]
    fn test_query_param_is_decoded() {
        let html = r#"<a href="/a/b.mp4?f=Real%20Name.mp4">x</a>"#;
        assert_eq!(
            resolve_first(html),
            ("Real Name.mp4".to_string(), NameSource::QueryParam)
        );
    }

    #[test]
    fn test_query_param_after_other_params() {
        assert_eq!(
            query_param_f("/a/b.mp4?x=1&f=%E5%8B%95%E7%94%BB.mp4&y=2").as_deref(),
            Some("動画.mp4")
        );
        assert_eq!(query_param_f("/a/b.mp4?ref=1"), None);
        assert_eq!(query_param_f("/a/b.mp4?elf=1"), None);
    }

    #[test]
    fn test_attachment_name_element() {
        let html = r#"<a href="/a/b.mp4"><span class="post__attachment-name">
            Attached Clip.mp4 </span></a>"#;
        assert_eq!(
            resolve_first(html),
            ("Attached Clip.mp4".to_string(), NameSource::AttachmentName)
        );
    }

    #[test]
    fn test_attachment_name_ignores_other_tags() {
        let html = r#"<a href="/a/b%20c.mp4"><p class="post__attachment-name">no</p></a>"#;
        assert_eq!(
            resolve_first(html),
            ("b c.mp4".to_string(), NameSource::UrlPath)
        );
    }

    #[test]
    fn test_url_path_fallback_decodes() {
        let html = r#"<a href="https://cdn.example/data/x/My%20Clip.MOV">x</a>"#;
        assert_eq!(
            resolve_first(html),
            ("My Clip.MOV".to_string(), NameSource::UrlPath)
        );
    }

    #[test]
    fn test_url_basename_keeps_plus() {
        let url = Url::parse("https://cdn.example/a+b.mp4").unwrap();
        assert_eq!(url_basename(&url), "a+b.mp4");
    }
}
