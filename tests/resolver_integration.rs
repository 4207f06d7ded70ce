//! Integration tests for link resolution and page analysis.
//!
//! These exercise the public API with realistic post markup, including the
//! saved-page renderer used for offline analysis.

use assetgrab_core::resolver::{AcceptedExtensions, RenderedDocument, UNKNOWN_DATE, resolve};
use assetgrab_core::{LocalFileRenderer, analyze_page};
use tempfile::TempDir;
use url::Url;

const POST_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Post</title></head>
<body>
  <header>
    <div class="post__published">
      <time class="timestamp" datetime="2023-11-05 09:12:00">2023-11-05 09:12:00</time>
    </div>
  </header>
  <div class="post__body">
    <ul class="post__attachments">
      <li class="post__attachment">
        <a class="post__attachment-link" href="https://n1.cdn.example/data/aa/bb/hash1.mp4?f=Episode%2001.mp4" download="Episode 01.mp4">
          Download Episode 01.mp4
        </a>
      </li>
      <li class="post__attachment">
        <a class="post__attachment-link" href="/data/cc/dd/hash2.mov?f=Behind%20the%20scenes.mov">
          Download
        </a>
      </li>
      <li class="post__attachment">
        <a class="post__attachment-link" href="/data/ee/ff/hash3.MP4">
          <span class="post__attachment-name">Trailer.mp4</span>
        </a>
      </li>
      <li class="post__attachment">
        <a class="post__attachment-link" href="/data/gg/hh/notes.pdf">notes</a>
      </li>
      <li class="post__attachment">
        <a class="post__attachment-link" href="/data/ii/jj/raw%20cut.mov">raw</a>
      </li>
    </ul>
  </div>
  <footer><a href="/user/123">creator</a></footer>
</body>
</html>"#;

fn page_url() -> Url {
    Url::parse("https://site.example/service/user/123/post/456").unwrap()
}

#[test]
fn test_post_page_resolves_every_media_attachment_in_order() {
    let links = resolve(POST_PAGE, &page_url(), &AcceptedExtensions::default());

    let names: Vec<_> = links.iter().map(|l| l.display_name.as_str()).collect();
    assert_eq!(
        names,
        [
            "23.11.5 Episode 01.mp4",
            "23.11.5 Behind the scenes.mov",
            "23.11.5 Trailer.mp4",
            "23.11.5 raw cut.mov",
        ]
    );

    let urls: Vec<_> = links.iter().map(|l| l.source_url.as_str()).collect();
    assert_eq!(
        urls,
        [
            "https://n1.cdn.example/data/aa/bb/hash1.mp4?f=Episode%2001.mp4",
            "https://site.example/data/cc/dd/hash2.mov?f=Behind%20the%20scenes.mov",
            "https://site.example/data/ee/ff/hash3.MP4",
            "https://site.example/data/ii/jj/raw%20cut.mov",
        ]
    );
}

#[test]
fn test_every_link_satisfies_extension_and_name_invariants() {
    let exts = AcceptedExtensions::default();
    for link in resolve(POST_PAGE, &page_url(), &exts) {
        let path = link.source_url.path().to_lowercase();
        assert!(
            exts.as_slice().iter().any(|ext| path.ends_with(ext.as_str())),
            "{path} should end with an accepted extension"
        );
        let (date, name) = link.display_name.split_once(' ').unwrap();
        assert!(!date.is_empty());
        assert!(!name.is_empty());
    }
}

#[test]
fn test_resolution_is_deterministic() {
    let doc = RenderedDocument::new(POST_PAGE, page_url());
    let exts = AcceptedExtensions::default();
    assert_eq!(doc.resolve(&exts), doc.resolve(&exts));
}

#[test]
fn test_missing_date_uses_unknown_prefix() {
    let html = r#"<a href="/v/a.mp4">a</a>"#;
    let links = resolve(html, &page_url(), &AcceptedExtensions::default());
    assert_eq!(links[0].display_name, format!("{UNKNOWN_DATE} a.mp4"));
}

#[test]
fn test_custom_extension_list() {
    let exts: AcceptedExtensions = "pdf".parse().unwrap();
    let links = resolve(POST_PAGE, &page_url(), &exts);
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].display_name, "23.11.5 notes.pdf");
}

#[tokio::test]
async fn test_analyze_saved_page() {
    let dir = TempDir::new().unwrap();
    let saved = dir.path().join("post.html");
    std::fs::write(&saved, POST_PAGE).unwrap();

    let renderer = LocalFileRenderer::new(&saved);
    let links = analyze_page(
        &renderer,
        page_url().as_str(),
        &AcceptedExtensions::default(),
    )
    .await
    .unwrap();
    assert_eq!(links.len(), 4);
    assert_eq!(links[2].display_name, "23.11.5 Trailer.mp4");
}
