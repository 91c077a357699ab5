mod common;

use common::FakePages;
use producthunt_daily::models::Media;
use producthunt_daily::services::ImageResolver;

fn media(url: &str) -> Vec<Media> {
    vec![Media {
        url: Some(url.to_string()),
        media_type: Some("image".to_string()),
        video_url: None,
    }]
}

#[tokio::test]
async fn media_url_wins_without_scraping() {
    let pages = FakePages::serving(r#"<meta property="og:image" content="https://img.test/og.png">"#);
    let resolver = ImageResolver::new(pages.clone()).unwrap();

    let entries = media("https://ph-files.imgix.net/venice.jpeg");
    let image = resolver
        .resolve("Venice", Some(entries.as_slice()), "https://www.producthunt.com/posts/venice-3")
        .await;

    assert_eq!(image.value(), "https://ph-files.imgix.net/venice.jpeg");
    assert!(!image.is_fallback());
    assert_eq!(pages.call_count(), 0);
}

#[tokio::test]
async fn empty_media_scrapes_open_graph_tag() {
    let pages = FakePages::serving(
        r#"<html><head><meta name="twitter:image" content="https://img.test/card.png"><meta property="og:image" content="https://img.test/og.png"></head></html>"#,
    );
    let resolver = ImageResolver::new(pages.clone()).unwrap();

    let image = resolver.resolve("Venice", Some(&[][..]), "https://www.producthunt.com/posts/venice-3").await;
    assert_eq!(image.value(), "https://img.test/og.png");
    assert_eq!(pages.call_count(), 1);
}

#[tokio::test]
async fn media_entry_without_url_falls_through_to_scrape() {
    let pages = FakePages::serving(r#"<meta name="twitter:image" content="https://img.test/card.png">"#);
    let resolver = ImageResolver::new(pages.clone()).unwrap();

    let entries = vec![Media {
        url: Some(String::new()),
        media_type: Some("video".to_string()),
        video_url: Some("https://video.test/v.mp4".to_string()),
    }];
    let image = resolver.resolve("Clip", Some(entries.as_slice()), "https://www.producthunt.com/posts/clip").await;

    assert_eq!(image.value(), "https://img.test/card.png");
    assert_eq!(pages.call_count(), 1);
}

#[tokio::test]
async fn page_without_meta_tags_yields_empty_string() {
    let pages = FakePages::serving("<html><head><title>No images</title></head></html>");
    let resolver = ImageResolver::new(pages.clone()).unwrap();

    let image = resolver.resolve("Bare", None, "https://www.producthunt.com/posts/bare").await;
    assert!(image.is_fallback());
    assert_eq!(image.value(), "");
}

#[tokio::test]
async fn unreachable_page_yields_empty_string() {
    let pages = FakePages::unreachable();
    let resolver = ImageResolver::new(pages.clone()).unwrap();

    let image = resolver.resolve("Offline", None, "https://www.producthunt.com/posts/offline").await;
    assert_eq!(image.into_value(), "");
    assert_eq!(pages.call_count(), 1);
}
