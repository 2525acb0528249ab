//! Atomic draft-toggle tests: publish/unpublish through the service and
//! the on-disk effects of the rewrite protocol.

mod common;

use common::{ArticleFixture, articles_dir};
use inkpot_core::{ArticleService, CompositeService, Config, Error};
use std::fs;

async fn started_service(dir: &tempfile::TempDir) -> CompositeService {
    let service = CompositeService::new(&Config::new(dir.path())).unwrap();
    service.start().await.unwrap();
    service
}

#[tokio::test]
async fn publish_rewrites_file_and_updates_memory() {
    let dir = articles_dir();
    ArticleFixture::new("x").draft().write_to(dir.path());

    let service = started_service(&dir).await;
    service.publish_draft("x").await.unwrap();

    // On-disk frontmatter reflects the new state.
    let on_disk = fs::read_to_string(dir.path().join("x.md")).unwrap();
    assert!(on_disk.contains("draft: false"));

    // In-memory state agrees and the article joins the published view.
    let article = service.get_article_by_slug("x").await.unwrap();
    assert!(!article.draft);
    assert_eq!(service.get_all_articles().await.unwrap().len(), 1);

    // No transient files survive the swap.
    assert!(!dir.path().join("x.md.tmp").exists());
    assert!(!dir.path().join("x.md.backup").exists());

    // Publishing again is a refused transition.
    assert!(matches!(
        service.publish_draft("x").await,
        Err(Error::Validation(_))
    ));

    service.stop().await;
}

#[tokio::test]
async fn unpublish_hides_article_from_public_view() {
    let dir = articles_dir();
    ArticleFixture::new("y").write_to(dir.path());

    let service = started_service(&dir).await;
    service.unpublish_article("y").await.unwrap();

    assert!(matches!(
        service.get_article_by_slug("y").await,
        Err(Error::NotFound(_))
    ));
    assert!(service.get_draft_by_slug("y").await.is_ok());
    assert!(service.get_all_articles().await.unwrap().is_empty());

    // Search must not surface the now-draft article either.
    let results = service.search_articles("title", 10).await.unwrap();
    assert!(results.is_empty());

    service.stop().await;
}

#[tokio::test]
async fn toggle_round_trip_restores_state_and_unknown_keys() {
    let dir = articles_dir();
    let content = "---\ntitle: Round Trip\nslug: rt\ndate: 2025-01-01\ndraft: true\ncustom_meta: preserved-value\nanother: 7\n---\n\nbody stays\n";
    fs::write(dir.path().join("rt.md"), content).unwrap();

    let service = started_service(&dir).await;
    service.publish_draft("rt").await.unwrap();
    service.unpublish_article("rt").await.unwrap();

    let on_disk = fs::read_to_string(dir.path().join("rt.md")).unwrap();
    assert!(on_disk.contains("draft: true"));
    assert!(on_disk.contains("custom_meta: preserved-value"));
    assert!(on_disk.contains("another: 7"));
    assert!(on_disk.contains("body stays"));

    let article = service.get_draft_by_slug("rt").await.unwrap();
    assert!(article.draft);

    service.stop().await;
}

#[tokio::test]
async fn stats_follow_draft_transitions() {
    let dir = articles_dir();
    ArticleFixture::new("a").write_to(dir.path());
    ArticleFixture::new("b").draft().write_to(dir.path());

    let service = started_service(&dir).await;
    let before = service.get_stats().await.unwrap();
    assert_eq!((before.published_count, before.draft_count), (1, 1));

    service.publish_draft("b").await.unwrap();
    let after = service.get_stats().await.unwrap();
    assert_eq!((after.published_count, after.draft_count), (2, 0));

    service.stop().await;
}

#[tokio::test]
async fn preview_serves_both_drafts_and_published() {
    let dir = articles_dir();
    ArticleFixture::new("pub").write_to(dir.path());
    ArticleFixture::new("drf").draft().write_to(dir.path());

    let service = started_service(&dir).await;
    assert_eq!(service.preview_draft("pub").await.unwrap().slug, "pub");
    assert_eq!(service.preview_draft("drf").await.unwrap().slug, "drf");
    assert!(matches!(
        service.preview_draft("ghost").await,
        Err(Error::NotFound(_))
    ));

    service.stop().await;
}
