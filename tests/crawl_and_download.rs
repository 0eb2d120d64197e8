//! End-to-end crawl and download against a mock Patreon server.

use patreon_crawler::{
    CrawlOptions, Crawler, DownloadQueue, GroupingStrategy, PatreonApi, QueueOptions,
};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COOKIE: &str = "session_id=test";

fn post_json(id: &str, title: &str, viewable: bool, media: &[&str]) -> Value {
    json!({
        "id": id,
        "type": "post",
        "attributes": {
            "title": title,
            "current_user_can_view": viewable,
            "post_metadata": { "image_order": media }
        }
    })
}

fn media_json(server: &MockServer, id: &str) -> Value {
    json!({
        "id": id,
        "type": "media",
        "attributes": {
            "mimetype": "image/jpeg",
            "download_url": format!("{}/media/{}", server.uri(), id),
            "metadata": { "dimensions": { "w": 1024, "h": 768 } }
        }
    })
}

fn feed(posts: Vec<Value>, included: Vec<Value>, next: Option<&str>, total: u64) -> Value {
    json!({
        "data": posts,
        "included": included,
        "meta": { "pagination": { "cursors": { "next": next }, "total": total } }
    })
}

async fn mount_landing_page(server: &MockServer, creator: &str) {
    let html = r#"<html><img src="https://c10.patreonusercontent.com/4/patreon-media/p/campaign/4242/abc/avatar.png"></html>"#;
    Mock::given(method("GET"))
        .and(path(format!("/{}", creator)))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_media(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/media/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"JPEGDATA".to_vec()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_two_page_crawl_and_download() {
    let server = MockServer::start().await;
    mount_landing_page(&server, "artist").await;
    mount_media(&server).await;

    let first_page = feed(
        vec![
            post_json("p1", "Single", true, &["m1"]),
            post_json("p2", "Triple Set", true, &["m2", "m3", "m4"]),
        ],
        vec![
            media_json(&server, "m1"),
            media_json(&server, "m2"),
            media_json(&server, "m3"),
            media_json(&server, "m4"),
        ],
        Some("cursor-2"),
        4,
    );
    let second_page = feed(
        vec![
            post_json("p3", "Another", true, &["m5"]),
            post_json("p4", "Locked", false, &["m6"]),
        ],
        vec![media_json(&server, "m5"), media_json(&server, "m6")],
        None,
        4,
    );

    Mock::given(method("GET"))
        .and(path("/api/posts"))
        .and(query_param("page[cursor]", "cursor-2"))
        .and(header("cookie", COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_json(second_page))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/posts"))
        .and(query_param("filter[campaign_id]", "4242"))
        .and(header("cookie", COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_json(first_page))
        .expect(1)
        .mount(&server)
        .await;

    let api = PatreonApi::with_base_url(COOKIE, &server.uri()).unwrap();
    let mut crawler = Crawler::new(api.clone(), "artist", CrawlOptions::default());
    crawler.load_all().await.unwrap();

    assert!(crawler.all_loaded());
    assert_eq!(crawler.state().inaccessible_count, 1);
    assert_eq!(crawler.accessible_total(), 3);
    let posts = crawler.into_posts();
    let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2", "p3"]);

    let dir = tempfile::tempdir().unwrap();
    let queue = DownloadQueue::new(
        api,
        dir.path(),
        QueueOptions {
            max_in_flight: 2,
            grouping: GroupingStrategy::Dynamic,
            ..Default::default()
        },
    );
    assert_eq!(queue.enqueue(&posts), 5);
    let stats = queue.wait_finish().await;

    assert_eq!(stats.completed, 5);
    assert_eq!(stats.failed, 0);
    assert!(dir.path().join("m1.jpeg").exists());
    assert!(dir.path().join("m5.jpeg").exists());
    for id in ["m2", "m3", "m4"] {
        let file = dir.path().join("Triple Set").join(format!("{}.jpeg", id));
        assert_eq!(std::fs::read(file).unwrap(), b"JPEGDATA");
    }
    assert!(!dir.path().join("m6.jpeg").exists());
}

#[tokio::test]
async fn test_post_cap_stops_after_first_page() {
    let server = MockServer::start().await;
    mount_landing_page(&server, "artist").await;

    let page = feed(
        vec![
            post_json("p1", "One", true, &[]),
            post_json("p2", "Two", true, &[]),
            post_json("p3", "Three", true, &[]),
        ],
        vec![],
        Some("more"),
        30,
    );
    Mock::given(method("GET"))
        .and(path("/api/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page))
        .expect(1)
        .mount(&server)
        .await;

    let api = PatreonApi::with_base_url(COOKIE, &server.uri()).unwrap();
    let options = CrawlOptions {
        max_posts: Some(2),
        download_inaccessible: false,
    };
    let mut crawler = Crawler::new(api, "artist", options);
    crawler.load_all().await.unwrap();

    let ids: Vec<_> = crawler.posts().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2"]);
    assert_eq!(crawler.state().capped_count, 1);
    assert!(crawler.all_loaded());
}

#[tokio::test]
async fn test_unknown_creator() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nobody"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/posts"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let api = PatreonApi::with_base_url(COOKIE, &server.uri()).unwrap();
    let mut crawler = Crawler::new(api, "nobody", CrawlOptions::default());

    let err = crawler.load_all().await.unwrap_err();
    assert!(matches!(err, patreon_crawler::Error::CampaignNotFound(_)));
    assert!(crawler.posts().is_empty());
}

#[tokio::test]
async fn test_expired_session_keeps_loaded_posts() {
    let server = MockServer::start().await;
    mount_landing_page(&server, "artist").await;

    Mock::given(method("GET"))
        .and(path("/api/posts"))
        .and(query_param("page[cursor]", "next"))
        .respond_with(ResponseTemplate::new(401))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed(
            vec![post_json("p1", "One", true, &[])],
            vec![],
            Some("next"),
            2,
        )))
        .mount(&server)
        .await;

    let api = PatreonApi::with_base_url(COOKIE, &server.uri()).unwrap();
    let mut crawler = Crawler::new(api, "artist", CrawlOptions::default());

    let err = crawler.load_all().await.unwrap_err();
    assert!(matches!(
        err.root(),
        patreon_crawler::Error::Authentication(_)
    ));
    assert_eq!(crawler.posts().len(), 1);
}
