use serde_json::json;
use storefront_kit::{
    address::StatsWindow,
    catalog_client::RemoteCatalogClient,
    config::StorefrontConfig,
    errors::FetchError,
    fetcher::CollectionFetcher,
    regen::{
        cache::RegenCache,
        page::{CollectionLoader, CollectionPage},
    },
    types::{Category, Collection},
};
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn client(server: &MockServer) -> RemoteCatalogClient {
    let config = StorefrontConfig::builder()
        .api_base(Url::parse(&server.uri()).unwrap())
        .site_base(Url::parse("https://store.example.com").unwrap())
        .build();

    RemoteCatalogClient::new(config).unwrap()
}

fn apps() -> serde_json::Value {
    json!([
        { "id": "org.gnome.Maps", "name": "Maps", "summary": "Find places around the world" },
        { "id": "org.kde.krita", "name": "Krita", "icon": "https://store.example.com/img/krita.png" }
    ])
}

#[tokio::test]
async fn test_fetch_collection_decodes_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/collection/recently-updated"))
        .respond_with(ResponseTemplate::new(200).set_body_json(apps()))
        .expect(1)
        .mount(&server)
        .await;

    let items = client(&server)
        .fetch_collection(&Collection::RecentlyUpdated)
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, "org.gnome.Maps");
    assert_eq!(items[0].summary.as_deref(), Some("Find places around the world"));
    assert_eq!(items[1].summary, None);
    assert!(items[1].icon.is_some());
}

#[tokio::test]
async fn test_fetch_paginated_category() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/category/Game"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(apps()))
        .expect(1)
        .mount(&server)
        .await;

    let items = client(&server)
        .fetch(&Collection::category_page(Category::Game, 2, 30))
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn test_non_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/popular/30"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server).fetch(&Collection::Popular).await.unwrap_err();

    match err {
        FetchError::Status { status, address } => {
            assert_eq!(status.as_u16(), 503);
            assert!(address.ends_with("/popular/30"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_wrong_shape_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/picks/apps"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "apps": [] })))
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch(&Collection::EditorsPicks)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Decode { .. }));
}

#[tokio::test]
async fn test_empty_identifier_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(apps()))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch(&Collection::Developer(String::new()))
        .await
        .unwrap_err();

    assert!(err.is_local());
}

#[tokio::test]
async fn test_feed_is_returned_as_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<rss version=\"2.0\"></rss>"))
        .mount(&server)
        .await;

    let feed = client(&server).feed_new().await.unwrap();
    assert!(feed.starts_with("<rss"));
}

#[tokio::test]
async fn test_regenerated_page_fetches_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/collection/recently-added"))
        .respond_with(ResponseTemplate::new(200).set_body_json(apps()))
        .expect(1)
        .mount(&server)
        .await;

    let cache = RegenCache::new(CollectionLoader(client(&server)));
    let page = CollectionPage::builder()
        .collection(Collection::RecentlyAdded)
        .cache(cache.clone())
        .build();

    let first = page.props("en").await.unwrap();
    let second = page.props("de").await.unwrap();

    assert_eq!(first.applications.len(), 2);
    assert_eq!(second.translations.locale, "de");
    assert_eq!(cache.stats().misses, 1);
    assert_eq!(cache.stats().hits, 1);
}

#[tokio::test]
async fn test_app_stats_window_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats/org.gnome.Maps"))
        .and(query_param("days", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "installs_total": 42 })))
        .expect(1)
        .mount(&server)
        .await;

    let stats = client(&server)
        .app_stats_window("org.gnome.Maps", StatsWindow::Days(7))
        .await
        .unwrap();

    assert_eq!(stats["installs_total"], json!(42));
}

#[tokio::test]
async fn test_health_and_compat_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "OK" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/compat/apps/search/maps"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "flatpakAppId": "org.gnome.Maps", "name": "Maps" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);

    assert_eq!(client.health().await.unwrap()["status"], json!("OK"));

    let results = client.compat_search("maps").await.unwrap();
    assert_eq!(results[0]["flatpakAppId"], json!("org.gnome.Maps"));
}

#[tokio::test]
async fn test_dot_segment_identifier_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server);

    let err = client.app_details("..").await.unwrap_err();
    assert!(err.is_local());

    let err = client.fetch(&Collection::Search(".".to_string())).await.unwrap_err();
    assert!(err.is_local());
}
