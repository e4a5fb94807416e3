use crate::http::configure;
use crate::services::{Catalogs, Library, LiveMatchFeed, LiveMatches, ViewRegistry};
use crate::storage::InMemoryStorage;
use aggregation::{
    Candidate, CandidateKey, CandidateSource, Payload, ResourceId, SessionSettings, SourceError,
    SourceId,
};
use actix_web::web::Data;
use actix_web::{test, App};
use async_trait::async_trait;
use serde_json::{json, Value};
use source_providers::{Catalog, LiveMatch, ProviderError};
use std::sync::Arc;
use std::time::Duration;

struct StreamSourceMock(&'static str);

#[async_trait]
impl CandidateSource for StreamSourceMock {
    fn id(&self) -> SourceId {
        SourceId::from(self.0)
    }

    async fn fetch(&self, resource_id: &ResourceId) -> Result<Vec<Candidate>, SourceError> {
        Ok(vec![Candidate::new(
            self.id(),
            CandidateKey(format!("{}:{}:1", self.0, resource_id)),
            Payload::Embed {
                url: format!("https://embed.example/{}/{}/1", self.0, resource_id),
            },
        )
        .with_metadata("language", "English")])
    }
}

struct EmptyFeed;

#[async_trait]
impl LiveMatchFeed for EmptyFeed {
    async fn fetch(&self) -> Result<Vec<LiveMatch>, ProviderError> {
        Ok(vec![])
    }
}

struct Fixture {
    registry: Arc<ViewRegistry>,
    library: Arc<Library>,
    live_matches: Arc<LiveMatches>,
}

fn fixture() -> Fixture {
    let mut catalogs = Catalogs::default();
    catalogs.insert(Catalog::Streams, Arc::new(StreamSourceMock("alpha")));
    catalogs.insert(Catalog::Streams, Arc::new(StreamSourceMock("bravo")));

    Fixture {
        registry: Arc::new(ViewRegistry::new(
            Arc::new(catalogs),
            SessionSettings {
                timeout: Duration::from_millis(200),
                grace_delay: Duration::from_millis(50),
                ..SessionSettings::default()
            },
        )),
        library: Arc::new(Library::new(Arc::new(InMemoryStorage::new()))),
        live_matches: Arc::new(LiveMatches::new(Arc::new(EmptyFeed))),
    }
}

macro_rules! app {
    ($fixture:expr) => {
        test::init_service(
            App::new()
                .app_data(Data::new(Arc::clone(&$fixture.registry)))
                .app_data(Data::new(Arc::clone(&$fixture.library)))
                .app_data(Data::new(Arc::clone(&$fixture.live_matches)))
                .configure(configure),
        )
        .await
    };
}

#[actix_rt::test]
async fn test_health_check() {
    let fixture = fixture();
    let app = app!(fixture);

    let response = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;

    assert!(response.status().is_success());
}

#[actix_rt::test]
async fn test_request_then_wait_for_candidates() {
    let fixture = fixture();
    let app = app!(fixture);

    let request = test::TestRequest::put()
        .uri("/views/main/request")
        .set_json(json!({ "catalog": "streams", "resource_id": "arsenal-vs-chelsea" }))
        .to_request();
    let snapshot: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!("arsenal-vs-chelsea", snapshot["resource_id"]);
    assert_eq!(2, snapshot["total_sources"]);

    let mut snapshot = snapshot;
    for _ in 0..10 {
        if snapshot["completed_sources"] == 2 {
            break;
        }
        let request = test::TestRequest::get()
            .uri("/views/main?wait_ms=500")
            .to_request();
        snapshot = test::call_and_read_body_json(&app, request).await;
    }

    assert_eq!(2, snapshot["completed_sources"]);
    assert_eq!("has_candidates", snapshot["state"]["kind"]);
    assert_eq!(2, snapshot["candidates"].as_array().map(Vec::len).unwrap_or(0));
    assert_eq!("iframe", snapshot["active"]["element"]);
}

#[actix_rt::test]
async fn test_source_ids_route_each_source_to_its_own_match() {
    let fixture = fixture();
    let app = app!(fixture);

    let request = test::TestRequest::put()
        .uri("/views/live/request")
        .set_json(json!({
            "catalog": "streams",
            "resource_id": "arsenal-vs-chelsea",
            "source_ids": { "bravo": "ars-che-8812" }
        }))
        .to_request();
    let mut snapshot: Value = test::call_and_read_body_json(&app, request).await;

    for _ in 0..10 {
        if snapshot["completed_sources"] == 2 {
            break;
        }
        let request = test::TestRequest::get()
            .uri("/views/live?wait_ms=500")
            .to_request();
        snapshot = test::call_and_read_body_json(&app, request).await;
    }

    let mut keys: Vec<_> = snapshot["candidates"]
        .as_array()
        .map(|candidates| {
            candidates
                .iter()
                .filter_map(|candidate| candidate["key"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default();
    keys.sort();

    assert_eq!(vec!["alpha:arsenal-vs-chelsea:1", "bravo:ars-che-8812:1"], keys);
}

#[actix_rt::test]
async fn test_invalid_source_id_is_rejected() {
    let fixture = fixture();
    let app = app!(fixture);

    let request = test::TestRequest::put()
        .uri("/views/live/request")
        .set_json(json!({
            "catalog": "streams",
            "resource_id": "arsenal-vs-chelsea",
            "source_ids": { "bravo": "../admin" }
        }))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!(0, fixture.registry.open_views().await);
}

#[actix_rt::test]
async fn test_invalid_resource_id_is_rejected() {
    let fixture = fixture();
    let app = app!(fixture);

    let request = test::TestRequest::put()
        .uri("/views/main/request")
        .set_json(json!({ "catalog": "streams", "resource_id": "../../etc/passwd" }))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!(0, fixture.registry.open_views().await);
}

#[actix_rt::test]
async fn test_select_status_codes() {
    let fixture = fixture();
    let app = app!(fixture);

    let request = test::TestRequest::post()
        .uri("/views/idle/select")
        .set_json(json!({ "key": "alpha:m:1" }))
        .to_request();
    assert_eq!(409, test::call_service(&app, request).await.status().as_u16());

    let request = test::TestRequest::put()
        .uri("/views/main/request")
        .set_json(json!({ "catalog": "streams", "resource_id": "m" }))
        .to_request();
    test::call_service(&app, request).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let request = test::TestRequest::post()
        .uri("/views/main/select")
        .set_json(json!({ "key": "zulu:m:1" }))
        .to_request();
    assert_eq!(404, test::call_service(&app, request).await.status().as_u16());

    let request = test::TestRequest::post()
        .uri("/views/main/select")
        .set_json(json!({ "key": "bravo:m:1" }))
        .to_request();
    let snapshot: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!("bravo:m:1", snapshot["state"]["chosen"]);
}

#[actix_rt::test]
async fn test_close_view_returns_no_content() {
    let fixture = fixture();
    let app = app!(fixture);

    let request = test::TestRequest::put()
        .uri("/views/main/request")
        .set_json(json!({ "catalog": "streams", "resource_id": "m" }))
        .to_request();
    test::call_service(&app, request).await;

    let request = test::TestRequest::delete().uri("/views/main").to_request();
    assert_eq!(204, test::call_service(&app, request).await.status().as_u16());
    assert_eq!(0, fixture.registry.open_views().await);
}

#[actix_rt::test]
async fn test_library_routes() {
    let fixture = fixture();
    let app = app!(fixture);

    let request = test::TestRequest::post()
        .uri("/library/wishlist")
        .set_json(json!({ "catalog": "episodes", "resource_id": "frieren/episode-1", "title": "Frieren" }))
        .to_request();
    assert_eq!(204, test::call_service(&app, request).await.status().as_u16());

    let request = test::TestRequest::get().uri("/library/wishlist").to_request();
    let wishlist: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!("frieren/episode-1", wishlist[0]["resource_id"]);
    assert_eq!("episodes", wishlist[0]["catalog"]);

    let request = test::TestRequest::delete()
        .uri("/library/wishlist/episodes/frieren/episode-1")
        .to_request();
    assert_eq!(204, test::call_service(&app, request).await.status().as_u16());
    assert!(fixture.library.wishlist().await.unwrap().is_empty());

    let request = test::TestRequest::post()
        .uri("/library/history")
        .set_json(json!({ "catalog": "torrents", "resource_id": "tt0133093" }))
        .to_request();
    assert_eq!(204, test::call_service(&app, request).await.status().as_u16());
    assert_eq!(1, fixture.library.history().await.unwrap().len());
}

#[actix_rt::test]
async fn test_theme_round_trip() {
    let fixture = fixture();
    let app = app!(fixture);

    let request = test::TestRequest::get().uri("/preferences/theme").to_request();
    let theme: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(json!({ "theme": "dark" }), theme);

    let request = test::TestRequest::put()
        .uri("/preferences/theme")
        .set_json(json!({ "theme": "light" }))
        .to_request();
    test::call_service(&app, request).await;

    let request = test::TestRequest::get().uri("/preferences/theme").to_request();
    let theme: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(json!({ "theme": "light" }), theme);
}

#[actix_rt::test]
async fn test_live_matches_start_empty() {
    let fixture = fixture();
    let app = app!(fixture);

    let request = test::TestRequest::get().uri("/live").to_request();
    let matches: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(json!([]), matches);
}
