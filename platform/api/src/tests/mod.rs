use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use common::context::{Context, Handler};
use common::logging;
use hyper::client::HttpConnector;
use hyper::{Body, Client, Method, Request, StatusCode};

use crate::config::AppConfig;
use crate::flights::{FlightError, FlightProvider, FlightState};
use crate::global::GlobalState;
use crate::store::memory::{MemoryCatalog, MemoryMediaStore};
use crate::store::CatalogStore;
use crate::text::{TextGenerator, DEFAULT_QUOTE, DEFAULT_TAGLINE};
use crate::{api, store};

mod config;

struct StaticText;

#[async_trait]
impl TextGenerator for StaticText {
    async fn generate_tagline(&self) -> Result<String> {
        Ok("Arrive before the hour does.".to_owned())
    }

    async fn generate_quote(&self) -> Result<String> {
        Ok("Time rewards the ones who move.".to_owned())
    }
}

struct FailingText;

#[async_trait]
impl TextGenerator for FailingText {
    async fn generate_tagline(&self) -> Result<String> {
        anyhow::bail!("provider down")
    }

    async fn generate_quote(&self) -> Result<String> {
        anyhow::bail!("provider down")
    }
}

struct StaticFlights;

#[async_trait]
impl FlightProvider for StaticFlights {
    async fn flights(&self, airport: &str) -> Result<Vec<FlightState>, FlightError> {
        match airport.to_ascii_uppercase().as_str() {
            "HYD" => Ok(vec![FlightState {
                id: "800c42".to_owned(),
                callsign: Some("AIC840".to_owned()),
                origin_country: "N/A".to_owned(),
                on_ground: false,
            }]),
            _ => Err(FlightError::UnsupportedAirport(airport.to_owned())),
        }
    }
}

struct BrokenFlights;

#[async_trait]
impl FlightProvider for BrokenFlights {
    async fn flights(&self, _: &str) -> Result<Vec<FlightState>, FlightError> {
        Err(FlightError::Upstream(anyhow::anyhow!("opensky timeout")))
    }
}

struct TestHarness {
    addr: SocketAddr,
    client: Client<HttpConnector>,
    catalog: Arc<MemoryCatalog>,
    media: Arc<MemoryMediaStore>,
    handler: Handler,
    handle: tokio::task::JoinHandle<Result<()>>,
}

impl TestHarness {
    async fn new(text: Arc<dyn TextGenerator>, flights: Arc<dyn FlightProvider>) -> Self {
        logging::init("api=debug", logging::Mode::Default).expect("failed to initialize logging");

        let port = portpicker::pick_unused_port().expect("no free ports");
        let addr: SocketAddr = format!("127.0.0.1:{port}").parse().expect("failed to parse addr");

        let mut config = AppConfig::default();
        config.api.bind_address = addr;

        let catalog = Arc::new(MemoryCatalog::default());
        let media = Arc::new(MemoryMediaStore::default());

        let (ctx, handler) = Context::new();

        let global = Arc::new(GlobalState::new(
            config,
            ctx,
            catalog.clone() as Arc<dyn store::CatalogStore>,
            media.clone() as Arc<dyn store::MediaStore>,
            text,
            flights,
        ));

        let handle = tokio::spawn(api::run(global));

        // We need to wait for the server to start
        tokio::time::sleep(Duration::from_millis(300)).await;

        Self {
            addr,
            client: Client::new(),
            catalog,
            media,
            handler,
            handle,
        }
    }

    fn uri(&self, path_and_query: &str) -> hyper::Uri {
        format!("http://{}{}", self.addr, path_and_query)
            .parse()
            .expect("failed to parse uri")
    }

    async fn get_json(&self, path_and_query: &str) -> (StatusCode, serde_json::Value) {
        let resp = self.client.get(self.uri(path_and_query)).await.expect("request failed");
        let status = resp.status();
        let body = hyper::body::to_bytes(resp.into_body()).await.expect("failed to read body");
        (status, serde_json::from_slice(&body).expect("body is not json"))
    }

    async fn upload(&self, query: &str, body: &'static [u8]) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method(Method::POST)
            .uri(self.uri(&format!("/upload{query}")))
            .body(Body::from(body))
            .expect("failed to build request");

        let resp = self.client.request(req).await.expect("request failed");
        let status = resp.status();
        let body = hyper::body::to_bytes(resp.into_body()).await.expect("failed to read body");
        (status, serde_json::from_slice(&body).expect("body is not json"))
    }

    async fn shutdown(self) {
        // The client uses Keep-Alive, so we need to drop it to release the global context
        drop(self.client);

        tokio::time::timeout(Duration::from_secs(1), self.handler.cancel())
            .await
            .expect("failed to cancel context");
        tokio::time::timeout(Duration::from_secs(1), self.handle)
            .await
            .expect("failed to cancel api")
            .expect("api failed")
            .expect("api failed");
    }
}

async fn harness() -> TestHarness {
    TestHarness::new(Arc::new(StaticText), Arc::new(StaticFlights)).await
}

#[tokio::test]
async fn test_health() {
    let harness = harness().await;

    let resp = harness.client.get(harness.uri("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = hyper::body::to_bytes(resp.into_body()).await.unwrap();
    assert_eq!(body, "OK");

    harness.shutdown().await;
}

#[tokio::test]
async fn test_upload_requires_filename() {
    let harness = harness().await;

    let (status, body) = harness.upload("", b"some bytes").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = harness.upload("?filename=", b"some bytes").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // a rejected upload must not touch either store
    assert_eq!(harness.media.blob_count(), 0);
    assert!(harness.catalog.list().await.unwrap().is_empty());

    harness.shutdown().await;
}

#[tokio::test]
async fn test_upload_requires_body() {
    let harness = harness().await;

    let (status, body) = harness.upload("?filename=clock.mp4", b"").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    assert_eq!(harness.media.blob_count(), 0);
    assert!(harness.catalog.list().await.unwrap().is_empty());

    harness.shutdown().await;
}

#[tokio::test]
async fn test_upload_and_list() {
    let harness = harness().await;

    let (status, blob) = harness.upload("?filename=night.flight.mp4", b"first video").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(blob["pathname"], "night.flight.mp4");
    assert_eq!(blob["size"], 11);
    assert!(blob["url"].as_str().unwrap().ends_with("/night.flight.mp4"));

    let (status, _) = harness.upload("?filename=lounge.webm", b"second video").await;
    assert_eq!(status, StatusCode::OK);

    let records = harness.catalog.list().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title, "night.flight");
    assert_eq!(records[1].title, "lounge");
    assert_ne!(records[0].id, records[1].id);

    let (status, body) = harness.get_json("/videos").await;
    assert_eq!(status, StatusCode::OK);
    let videos = body["videos"].as_array().unwrap();
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0]["title"], "night.flight");
    assert_eq!(videos[1]["title"], "lounge");

    harness.shutdown().await;
}

#[tokio::test]
async fn test_videos_empty_catalog() {
    let harness = harness().await;

    let (status, body) = harness.get_json("/videos").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["videos"], serde_json::json!([]));

    harness.shutdown().await;
}

#[tokio::test]
async fn test_videos_store_failure() {
    let harness = harness().await;

    harness.catalog.set_failing(true);

    let (status, body) = harness.get_json("/videos").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());

    harness.shutdown().await;
}

#[tokio::test]
async fn test_upload_media_store_failure() {
    let harness = harness().await;

    harness.media.set_failing(true);

    let (status, body) = harness.upload("?filename=clock.mp4", b"bytes").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());

    // the catalog must not reference a blob that was never stored
    assert!(harness.catalog.list().await.unwrap().is_empty());

    harness.shutdown().await;
}

#[tokio::test]
async fn test_upload_catalog_failure() {
    let harness = harness().await;

    harness.catalog.set_failing(true);

    let (status, body) = harness.upload("?filename=clock.mp4", b"bytes").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());

    harness.shutdown().await;
}

#[tokio::test]
async fn test_concurrent_uploads_preserved() {
    let harness = harness().await;

    let mut handles = Vec::new();
    for i in 0..10 {
        let client = harness.client.clone();
        let uri = harness.uri(&format!("/upload?filename=video-{i}.mp4"));
        handles.push(tokio::spawn(async move {
            let req = Request::builder()
                .method(Method::POST)
                .uri(uri)
                .body(Body::from("payload"))
                .unwrap();
            client.request(req).await.unwrap().status()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    // every append survives, no read-modify-write lost updates
    assert_eq!(harness.catalog.list().await.unwrap().len(), 10);

    harness.shutdown().await;
}

#[tokio::test]
async fn test_tagline_and_quote() {
    let harness = harness().await;

    let (status, body) = harness.get_json("/tagline").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tagline"], "Arrive before the hour does.");

    let (status, body) = harness.get_json("/quote").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quote"], "Time rewards the ones who move.");

    harness.shutdown().await;
}

#[tokio::test]
async fn test_text_falls_back_to_defaults() {
    let harness = TestHarness::new(Arc::new(FailingText), Arc::new(StaticFlights)).await;

    let (status, body) = harness.get_json("/tagline").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tagline"], DEFAULT_TAGLINE);

    let (status, body) = harness.get_json("/quote").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quote"], DEFAULT_QUOTE);

    harness.shutdown().await;
}

#[tokio::test]
async fn test_flights() {
    let harness = harness().await;

    let (status, body) = harness.get_json("/flights?airport=HYD").await;
    assert_eq!(status, StatusCode::OK);
    let flights = body["flights"].as_array().unwrap();
    assert_eq!(flights.len(), 1);
    assert_eq!(flights[0]["id"], "800c42");
    assert_eq!(flights[0]["origin_country"], "N/A");
    assert_eq!(flights[0]["on_ground"], false);

    harness.shutdown().await;
}

#[tokio::test]
async fn test_flights_unsupported_airport() {
    let harness = harness().await;

    let (status, body) = harness.get_json("/flights?airport=JFK").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = harness.get_json("/flights").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    harness.shutdown().await;
}

#[tokio::test]
async fn test_flights_upstream_failure() {
    let harness = TestHarness::new(Arc::new(StaticText), Arc::new(BrokenFlights)).await;

    let (status, body) = harness.get_json("/flights?airport=HYD").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].is_string());

    harness.shutdown().await;
}

#[tokio::test]
async fn test_not_found() {
    let harness = harness().await;

    let (status, body) = harness.get_json("/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    harness.shutdown().await;
}

#[tokio::test]
async fn test_cors_headers() {
    let harness = harness().await;

    let resp = harness.client.get(harness.uri("/videos")).await.unwrap();
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");

    harness.shutdown().await;
}
