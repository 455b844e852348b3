use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use tower::ServiceExt;

use async_trait::async_trait;
use vlo_core::repository::{DateRange, InMemoryRepository, RecordRepository};
use vlo_core::{
    ContactPerson, CorpusData, Engine, FormatRegistry, MetadataValues, Record, RecordKind,
    RepositoryInfo, Result,
};
use vlo_server::AppState;

const OAI_NS: &str = "http://www.openarchives.org/OAI/2.0/";

fn record() -> Record {
    Record {
        id: 7,
        name: "ortofon_v1".to_string(),
        datestamp: Utc.with_ymd_and_hms(2024, 4, 2, 9, 0, 0).unwrap(),
        title_en: "ORTOFON".to_string(),
        title_cs: "ORTOFON".to_string(),
        description_en: Some("Spoken corpus".to_string()),
        description_cs: None,
        license: "CC BY-NC-SA 4.0".to_string(),
        authors: "Marie Kopřivová".to_string(),
        contact: ContactPerson::default(),
        link: None,
        kind: RecordKind::Corpus(CorpusData::default()),
    }
}

/// Answers like the wrapped repository, but only after `delay`.
struct SlowRepository {
    inner: InMemoryRepository,
    delay: Duration,
}

#[async_trait]
impl RecordRepository for SlowRepository {
    async fn fetch(&self, identifier: &str) -> Result<Option<Record>> {
        tokio::time::sleep(self.delay).await;
        self.inner.fetch(identifier).await
    }

    async fn list(&self, range: &DateRange) -> Result<Vec<Record>> {
        tokio::time::sleep(self.delay).await;
        self.inner.list(range).await
    }

    async fn exists(&self, identifier: &str) -> Result<bool> {
        tokio::time::sleep(self.delay).await;
        self.inner.exists(identifier).await
    }

    async fn earliest_datestamp(&self) -> Result<Option<chrono::DateTime<Utc>>> {
        tokio::time::sleep(self.delay).await;
        self.inner.earliest_datestamp().await
    }
}

fn build_app(repository: impl RecordRepository + 'static, request_timeout: Duration) -> Router {
    let info = RepositoryInfo::new("Test VLO", "https://vlo.example.org");
    let formats = FormatRegistry::standard(&info, &MetadataValues::new("CNC"));
    let engine = Engine::new(Arc::new(repository), formats, info);
    vlo_server::app(AppState::new(engine), request_timeout)
}

fn app_with(repository: InMemoryRepository) -> Router {
    build_app(repository, Duration::from_secs(30))
}

fn app() -> Router {
    app_with(InMemoryRepository::new().with_record(record()))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

fn error_code(body: &str) -> Option<String> {
    let doc = roxmltree::Document::parse(body).unwrap();
    doc.descendants()
        .find(|n| n.has_tag_name((OAI_NS, "error")))
        .and_then(|n| n.attribute("code"))
        .map(String::from)
}

#[tokio::test]
async fn test_identify_over_get() {
    let (status, content_type, body) = get(app(), "/oai?verb=Identify").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/xml; charset=utf-8"));
    assert!(body.starts_with("<?xml"));

    let doc = roxmltree::Document::parse(&body).unwrap();
    let earliest = doc
        .descendants()
        .find(|n| n.has_tag_name((OAI_NS, "earliestDatestamp")))
        .and_then(|n| n.text());
    assert_eq!(earliest, Some("2024-04-02T09:00:00Z"));
}

#[tokio::test]
async fn test_list_records_over_post() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/oai")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("verb=ListRecords&metadataPrefix=cmdi"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(body.contains("cmd:CMD"));
    assert!(body.contains("sp_7"));
}

#[tokio::test]
async fn test_protocol_error_statuses() {
    let (status, _, body) = get(app(), "/oai?verb=Nonsense").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body).as_deref(), Some("badVerb"));

    let (status, _, body) =
        get(app(), "/oai?verb=GetRecord&identifier=99&metadataPrefix=oai_dc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body).as_deref(), Some("idDoesNotExist"));

    let (status, _, body) = get(app(), "/oai?verb=ListSets").await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(error_code(&body).as_deref(), Some("noSetHierarchy"));

    let (status, _, body) = get(
        app(),
        "/oai?verb=ListIdentifiers&metadataPrefix=oai_dc&until=2000-01-01",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(error_code(&body).as_deref(), Some("noRecordsMatch"));
}

#[tokio::test]
async fn test_internal_failures_have_no_body() {
    let (status, _, body) = get(
        app(),
        "/oai?verb=ListRecords&metadataPrefix=oai_dc&from=not-a-date",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.is_empty());

    let (status, _, body) = get(
        app_with(InMemoryRepository::unavailable()),
        "/oai?verb=Identify",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_record_self_link() {
    let (status, _, body) = get(app(), "/record/7").await;
    assert_eq!(status, StatusCode::OK);
    let doc = roxmltree::Document::parse(&body).unwrap();
    assert_eq!(doc.root_element().tag_name().name(), "dc");

    let (status, _, body) = get(app(), "/record/7?format=cmdi").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("https://vlo.example.org/record/7?format=cmdi"));

    let (status, _, body) = get(app(), "/record/8").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_health() {
    let (status, _, body) = get(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");

    let (status, _, _) = get(app_with(InMemoryRepository::unavailable()), "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_slow_request_times_out() {
    let slow = SlowRepository {
        inner: InMemoryRepository::new().with_record(record()),
        delay: Duration::from_secs(5),
    };
    let (status, _, body) = get(
        build_app(slow, Duration::from_millis(50)),
        "/oai?verb=ListRecords&metadataPrefix=oai_dc",
    )
    .await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert!(body.is_empty());
}
