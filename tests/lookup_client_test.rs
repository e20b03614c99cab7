mod common;

use std::time::Duration;

use common::{closed_addr, Route, StubServer};
use contact_enricher::app::ports::LookupPort;
use contact_enricher::infra::ReqwestLookup;
use contact_enricher::{LookupFailure, LookupOutcome};
use serde_json::json;

fn client(url: &str, timeout: Duration) -> ReqwestLookup {
    ReqwestLookup::new(url, "secret-key", timeout, "contact_enricher-tests").unwrap()
}

#[tokio::test]
async fn test_success_parses_json_body() {
    let server = StubServer::start(vec![Route::json(
        "email=jane%40x.com",
        r#"{"person": {"firstName": "Jane"}, "company": null}"#,
    )])
    .await;

    let outcome = client(&server.url(), Duration::from_secs(5)).lookup("jane@x.com").await;
    assert_eq!(
        outcome,
        LookupOutcome::Success(json!({"person": {"firstName": "Jane"}, "company": null}))
    );
}

#[tokio::test]
async fn test_email_and_key_sent_as_query_parameters() {
    let server = StubServer::start(vec![Route::json("email=", "{}")]).await;

    client(&server.url(), Duration::from_secs(5)).lookup("a b@x.com").await;

    let lines = server.request_lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("GET /enrichment?"), "{}", lines[0]);
    assert!(lines[0].contains("email=a+b%40x.com"), "{}", lines[0]);
    assert!(lines[0].contains("apikey=secret-key"), "{}", lines[0]);
}

#[tokio::test]
async fn test_non_200_status_is_a_failure() {
    let server = StubServer::start(vec![Route::status("email=busy%40x.com", 429)]).await;

    let outcome = client(&server.url(), Duration::from_secs(5)).lookup("busy@x.com").await;
    assert_eq!(outcome, LookupOutcome::Failure(LookupFailure::Status(429)));
}

#[tokio::test]
async fn test_other_2xx_is_still_a_failure() {
    let server = StubServer::start(vec![Route::status("email=", 201)]).await;

    let outcome = client(&server.url(), Duration::from_secs(5)).lookup("x@x.com").await;
    assert_eq!(outcome, LookupOutcome::Failure(LookupFailure::Status(201)));
}

#[tokio::test]
async fn test_malformed_json_is_a_parse_failure() {
    let server = StubServer::start(vec![Route::json("email=", "{not json")]).await;

    let outcome = client(&server.url(), Duration::from_secs(5)).lookup("x@x.com").await;
    assert!(
        matches!(outcome, LookupOutcome::Failure(LookupFailure::Parse(_))),
        "{outcome:?}"
    );
}

#[tokio::test]
async fn test_timeout_is_a_transport_failure() {
    let server = StubServer::start(vec![
        Route::json("email=", "{}").delayed(Duration::from_secs(3))
    ])
    .await;

    let outcome = client(&server.url(), Duration::from_millis(300)).lookup("slow@x.com").await;
    match outcome {
        LookupOutcome::Failure(LookupFailure::Transport(msg)) => {
            assert!(msg.starts_with("timed out"), "{msg}");
            assert!(!msg.contains("secret-key"), "{msg}");
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_a_transport_failure() {
    let addr = closed_addr().await;
    let url = format!("http://{}/enrichment", addr);

    let outcome = client(&url, Duration::from_secs(5)).lookup("x@x.com").await;
    match outcome {
        LookupOutcome::Failure(LookupFailure::Transport(msg)) => {
            assert!(!msg.contains("secret-key"), "{msg}");
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
}
