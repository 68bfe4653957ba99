//! Publisher tests against a local stub analysis endpoint.

use std::net::SocketAddr;

use anyhow::Result;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use serde_json::{json, Value};

use insight_relay::analyzer::{insights_or_empty, summarize};
use insight_relay::errors::RelayError;
use insight_relay::publisher::send_insights;

/// Spawn a stub endpoint that replies with a fixed status and body.
fn spawn_stub(status: u16, body: &'static str) -> SocketAddr {
    let make_svc = make_service_fn(move |_conn| async move {
        Ok::<_, hyper::Error>(service_fn(move |_req: Request<Body>| async move {
            let resp = Response::builder()
                .status(status)
                .header("Content-Type", "application/json")
                .body(Body::from(body))
                .expect("stub response");
            Ok::<_, hyper::Error>(resp)
        }))
    });

    let server = Server::bind(&"127.0.0.1:0".parse().expect("loopback addr")).serve(make_svc);
    let addr = server.local_addr();
    tokio::spawn(server);
    addr
}

/// Spawn a stub that checks the bearer token and echoes the request body
/// back, so tests can observe exactly what was forwarded.
fn spawn_echo_stub(expected_auth: &'static str) -> SocketAddr {
    let make_svc = make_service_fn(move |_conn| async move {
        Ok::<_, hyper::Error>(service_fn(move |req: Request<Body>| async move {
            let authorised = req
                .headers()
                .get(hyper::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                == Some(expected_auth);
            if !authorised {
                let resp = Response::builder()
                    .status(StatusCode::UNAUTHORIZED)
                    .body(Body::empty())
                    .expect("stub response");
                return Ok::<_, hyper::Error>(resp);
            }

            let body = hyper::body::to_bytes(req.into_body()).await?;
            let resp = Response::builder()
                .header("Content-Type", "application/json")
                .body(Body::from(body))
                .expect("stub response");
            Ok(resp)
        }))
    });

    let server = Server::bind(&"127.0.0.1:0".parse().expect("loopback addr")).serve(make_svc);
    let addr = server.local_addr();
    tokio::spawn(server);
    addr
}

#[tokio::test]
async fn ok_response_body_is_parsed() -> Result<()> {
    let addr = spawn_stub(200, r#"{"status":"ok"}"#);
    let client = reqwest::Client::new();

    let response = send_insights(
        &client,
        &format!("http://{addr}/v1/analyze"),
        "test-key",
        &json!({"most_common": 2.0, "median": 2.0, "average": 2.0}),
    )
    .await?;

    assert_eq!(response, json!({"status": "ok"}));
    Ok(())
}

#[tokio::test]
async fn non_ok_status_is_an_error() {
    let addr = spawn_stub(500, "upstream exploded");
    let client = reqwest::Client::new();

    let err = send_insights(
        &client,
        &format!("http://{addr}/v1/analyze"),
        "test-key",
        &json!({}),
    )
    .await
    .unwrap_err();

    match err {
        RelayError::Api { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("expected Api error, got {other}"),
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_an_http_error() {
    let client = reqwest::Client::new();

    // Port 1 on loopback should refuse the connection.
    let err = send_insights(&client, "http://127.0.0.1:1/v1/analyze", "test-key", &json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::Http(_)));
}

#[tokio::test]
async fn forwards_insights_mapping_verbatim() -> Result<()> {
    let addr = spawn_echo_stub("Bearer test-key");
    let client = reqwest::Client::new();

    // The pipeline's own path from sample to request body.
    let insights = insights_or_empty(summarize(&[4.0, 4.0, 5.0, 6.0]));
    assert_eq!(
        insights,
        json!({"most_common": 4.0, "median": 4.5, "average": 4.75})
    );

    let echoed: Value = send_insights(
        &client,
        &format!("http://{addr}/v1/analyze"),
        "test-key",
        &insights,
    )
    .await?;

    assert_eq!(echoed, insights);
    Ok(())
}

#[tokio::test]
async fn empty_insights_mapping_is_still_published() -> Result<()> {
    let addr = spawn_echo_stub("Bearer test-key");
    let client = reqwest::Client::new();

    let insights = insights_or_empty(summarize(&[]));
    let echoed: Value = send_insights(
        &client,
        &format!("http://{addr}/v1/analyze"),
        "test-key",
        &insights,
    )
    .await?;

    assert_eq!(echoed, json!({}));
    Ok(())
}
