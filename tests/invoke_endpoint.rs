//! End-to-end tests against a server on a real socket.

use std::time::Duration;

use host_mirror::config::MirrorConfig;
use host_mirror::handler::OnMissing;
use host_mirror::http::ErrorBody;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_invoke_round_trip() {
    let server = common::start_server(MirrorConfig::default()).await;
    let client = common::client();

    let event = json!({
        "version": "1.0",
        "context": { "eventType": "viewer-request" },
        "viewer": { "ip": "198.51.100.11" },
        "request": {
            "method": "GET",
            "uri": "/index.html",
            "querystring": {},
            "headers": {
                "host": { "value": "example.com" },
                "user-agent": { "value": "Mozilla/5.0" },
                "x-host": { "value": "stale" }
            },
            "cookies": {}
        }
    });

    let res = client
        .post(server.url("/invoke"))
        .json(&event)
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));

    let request: Value = res.json().await.unwrap();
    assert_eq!(
        request,
        json!({
            "method": "GET",
            "uri": "/index.html",
            "querystring": {},
            "headers": {
                "host": { "value": "example.com" },
                "user-agent": { "value": "Mozilla/5.0" },
                "x-host": { "value": "example.com" }
            },
            "cookies": {}
        })
    );

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_invoke_missing_host_rejected() {
    let server = common::start_server(MirrorConfig::default()).await;

    let res = common::client()
        .post(server.url("/invoke"))
        .json(&json!({ "request": { "headers": { "accept": { "value": "*/*" } } } }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 422);
    let body: ErrorBody = res.json().await.unwrap();
    assert_eq!(body.error, "missing_header");
    assert_eq!(body.header.as_deref(), Some("host"));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_reload_switches_missing_policy() {
    let server = common::start_server(MirrorConfig::default()).await;
    let client = common::client();
    let event = json!({ "request": { "headers": { "accept": { "value": "*/*" } } } });

    let res = client.post(server.url("/invoke")).json(&event).send().await.unwrap();
    assert_eq!(res.status(), 422);

    let mut config = MirrorConfig::default();
    config.mirror.on_missing = OnMissing::Forward;
    server.config_updates.send(config).unwrap();

    let mut status = 0;
    for _ in 0..20 {
        let res = client.post(server.url("/invoke")).json(&event).send().await.unwrap();
        status = res.status().as_u16();
        if status == 200 {
            let request: Value = res.json().await.unwrap();
            assert_eq!(request["headers"], event["request"]["headers"]);
            break;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    assert_eq!(status, 200, "reloaded policy never took effect");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_live_request_gets_x_host() {
    let server = common::start_server(MirrorConfig::default()).await;

    let res = common::client()
        .get(server.url("/anything?q=1"))
        .header("x-host", "spoofed")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let echo: Value = res.json().await.unwrap();
    let expected = server.addr.to_string();
    assert_eq!(echo["path"], "/anything");
    assert_eq!(echo["headers"]["host"], json!([expected]));
    assert_eq!(echo["headers"]["x-host"], json!([expected]));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_concurrent_invocations_are_independent() {
    let server = common::start_server(MirrorConfig::default()).await;
    let client = common::client();

    let mut tasks = Vec::new();
    for i in 0..32 {
        let client = client.clone();
        let url = server.url("/invoke");
        tasks.push(tokio::spawn(async move {
            let host = format!("site-{}.example.com", i);
            let event = json!({ "request": { "headers": { "host": { "value": host } } } });
            let request: Value = client.post(url).json(&event).send().await.unwrap().json().await.unwrap();
            (host, request)
        }));
    }

    for task in tasks {
        let (host, request) = task.await.unwrap();
        assert_eq!(request["headers"]["x-host"]["value"], host);
    }

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_graceful_shutdown() {
    let server = common::start_server(MirrorConfig::default()).await;

    let res = common::client().get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    server.shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}
