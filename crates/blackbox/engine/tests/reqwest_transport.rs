//! The production transport against a local mock server.

use std::time::Duration;

use blackbox_engine::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn payload(name: &str, category: OutputCategory) -> Capability {
    Capability::new(name, format!("/{}", name), InvocationMethod::Payload, category)
}

fn probe_for(server: &MockServer) -> EndpointProbe<ReqwestTransport> {
    let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
    EndpointProbe::new(transport, &server.uri())
}

#[tokio::test]
async fn payload_probe_posts_data_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/data"))
        .and(body_json(json!({"data": "hello"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": 532})))
        .expect(1)
        .mount(&server)
        .await;

    let obs = probe_for(&server)
        .probe(&payload("data", OutputCategory::Integer), &TestCase::new("hello", "word"))
        .await;
    assert_eq!(obs.status, Some(200));
    assert!(obs.output.unwrap().strict_eq(&OutputValue::Integer(532)));
}

#[tokio::test]
async fn query_probe_sends_get() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/time"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "12:00"})))
        .mount(&server)
        .await;

    let cap = Capability::new("time", "/time", InvocationMethod::Query, OutputCategory::FixedScalar);
    let obs = probe_for(&server).probe(&cap, &TestCase::new("", "empty")).await;
    assert!(obs.is_scorable());
    assert!(obs.output.unwrap().strict_eq(&OutputValue::Text("12:00".into())));
}

#[tokio::test]
async fn server_error_is_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let obs = probe_for(&server)
        .probe(&payload("glitch", OutputCategory::Boolean), &TestCase::new("a", "t"))
        .await;
    assert_eq!(obs.status, Some(500));
    assert!(matches!(
        obs.error,
        Some(ProbeFailure::Status { status: 500, ref body }) if body.contains("Internal")
    ));
}

#[tokio::test]
async fn html_body_is_opaque() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let obs = probe_for(&server)
        .probe(&payload("zap", OutputCategory::String), &TestCase::new("a", "t"))
        .await;
    assert!(matches!(obs.output, Some(OutputValue::Opaque(_))));
}

#[tokio::test]
async fn json_without_result_is_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": true})))
        .mount(&server)
        .await;

    let obs = probe_for(&server)
        .probe(&payload("alpha", OutputCategory::Boolean), &TestCase::new("a", "t"))
        .await;
    assert!(matches!(obs.error, Some(ProbeFailure::Decode { .. })));
}

#[tokio::test]
async fn exchange_exposes_raw_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Blackbox", "yes")
                .set_body_json(json!({"result": false})),
        )
        .mount(&server)
        .await;

    let response = probe_for(&server)
        .exchange(&payload("alpha", OutputCategory::Boolean), "15")
        .await
        .unwrap();
    assert_eq!(response.status, 200);
    assert!(response.is_json());
    assert_eq!(response.headers.get("x-blackbox").map(String::as_str), Some("yes"));
}

#[tokio::test]
async fn unreachable_host_is_transport_failure() {
    let transport = ReqwestTransport::new(Duration::from_millis(500)).unwrap();
    let probe = EndpointProbe::new(transport, "http://127.0.0.1:9");
    let obs = probe
        .probe(&payload("data", OutputCategory::Integer), &TestCase::new("a", "t"))
        .await;
    assert!(obs.status.is_none());
    assert!(matches!(obs.error, Some(ProbeFailure::Transport { .. })));
}

#[tokio::test]
async fn full_run_against_mock_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/time"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": 1700000000})))
        .mount(&server)
        .await;

    let config = TargetConfig {
        base_url: server.uri(),
        capabilities: vec![Capability::new(
            "time",
            "/time",
            InvocationMethod::Query,
            OutputCategory::FixedScalar,
        )],
        ..TargetConfig::default()
    };
    let transport = ReqwestTransport::new(config.timeout()).unwrap();
    let engine = FingerprintEngine::new(config, transport).unwrap();
    let run = engine.run(&[]).await.unwrap();

    let time = run.capability("time").unwrap();
    assert!(time.outcome.is_confirmed());
    assert_eq!(time.probes.failed, 0);
}
