//! Integration tests for `InferenceClient` against a mock HTTP endpoint.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use cerebras_ask::{Error, InferenceClient, TransportError};
use serde_json::json;

const CHAT_PATH: &str = "/v1/chat/completions";

fn config_with_key(key: &str) -> HashMap<String, String> {
    [("api_key".to_string(), key.to_string())].into()
}

fn empty_env() -> HashMap<String, String> {
    HashMap::new()
}

fn test_client(base_url: &str, api_key: &str) -> InferenceClient {
    InferenceClient::builder()
        .config_source(config_with_key(api_key))
        .env_source(empty_env())
        .base_url(base_url)
        .build()
        .expect("failed to build client")
}

#[tokio::test]
async fn success_returns_first_choice_content_verbatim() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", CHAT_PATH)
        .match_header("authorization", "Bearer test-key")
        .match_body(mockito::Matcher::PartialJson(json!({
            "messages": [{"role": "user", "content": "Say hello!"}],
            "model": "llama-3.3-70b",
            "max_completion_tokens": 1024,
            "stream": false,
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"content":"Hello!"}}]}"#)
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server.url(), "test-key");
    let completion = client.complete("Say hello!").await.expect("request failed");

    assert_eq!(completion.text, "Hello!");
    mock.assert_async().await;
}

#[tokio::test]
async fn prompt_is_trimmed_before_sending() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", CHAT_PATH)
        .match_body(mockito::Matcher::PartialJson(json!({
            "messages": [{"role": "user", "content": "hi"}],
        })))
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"content":"hey"}}]}"#)
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server.url(), "test-key");
    let completion = client.complete("  hi  ").await.expect("request failed");

    assert_eq!(completion.text, "hey");
    mock.assert_async().await;
}

#[tokio::test]
async fn http_401_maps_to_service_error_without_retry() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", CHAT_PATH)
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"invalid api key"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server.url(), "bad-key");
    let err = client.complete("Say hello!").await.unwrap_err();

    assert!(matches!(err, Error::Service { .. }), "got {err}");
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("invalid api key"));
    // expect(1) on the mock ensures the failed call was not retried.
    mock.assert_async().await;
}

#[tokio::test]
async fn whitespace_prompt_makes_no_network_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", CHAT_PATH)
        .expect(0)
        .create_async()
        .await;

    let client = test_client(&server.url(), "test-key");
    let err = client.complete("   ").await.unwrap_err();

    assert!(matches!(err, Error::Validation { .. }), "got {err}");
    mock.assert_async().await;
}

#[tokio::test]
async fn missing_credential_makes_no_network_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", CHAT_PATH)
        .expect(0)
        .create_async()
        .await;

    let client = InferenceClient::builder()
        .env_source(empty_env())
        .base_url(server.url())
        .build()
        .unwrap();
    assert!(!client.is_authenticated());

    let err = client.complete("Say hello!").await.unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }), "got {err}");
    mock.assert_async().await;
}

#[tokio::test]
async fn structurally_invalid_success_body_is_service_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", CHAT_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let client = test_client(&server.url(), "test-key");
    let err = client.complete("Say hello!").await.unwrap_err();

    assert!(matches!(err, Error::Service { .. }), "got {err}");
    assert!(err.to_string().contains("malformed response"));
}

#[tokio::test]
async fn non_json_success_body_is_service_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", CHAT_PATH)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let client = test_client(&server.url(), "test-key");
    let err = client.complete("Say hello!").await.unwrap_err();

    assert!(matches!(err, Error::Service { .. }), "got {err}");
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    // Bind then drop a listener so the port is very likely closed.
    let closed_addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let client = test_client(&format!("http://{closed_addr}"), "test-key");
    let err = client.complete("Say hello!").await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "got {err}");
}

#[tokio::test]
async fn deadline_expiry_resolves_instead_of_hanging() {
    // A socket that accepts the connection and never responds.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((stream, _)) = listener.accept().await {
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(stream);
        }
    });

    let client = test_client(&format!("http://{addr}"), "test-key");
    let deadline = Duration::from_millis(200);

    let start = Instant::now();
    let err = client
        .complete_with_deadline("Say hello!", deadline)
        .await
        .unwrap_err();

    assert!(start.elapsed() >= deadline);
    assert!(
        matches!(
            err,
            Error::Transport(TransportError::DeadlineExceeded(_))
        ),
        "got {err}"
    );
}

#[tokio::test]
async fn configuration_credential_wins_over_environment_at_the_wire() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", CHAT_PATH)
        .match_header("authorization", "Bearer from-config")
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
        .expect(1)
        .create_async()
        .await;

    let env: HashMap<String, String> =
        [("CEREBRAS_API_KEY".to_string(), "from-env".to_string())].into();
    let client = InferenceClient::builder()
        .config_source(config_with_key("from-config"))
        .env_source(env)
        .base_url(server.url())
        .build()
        .unwrap();

    client.complete("hi").await.expect("request failed");
    mock.assert_async().await;
}
