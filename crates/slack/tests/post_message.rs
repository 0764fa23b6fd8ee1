use secrecy::SecretString;
use serde_json::json;
use slack::SlackClient;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> SlackClient {
    SlackClient::new(&server.uri(), SecretString::from("xoxb-test".to_string())).unwrap()
}

#[tokio::test]
async fn threaded_reply_returns_ts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .and(header("authorization", "Bearer xoxb-test"))
        .and(body_json(json!({
            "channel": "C123",
            "text": "done",
            "thread_ts": "1700000000.000100"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "channel": "C123",
            "ts": "1700000001.000200"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ts = client(&server)
        .send_message("C123", "done", Some("1700000000.000100"))
        .await
        .unwrap();

    assert_eq!(ts, "1700000001.000200");
}

#[tokio::test]
async fn slack_errors_are_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": false,
            "error": "channel_not_found"
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .send_message("C404", "hello", None)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("channel_not_found"));
}

#[tokio::test]
async fn http_failures_are_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(client(&server).send_message("C1", "hello", None).await.is_err());
}
