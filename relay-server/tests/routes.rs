//! Router tests against mocked upstreams.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use relay_server::config::AppConfig;
use relay_server::web::{AppState, create_router};

const RESULT_PAGE: &str = r#"<html><body>
  <div id="srline">
    <ul>
      <li class="time"><span>19:34発→</span><span>19:58着</span></li>
    </ul>
  </div>
</body></html>"#;

/// Config with every upstream pointed at `server`.
fn config_for(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.transit.base_url = Some(format!("{}/search/print", server.uri()));
    config.chat.api_key = Some("sk-test".into());
    config.chat.base_url = Some(server.uri());
    config.voice.token = Some("device".into());
    config.voice.endpoint = Some(format!("{}/sendmessage", server.uri()));
    config.pubsub.project_id = Some("proj".into());
    config.pubsub.access_token = Some("tok".into());
    config.pubsub.base_url = Some(server.uri());
    config.line.channel_token = Some("chan".into());
    config.line.base_url = Some(server.uri());
    config
}

fn app(config: &AppConfig) -> Router {
    create_router(AppState::from_config(config).unwrap())
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read(response).await
}

async fn read(response: axum::response::Response) -> (StatusCode, String) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn serve_result_page(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/search/print"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn is_countdown(s: &str) -> bool {
    let Some((mins, secs)) = s.split_once(':') else {
        return false;
    };
    !mins.is_empty()
        && mins.bytes().all(|b| b.is_ascii_digit())
        && secs.len() == 2
        && secs.bytes().all(|b| b.is_ascii_digit())
}

#[tokio::test]
async fn health() {
    let server = MockServer::start().await;
    let (status, body) = get(app(&config_for(&server)), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn next_train_plain_countdown() {
    let server = MockServer::start().await;
    serve_result_page(&server, RESULT_PAGE).await;

    let (status, body) = get(
        app(&config_for(&server)),
        "/nextrain?from=%E6%B8%8B%E8%B0%B7&to=%E6%96%B0%E5%AE%BF",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(is_countdown(&body), "unexpected body {body:?}");
}

#[tokio::test]
async fn next_train_verbose_json() {
    let server = MockServer::start().await;
    serve_result_page(&server, RESULT_PAGE).await;

    let (status, body) = get(
        app(&config_for(&server)),
        "/nextrain?from=A&to=B&res_type=verbose",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["station_from"], "A");
    assert_eq!(json["station_to"], "B");
    assert_eq!(json["next_time"], "19:34");
    assert!(json["diff_seconds"].as_i64().unwrap() >= 0);
    assert!(is_countdown(json["diff_time"].as_str().unwrap()));
    assert!(json["departed"].is_boolean());
}

#[tokio::test]
async fn next_train_unknown_res_type_is_plain() {
    let server = MockServer::start().await;
    serve_result_page(&server, RESULT_PAGE).await;

    let (status, body) = get(app(&config_for(&server)), "/nextrain?from=A&to=B&res_type=xml").await;
    assert_eq!(status, StatusCode::OK);
    assert!(is_countdown(&body));
}

#[tokio::test]
async fn next_train_requires_both_stations() {
    let server = MockServer::start().await;

    let (status, body) = get(app(&config_for(&server)), "/nextrain?from=A").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Error occurred. <Please set from and to parameters.>");

    let (status, _) = get(app(&config_for(&server)), "/nextrain?from=A&to=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn next_train_not_found() {
    let server = MockServer::start().await;
    serve_result_page(&server, "<html><body><p>no route</p></body></html>").await;

    let (status, body) = get(app(&config_for(&server)), "/nextrain?from=A&to=B").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        "Error occurred. <Cannot get next_time. Please check the parameters.>"
    );
}

#[tokio::test]
async fn next_train_malformed_time() {
    let server = MockServer::start().await;
    serve_result_page(
        &server,
        r#"<div id="srline"><li class="time"><span>運休</span></li></div>"#,
    )
    .await;

    let (status, body) = get(app(&config_for(&server)), "/nextrain?from=A&to=B").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.starts_with("Error occurred. <malformed departure time"));
}

#[tokio::test]
async fn next_train_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (status, _) = get(app(&config_for(&server)), "/nextrain?from=A&to=B").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn chat_form_and_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "Forty-two"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let config = config_for(&server);

    let (status, body) = get(app(&config), "/chat").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<form"));

    let response = app(&config)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("question=meaning+of+life"))
                .unwrap(),
        )
        .await
        .unwrap();
    let (status, body) = read(response).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("meaning of life"));
    assert!(body.contains("Forty-two"));
}

#[tokio::test]
async fn chat_not_configured() {
    let server = MockServer::start().await;
    let mut config = config_for(&server);
    config.chat.api_key = None;

    let response = app(&config)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("question=hi"))
                .unwrap(),
        )
        .await
        .unwrap();
    let (status, _) = read(response).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn voice_sends_and_reports() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sendmessage"))
        .and(query_param("key", "device"))
        .and(query_param("message", "jp_women good,morning=:=voice"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = get(
        app(&config_for(&server)),
        "/voice?speaker=jp_women&message=good%20morning",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Message successfully sent."));
}

#[tokio::test]
async fn voice_without_message_only_renders_form() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sendmessage"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = get(app(&config_for(&server)), "/voice?speaker=jp_women").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("Message successfully sent."));
}

#[tokio::test]
async fn pubsub_publishes_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/projects/proj/topics/lights:publish"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"messageIds": ["42"]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = get(app(&config_for(&server)), "/pubsub?topic=lights&state=on").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Topic: lights, Result: 42");
}

#[tokio::test]
async fn pubsub_missing_topic() {
    let server = MockServer::start().await;

    let (status, body) = get(app(&config_for(&server)), "/pubsub?state=on").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Error occurred. <Topic parameter is missing.>");
}

#[tokio::test]
async fn pubsub_missing_project() {
    let server = MockServer::start().await;
    let mut config = config_for(&server);
    config.pubsub.project_id = None;

    let (status, body) = get(app(&config), "/pubsub?topic=lights").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Error occurred. <Project ID is not configured.>");
}

#[tokio::test]
async fn webhook_echoes_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/bot/message/reply"))
        .and(body_json(serde_json::json!({
            "replyToken": "r-1",
            "messages": [{"type": "text", "text": "Type: user\nTargetId: U1\nMessage: hello"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let payload = serde_json::json!({
        "destination": "x",
        "events": [{
            "type": "message",
            "replyToken": "r-1",
            "source": {"type": "user", "userId": "U1"},
            "message": {"type": "text", "text": "hello"}
        }]
    })
    .to_string();

    let response = app(&config_for(&server))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.clone()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let (status, body) = read(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, payload);
}

#[tokio::test]
async fn webhook_without_events_is_echoed() {
    let server = MockServer::start().await;

    let response = app(&config_for(&server))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    let (status, body) = read(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "not json");
}

#[tokio::test]
async fn webhook_unknown_source_type() {
    let server = MockServer::start().await;
    let payload = serde_json::json!({
        "events": [{
            "replyToken": "r",
            "source": {"type": "channel"},
            "message": {"text": "hi"}
        }]
    })
    .to_string();

    let response = app(&config_for(&server))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    let (status, body) = read(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Error occurred. <Unknown type : channel>");
}

#[tokio::test]
async fn webhook_skips_typeless_source_and_replies_to_the_rest() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/bot/message/reply"))
        .and(body_json(serde_json::json!({
            "replyToken": "r-1",
            "messages": [{"type": "text", "text": "Type: user\nTargetId: U1\nMessage: hello"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let payload = serde_json::json!({
        "events": [
            {
                "type": "message",
                "replyToken": "r-1",
                "source": {"type": "user", "userId": "U1"},
                "message": {"type": "text", "text": "hello"}
            },
            {"type": "unsend", "source": {"userId": "U2"}}
        ]
    })
    .to_string();

    let response = app(&config_for(&server))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .body(Body::from(payload.clone()))
                .unwrap(),
        )
        .await
        .unwrap();
    let (status, body) = read(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, payload);
}

#[tokio::test]
async fn webhook_without_channel_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let mut config = config_for(&server);
    config.line.channel_token = None;

    let payload = serde_json::json!({
        "events": [{
            "replyToken": "r",
            "source": {"type": "user", "userId": "U1"},
            "message": {"text": "hi"}
        }]
    })
    .to_string();

    let response = app(&config)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    let (status, body) = read(response).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        "Error occurred. <LINE channel token is not configured.>"
    );
}
