use serde_json::json;

use super::*;
use crate::mock_backend::{MockBackend, Reply, unreachable_base_url};

fn client_for(base_url: &str) -> ApiClient {
    ApiClient::new(&ClientConfig::new(base_url).unwrap()).unwrap()
}

fn strict_client_for(base_url: &str) -> ApiClient {
    let config = ClientConfig { status_policy: StatusPolicy::Strict, ..ClientConfig::new(base_url).unwrap() };
    ApiClient::new(&config).unwrap()
}

// =============================================================
// URL and body helpers
// =============================================================

#[test]
fn join_url_uses_single_separator() {
    assert_eq!(join_url("http://localhost:5000", "@me"), "http://localhost:5000/@me");
    assert_eq!(join_url("http://localhost:5000/", "/@me"), "http://localhost:5000/@me");
    assert_eq!(join_url("http://localhost:5000", "new?q=garden"), "http://localhost:5000/new?q=garden");
}

#[test]
fn encode_body_treats_null_as_absent() {
    assert!(encode_body(&()).unwrap().is_none());
    assert!(encode_body(&None::<Value>).unwrap().is_none());
    assert!(encode_body(&Value::Null).unwrap().is_none());
    assert_eq!(encode_body(&json!({ "a": 1 })).unwrap(), Some(json!({ "a": 1 })));
    assert_eq!(encode_body(&Some(0)).unwrap(), Some(json!(0)));
}

#[test]
fn new_rejects_invalid_session_cookie() {
    let config = ClientConfig { session_cookie: Some("bad\nvalue".to_owned()), ..ClientConfig::default() };
    assert!(matches!(ApiClient::new(&config), Err(ApiError::InvalidHeader(_))));
}

// =============================================================
// Verbs against a live in-process backend
// =============================================================

#[tokio::test]
async fn get_sends_no_body_and_parses_json() {
    let backend = MockBackend::spawn(Reply::json(200, json!({ "opportunities": [], "pagination": {} }))).await;
    let api = client_for(&backend.base_url);

    let value: Value = api.get("opportunities").await.unwrap();
    assert_eq!(value, json!({ "opportunities": [], "pagination": {} }));

    let req = backend.last_request();
    assert_eq!(req.method, "GET");
    assert_eq!(req.path, "/opportunities");
    assert_eq!(req.content_type, None);
    assert!(req.body.is_empty());
}

#[tokio::test]
async fn del_sends_no_body() {
    let backend = MockBackend::spawn(Reply::json(200, json!({}))).await;
    let api = client_for(&backend.base_url);

    let value: Value = api.del("opportunities/4").await.unwrap();
    assert_eq!(value, json!({}));

    let req = backend.last_request();
    assert_eq!(req.method, "DELETE");
    assert_eq!(req.path, "/opportunities/4");
    assert_eq!(req.content_type, None);
    assert!(req.body.is_empty());
}

#[tokio::test]
async fn post_round_trips_json_body() {
    let backend = MockBackend::spawn(Reply::json(201, json!({ "ok": true }))).await;
    let api = client_for(&backend.base_url);
    let body = json!({
        "title": "Park cleanup",
        "description": "Bring gloves",
        "category": "Environment",
        "location": "Riverside",
    });

    let value: Value = api.post("new", &body).await.unwrap();
    assert_eq!(value, json!({ "ok": true }));

    let req = backend.last_request();
    assert_eq!(req.method, "POST");
    assert_eq!(req.content_type.as_deref(), Some("application/json"));
    assert_eq!(req.json_body(), body);
}

#[tokio::test]
async fn put_with_absent_body_omits_content_type() {
    let backend = MockBackend::spawn(Reply::json(200, json!({}))).await;
    let api = client_for(&backend.base_url);

    let _: Value = api.put("opportunities/2", &None::<Value>).await.unwrap();

    let req = backend.last_request();
    assert_eq!(req.method, "PUT");
    assert_eq!(req.content_type, None);
    assert!(req.body.is_empty());
}

#[tokio::test]
async fn put_with_typed_body_sends_json() {
    #[derive(Serialize)]
    struct Rename<'a> {
        title: &'a str,
    }

    let backend = MockBackend::spawn(Reply::json(200, json!({}))).await;
    let api = client_for(&backend.base_url);

    let _: Value = api.put("opportunities/2", &Rename { title: "Library shift" }).await.unwrap();

    let req = backend.last_request();
    assert_eq!(req.content_type.as_deref(), Some("application/json"));
    assert_eq!(req.json_body(), json!({ "title": "Library shift" }));
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let backend = MockBackend::spawn(Reply::text(200, "<html>oops</html>")).await;
    let api = client_for(&backend.base_url);

    let err = api.get::<Value>("").await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn status_is_ignored_by_default() {
    let backend = MockBackend::spawn(Reply::json(401, json!({ "error": "unauthorized" }))).await;
    let api = client_for(&backend.base_url);

    let value: Value = api.get(WHO_AM_I_PATH).await.unwrap();
    assert_eq!(value, json!({ "error": "unauthorized" }));
}

#[tokio::test]
async fn strict_policy_rejects_non_success_status() {
    let backend = MockBackend::spawn(Reply::json(403, json!({ "error": "forbidden" }))).await;
    let api = strict_client_for(&backend.base_url);

    let err = api.get::<Value>(WHO_AM_I_PATH).await.unwrap_err();
    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 403);
            assert!(body.contains("forbidden"));
        }
        other => panic!("expected status error, got {other}"),
    }
}

#[tokio::test]
async fn strict_policy_accepts_success_status() {
    let backend = MockBackend::spawn(Reply::json(200, json!([1, 2, 3]))).await;
    let api = strict_client_for(&backend.base_url);

    let value: Vec<u32> = api.get("numbers").await.unwrap();
    assert_eq!(value, vec![1, 2, 3]);
}

#[tokio::test]
async fn unreachable_backend_is_an_http_error() {
    let api = client_for(&unreachable_base_url().await);

    let err = api.get::<Value>(WHO_AM_I_PATH).await.unwrap_err();
    assert!(matches!(err, ApiError::Http(_)), "unexpected error: {err}");
}

// =============================================================
// Credentials
// =============================================================

#[tokio::test]
async fn configured_session_cookie_is_sent() {
    let backend = MockBackend::spawn(Reply::json(200, json!({}))).await;
    let config = ClientConfig {
        session_cookie: Some("session=abc123".to_owned()),
        ..ClientConfig::new(&backend.base_url).unwrap()
    };
    let api = ApiClient::new(&config).unwrap();

    let _: Value = api.get(WHO_AM_I_PATH).await.unwrap();
    assert_eq!(backend.last_request().cookie.as_deref(), Some("session=abc123"));
}

#[tokio::test]
async fn cookies_set_by_backend_are_sent_back() {
    let backend = MockBackend::spawn_with_routes(
        vec![("/login", Reply::json(200, json!({ "ok": true })).with_cookie("session=fromserver; Path=/"))],
        Reply::json(200, json!({})),
    )
    .await;
    let api = client_for(&backend.base_url);

    let _: Value = api.post("login", &json!({ "username": "a" })).await.unwrap();
    let _: Value = api.get(WHO_AM_I_PATH).await.unwrap();

    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].cookie, None);
    assert_eq!(requests[1].cookie.as_deref(), Some("session=fromserver"));
}
