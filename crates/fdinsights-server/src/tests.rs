//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use fdinsights_core::test_utils::{MockModelServer, MockReply, MOCK_INSIGHTS};
use fdinsights_core::{MockBackend, OllamaBackend, PromptLibrary};
use http_body_util::BodyExt;
use tower::ServiceExt;

fn open_config() -> ServerConfig {
    ServerConfig {
        require_auth: false,
        ..Default::default()
    }
}

fn setup_app_with(ai: Option<AIClient>, config: ServerConfig) -> Router {
    let state = AppState::new(config, Settings::default().without_delay(), ai);
    create_router_with_state(state, None)
}

fn setup_test_app() -> Router {
    setup_app_with(Some(AIClient::mock()), open_config())
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn default_params() -> serde_json::Value {
    serde_json::json!({
        "principal": 50000,
        "annualRate": 6.5,
        "termYears": 5,
        "compoundingFrequency": "quarterly"
    })
}

// ========== Calculator API Tests ==========

#[tokio::test]
async fn test_calculate_default_scenario() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json("/api/calculate", default_params()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let maturity = json["maturityAmount"].as_f64().unwrap();
    let interest = json["totalInterest"].as_f64().unwrap();
    assert!((maturity - 69_020.99).abs() < 0.01);
    assert!((interest - (maturity - 50000.0)).abs() < 1e-9);
    assert_eq!(json["periodsPerYear"], 4);
    assert_eq!(json["periods"], 20.0);
}

#[tokio::test]
async fn test_calculate_accepts_form_field_names() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "fdAmount": 10000,
        "interestRate": 10,
        "period": 2,
        "compoundingFrequency": "annually"
    });
    let response = app.oneshot(post_json("/api/calculate", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!((json["maturityAmount"].as_f64().unwrap() - 12100.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_calculate_reports_every_invalid_field() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "principal": 999.99,
        "annualRate": 25.01,
        "termYears": 51,
        "compoundingFrequency": "weekly"
    });
    let response = app.oneshot(post_json("/api/calculate", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Invalid input.");
    let fields: Vec<&str> = json["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(
        fields,
        vec!["principal", "annualRate", "termYears", "compoundingFrequency"]
    );
    assert_eq!(
        json["fields"][0]["message"],
        "Principal amount must be at least ₹1,000."
    );
}

#[tokio::test]
async fn test_calculate_rejects_overflowing_principal() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "principal": 1e305,
        "annualRate": 25,
        "termYears": 50,
        "compoundingFrequency": "monthly"
    });
    let response = app.oneshot(post_json("/api/calculate", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["fields"][0]["field"], "principal");
    assert_eq!(json["fields"][0]["message"], "Principal amount is too large.");
    assert!(json.get("maturityAmount").is_none());
}

#[tokio::test]
async fn test_calculate_accepts_numeric_strings() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "principal": "10000",
        "annualRate": "10",
        "termYears": "2",
        "compoundingFrequency": "annually"
    });
    let response = app.oneshot(post_json("/api/calculate", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!((json["maturityAmount"].as_f64().unwrap() - 12100.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_calculate_non_numeric_string_is_field_error() {
    let app = setup_test_app();

    let mut body = default_params();
    body["principal"] = serde_json::json!("fifty thousand");
    let response = app.oneshot(post_json("/api/calculate", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Invalid input.");
    assert_eq!(json["fields"].as_array().unwrap().len(), 1);
    assert_eq!(json["fields"][0]["field"], "principal");
    assert_eq!(json["fields"][0]["message"], "Principal amount must be a number.");
}

#[tokio::test]
async fn test_calculate_rejects_malformed_body() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/calculate")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_list_frequencies() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/frequencies")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let options = json.as_array().unwrap();
    assert_eq!(options.len(), 3);
    assert!(options
        .iter()
        .any(|o| o["value"] == "monthly" && o["label"] == "Monthly" && o["periodsPerYear"] == 12));
}

// ========== Insight API Tests ==========

#[tokio::test]
async fn test_insights_success_envelope() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json("/api/insights", default_params()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json["data"].as_str().unwrap().contains("quarterly"));
    assert!(json["error"].is_null());
    assert_eq!(json["model"], "mock");
    assert!(json["generatedAt"].is_string());
}

#[tokio::test]
async fn test_insights_empty_response() {
    let app = setup_app_with(Some(AIClient::Mock(MockBackend::empty())), open_config());

    let response = app
        .oneshot(post_json("/api/insights", default_params()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = get_body_json(response).await;
    assert!(json["data"].is_null());
    assert_eq!(
        json["error"],
        "Failed to generate insights. The AI model may be temporarily unavailable. Please try again later."
    );
}

#[tokio::test]
async fn test_insights_backend_failure_is_sanitized() {
    let app = setup_app_with(
        Some(AIClient::Mock(MockBackend::failing("dial tcp 10.0.0.7:11434: refused"))),
        open_config(),
    );

    let response = app
        .oneshot(post_json("/api/insights", default_params()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = get_body_json(response).await;
    let error = json["error"].as_str().unwrap();
    assert_eq!(
        error,
        "An unexpected error occurred while generating insights. Please check your connection and try again."
    );
    assert!(!error.contains("10.0.0.7"));
}

#[tokio::test]
async fn test_insights_invalid_input_skips_backend() {
    let spy = MockBackend::new();
    let app = setup_app_with(Some(AIClient::Mock(spy.clone())), open_config());

    let mut body = default_params();
    body["principal"] = serde_json::json!(-5);
    let response = app.oneshot(post_json("/api/insights", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Invalid input.");
    assert!(json["data"].is_null());
    assert_eq!(json["fields"][0]["field"], "principal");
    assert_eq!(spy.call_count(), 0);
}

#[tokio::test]
async fn test_insights_missing_field_is_invalid() {
    let spy = MockBackend::new();
    let app = setup_app_with(Some(AIClient::Mock(spy.clone())), open_config());

    let body = serde_json::json!({ "principal": 50000, "annualRate": 6.5, "termYears": 5 });
    let response = app.oneshot(post_json("/api/insights", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(spy.call_count(), 0);
}

#[tokio::test]
async fn test_insights_without_backend() {
    let app = setup_app_with(None, open_config());

    let response = app
        .oneshot(post_json("/api/insights", default_params()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_insights_via_ollama_mock_server() {
    let server = MockModelServer::start_with(MockReply::Insights).await;
    let backend =
        OllamaBackend::new(&server.url(), "llama3.2").with_prompts(PromptLibrary::embedded_only());
    let app = setup_app_with(Some(AIClient::Ollama(backend)), open_config());

    let response = app
        .oneshot(post_json("/api/insights", default_params()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["data"], MOCK_INSIGHTS);
    assert_eq!(json["model"], "llama3.2");
    assert_eq!(server.request_count(), 1);
}

#[tokio::test]
async fn test_insights_malformed_model_output() {
    let server = MockModelServer::start_with(MockReply::Malformed).await;
    let backend =
        OllamaBackend::new(&server.url(), "llama3.2").with_prompts(PromptLibrary::embedded_only());
    let app = setup_app_with(Some(AIClient::Ollama(backend)), open_config());

    let response = app
        .oneshot(post_json("/api/insights", default_params()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

// ========== Health API Tests ==========

#[tokio::test]
async fn test_health_with_mock_backend() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["ai"]["configured"], true);
    assert_eq!(json["ai"]["reachable"], true);
    assert_eq!(json["ai"]["backend"], "mock");
}

#[tokio::test]
async fn test_health_without_backend() {
    let app = setup_app_with(None, open_config());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = get_body_json(response).await;
    assert_eq!(json["ai"]["configured"], false);
    assert!(json["ai"].get("host").is_none());
}

// ========== Auth & Middleware Tests ==========

fn secured_config() -> ServerConfig {
    ServerConfig {
        require_auth: true,
        api_keys: vec!["secret-key-123".to_string()],
        trusted_networks: parse_trusted_networks("192.168.1.0/24"),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_auth_required_without_key() {
    let app = setup_app_with(Some(AIClient::mock()), secured_config());

    let response = app
        .oneshot(post_json("/api/calculate", default_params()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Authentication required");
}

#[tokio::test]
async fn test_auth_with_api_key() {
    let app = setup_app_with(Some(AIClient::mock()), secured_config());

    let mut request = post_json("/api/calculate", default_params());
    request.headers_mut().insert(
        header::AUTHORIZATION,
        HeaderValue::from_static("Bearer secret-key-123"),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_auth_with_wrong_api_key() {
    let app = setup_app_with(Some(AIClient::mock()), secured_config());

    let mut request = post_json("/api/calculate", default_params());
    request.headers_mut().insert(
        header::AUTHORIZATION,
        HeaderValue::from_static("Bearer secret-key-124"),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_trusted_network() {
    let app = setup_app_with(Some(AIClient::mock()), secured_config());

    let trusted: SocketAddr = "192.168.1.42:50000".parse().unwrap();
    let mut request = post_json("/api/calculate", default_params());
    request.extensions_mut().insert(ConnectInfo(trusted));
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let outsider: SocketAddr = "10.1.2.3:50000".parse().unwrap();
    let mut request = post_json("/api/calculate", default_params());
    request.extensions_mut().insert(ConnectInfo(outsider));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_is_public() {
    let app = setup_app_with(None, secured_config());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_security_headers() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/frequencies")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
    assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
    assert!(headers.get(header::CONTENT_SECURITY_POLICY).is_some());
}

#[test]
fn test_parse_trusted_networks() {
    let nets = parse_trusted_networks("192.168.1.0/24, 10.0.0.5,,not-an-ip,::1");
    assert_eq!(nets.len(), 3);
    assert!(is_ip_trusted(&"192.168.1.200".parse().unwrap(), &nets));
    assert!(is_ip_trusted(&"10.0.0.5".parse().unwrap(), &nets));
    assert!(!is_ip_trusted(&"10.0.0.6".parse().unwrap(), &nets));
}

#[test]
fn test_validate_api_key() {
    let keys = vec!["abc".to_string(), "longer-key".to_string()];
    assert!(validate_api_key("abc", &keys));
    assert!(validate_api_key("longer-key", &keys));
    assert!(!validate_api_key("abd", &keys));
    assert!(!validate_api_key("", &keys));
    assert!(!validate_api_key("abc", &[]));
}

#[test]
fn test_split_list() {
    assert_eq!(
        split_list(" https://a.example , ,https://b.example"),
        vec!["https://a.example", "https://b.example"]
    );
    assert!(split_list("").is_empty());
}
