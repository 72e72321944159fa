//! FD Insights Web Server
//!
//! Axum-based REST API exposing the compounding calculator and the insight
//! gateway.
//!
//! Security features:
//! - Optional authentication (API keys or trusted networks; `--no-auth` for local dev)
//! - Restrictive CORS policy
//! - Security headers on every response
//! - Sanitized error responses

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{info, warn};

use fdinsights_core::{AIClient, FieldError, InsightBackend, InsightGateway, Settings, ValidationErrors};

mod handlers;

/// Authorization header for API key auth
const AUTHORIZATION_HEADER: &str = "authorization";

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Whether authentication is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// API keys accepted as `Authorization: Bearer <key>`
    pub api_keys: Vec<String>,
    /// Networks whose requests bypass authentication (e.g. "192.168.1.0/24")
    pub trusted_networks: Vec<ipnet::IpNet>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
            api_keys: vec![],
            trusted_networks: vec![],
        }
    }
}

impl ServerConfig {
    /// Read `FDINSIGHTS_API_KEYS`, `FDINSIGHTS_TRUSTED_NETWORKS` and
    /// `FDINSIGHTS_ALLOWED_ORIGINS` (all comma-separated)
    pub fn from_env(require_auth: bool) -> Self {
        Self {
            require_auth,
            allowed_origins: split_list(&std::env::var("FDINSIGHTS_ALLOWED_ORIGINS").unwrap_or_default()),
            api_keys: split_list(&std::env::var("FDINSIGHTS_API_KEYS").unwrap_or_default()),
            trusted_networks: parse_trusted_networks(
                &std::env::var("FDINSIGHTS_TRUSTED_NETWORKS").unwrap_or_default(),
            ),
        }
    }
}

fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Shared application state (read-only across requests)
pub struct AppState {
    pub config: ServerConfig,
    pub settings: Settings,
    pub gateway: InsightGateway<AIClient>,
}

impl AppState {
    pub fn new(config: ServerConfig, settings: Settings, ai: Option<AIClient>) -> Self {
        Self {
            config,
            settings,
            gateway: InsightGateway::with_backend(ai),
        }
    }

    /// Load settings and pick the AI backend from environment variables
    pub fn from_env(config: ServerConfig) -> Self {
        let settings = Settings::load().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load settings, using defaults");
            Settings::default()
        });
        let ai = AIClient::from_env_with_settings(&settings);
        Self::new(config, settings, ai)
    }

    pub fn ai(&self) -> Option<&AIClient> {
        self.gateway.backend()
    }
}

/// Authentication middleware - trusted networks or API keys
///
/// The client IP comes from the TCP peer address only; forwarding headers
/// are not consulted. API keys are compared in constant time.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.require_auth {
        return next.run(request).await;
    }

    if let Some(ip) = connect_info.map(|ci| ci.0.ip()) {
        if is_ip_trusted(&ip, &state.config.trusted_networks) {
            tracing::debug!(ip = %ip, path = %request.uri().path(), "Authenticated via trusted network");
            return next.run(request).await;
        }
    }

    let api_key_valid = request
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|key| validate_api_key(key, &state.config.api_keys))
        .unwrap_or(false);

    if api_key_valid {
        tracing::debug!(path = %request.uri().path(), "Authenticated via API key");
        return next.run(request).await;
    }

    warn!(path = %request.uri().path(), "Unauthorized request - no valid auth");
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "Authentication required"
        })),
    )
        .into_response()
}

/// Check an API key against the configured keys in constant time
fn validate_api_key(provided: &str, valid_keys: &[String]) -> bool {
    use subtle::ConstantTimeEq;

    let provided = provided.as_bytes();
    valid_keys.iter().any(|key| {
        let key = key.as_bytes();
        key.len() == provided.len() && bool::from(provided.ct_eq(key))
    })
}

fn is_ip_trusted(ip: &IpAddr, trusted_networks: &[ipnet::IpNet]) -> bool {
    trusted_networks.iter().any(|network| network.contains(ip))
}

/// Parse a comma-separated list of IP addresses and CIDR networks
///
/// Examples:
/// - "192.168.1.0/24" - entire subnet
/// - "10.0.0.5" - single IP (parsed as /32 for IPv4 or /128 for IPv6)
/// - "192.168.1.0/24,10.0.0.0/8" - multiple networks
pub fn parse_trusted_networks(input: &str) -> Vec<ipnet::IpNet> {
    input
        .split(',')
        .filter_map(|s| {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            if let Ok(net) = s.parse::<ipnet::IpNet>() {
                return Some(net);
            }
            if let Ok(ip) = s.parse::<IpAddr>() {
                return Some(ipnet::IpNet::from(ip));
            }
            warn!(input = s, "Failed to parse trusted network entry");
            None
        })
        .collect()
}

/// Create the application router with the backend selected by environment
/// variables and settings from the data directory
pub fn create_router(static_dir: Option<&str>, config: ServerConfig) -> Router {
    create_router_with_state(AppState::from_env(config), static_dir)
}

/// Create the application router around prepared state (for testing)
pub fn create_router_with_state(state: AppState, static_dir: Option<&str>) -> Router {
    let config = state.config.clone();
    let state = Arc::new(state);

    let protected_routes = Router::new()
        .route("/calculate", post(handlers::calculate))
        .route("/insights", post(handlers::generate_insights))
        .route("/frequencies", get(handlers::list_frequencies))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes);

    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let cors = if config.allowed_origins.is_empty() {
        // Same-origin only
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; connect-src 'self'; frame-ancestors 'none'",
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state);

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ))
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!("⚠️  Authentication disabled - do not expose to network!");
    }

    let state = AppState::from_env(config);
    check_ai_connection(state.ai()).await;

    let app = create_router_with_state(state, static_dir)
        .into_make_service_with_connect_info::<SocketAddr>();
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log AI backend connection status
async fn check_ai_connection(ai: Option<&AIClient>) {
    match ai {
        Some(client) => {
            if client.health_check().await {
                info!(
                    "✅ AI backend connected: {} (model: {})",
                    client.host(),
                    client.model()
                );
            } else {
                warn!(
                    "⚠️  AI backend configured but not responding: {} (model: {})",
                    client.host(),
                    client.model()
                );
            }
        }
        None => {
            info!("ℹ️  AI backend not configured (set OLLAMA_HOST to enable insights)");
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
///
/// Carries only client-facing text.
pub struct AppError {
    status: StatusCode,
    message: String,
    fields: Vec<FieldError>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldError>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            fields: vec![],
        }
    }

    /// 400 carrying every rejected field
    pub fn invalid_input(errors: &ValidationErrors) -> Self {
        Self {
            fields: errors.fields().to_vec(),
            ..Self::bad_request("Invalid input.")
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            fields: self.fields,
        });

        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests;
