//! Axum-based HTTP front end for the deck protocol.
//!
//! The transport is deliberately thin: one command per request, plain text
//! in and out.
//!
//! - POST `/cmd` - body is one protocol line; the response body is the
//!   `OK`/`ERR` reply line
//! - GET `/state` - the GET report line, without going through the parser
//! - GET `/health` - fixed `OK V1 HEALTH`, never touches hardware
//!
//! Error categories map to status codes: SYNTAX/NAME/TYPE/RANGE/STATE are
//! 400, INTERNAL is 500, unknown routes are 404 `ERR V1 NOTFOUND`.
//!
//! Command execution can block for seconds (actuator moves), so handlers
//! run it under `spawn_blocking`; concurrent requests queue on the deck
//! lock in arrival order.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::WebConfig;
use crate::error::DeckError;
use crate::protocol::{render_error, Reply};
use crate::traits::{Delay, GpioBank};

use super::shared::SharedDeck;

// ============================================================================
// Route Handlers
// ============================================================================

/// Build a plain-text protocol response, newline-terminated.
fn text_line(status: StatusCode, line: String) -> impl IntoResponse {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        line + "\n",
    )
}

fn status_for(err: &DeckError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// POST /cmd - execute one protocol line.
async fn post_cmd<G, D>(
    State(deck): State<Arc<SharedDeck<G, D>>>,
    body: Bytes,
) -> impl IntoResponse
where
    G: GpioBank + Send + 'static,
    D: Delay + Send + 'static,
{
    let Ok(line) = std::str::from_utf8(&body) else {
        let err = DeckError::Syntax("body is not valid UTF-8".into());
        return text_line(status_for(&err), render_error(&err));
    };
    let line = line.to_owned();

    // Actuator moves block for seconds; keep them off the async runtime.
    let result = tokio::task::spawn_blocking(move || deck.handle_line(&line)).await;

    match result {
        Ok(Ok(reply)) => text_line(StatusCode::OK, reply.render()),
        Ok(Err(err)) => text_line(status_for(&err), render_error(&err)),
        Err(join_err) => {
            let err = DeckError::internal(join_err);
            text_line(status_for(&err), render_error(&err))
        }
    }
}

/// GET /state - read-only state report.
async fn get_state<G, D>(State(deck): State<Arc<SharedDeck<G, D>>>) -> impl IntoResponse
where
    G: GpioBank + Send + 'static,
    D: Delay + Send + 'static,
{
    // The lock may be held by an in-flight move; block off-runtime.
    let result = tokio::task::spawn_blocking(move || deck.state()).await;

    match result {
        Ok(state) => text_line(StatusCode::OK, Reply::Status(state).render()),
        Err(join_err) => {
            let err = DeckError::internal(join_err);
            text_line(status_for(&err), render_error(&err))
        }
    }
}

/// GET /health - fixed payload, no hardware access.
async fn health() -> impl IntoResponse {
    text_line(StatusCode::OK, Reply::Health.render())
}

/// Fallback handler for unknown routes.
async fn not_found() -> impl IntoResponse {
    text_line(StatusCode::NOT_FOUND, "ERR V1 NOTFOUND".to_string())
}

// ============================================================================
// Server Builder
// ============================================================================

/// Configuration for the web server.
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    /// Address to bind to.
    pub addr: SocketAddr,
    /// Whether to enable CORS for all origins.
    pub cors_permissive: bool,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_permissive: true,
        }
    }
}

impl WebServerConfig {
    /// Create a new config with the given address.
    pub fn new(addr: impl Into<SocketAddr>) -> Self {
        Self {
            addr: addr.into(),
            ..Default::default()
        }
    }

    /// Set whether CORS should be permissive.
    pub fn cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Create from the shared [`WebConfig`].
    pub fn from_config(config: &WebConfig) -> Self {
        Self {
            addr: ([0, 0, 0, 0], config.port).into(),
            cors_permissive: config.cors_permissive,
        }
    }
}

/// Build the Axum router with all routes.
pub fn build_router<G, D>(deck: Arc<SharedDeck<G, D>>, config: &WebServerConfig) -> Router
where
    G: GpioBank + Send + 'static,
    D: Delay + Send + 'static,
{
    let mut router = Router::new()
        .route("/cmd", post(post_cmd::<G, D>))
        .route("/state", get(get_state::<G, D>))
        .route("/health", get(health))
        .fallback(not_found)
        .with_state(deck);

    if config.cors_permissive {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}

/// Start the web server with shared deck state.
///
/// Blocks until the listener shuts down. The caller keeps its own
/// `Arc<SharedDeck>` clone for signal-driven shutdown.
pub async fn run_server<G, D>(
    deck: Arc<SharedDeck<G, D>>,
    config: WebServerConfig,
) -> Result<(), std::io::Error>
where
    G: GpioBank + Send + 'static,
    D: Delay + Send + 'static,
{
    let router = build_router(Arc::clone(&deck), &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("deck server listening on http://{}", config.addr);

    axum::serve(listener, router).await
}
