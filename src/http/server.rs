//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, concurrency limit)
//! - Swap mirror settings when a reloaded config arrives
//! - Serve until the shutdown signal fires

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ListenerConfig, MirrorConfig, MirrorSettings};
use crate::handler::{HandlerError, HeaderMirror};
use crate::http::invoke::invoke_handler;
use crate::http::middleware::mirror_host_middleware;
use crate::http::request::{UuidRequestId, X_REQUEST_ID};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub mirror: Arc<ArcSwap<HeaderMirror>>,
    pub metrics: Option<PrometheusHandle>,
}

/// HTTP server hosting the handler.
pub struct HttpServer {
    router: Router,
    config: MirrorConfig,
    mirror: Arc<ArcSwap<HeaderMirror>>,
}

impl HttpServer {
    /// Create a server without a metrics endpoint.
    pub fn new(config: MirrorConfig) -> Result<Self, HandlerError> {
        Self::with_metrics(config, None)
    }

    /// Create a server; `/metrics` renders from `metrics` when given.
    pub fn with_metrics(
        config: MirrorConfig,
        metrics: Option<PrometheusHandle>,
    ) -> Result<Self, HandlerError> {
        let mirror = Arc::new(ArcSwap::from_pointee(HeaderMirror::from_settings(
            &config.mirror,
        )?));

        let state = AppState {
            mirror: mirror.clone(),
            metrics,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            mirror,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &MirrorConfig, state: AppState) -> Router {
        let live = Router::new()
            .route("/", any(echo_handler))
            .route("/{*path}", any(echo_handler))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                mirror_host_middleware,
            ));

        Router::new()
            .route("/invoke", post(invoke_handler))
            .route("/health", get(health_handler))
            .route("/config", get(config_handler))
            .route("/metrics", get(metrics_handler))
            .merge(live)
            .with_state(state)
            .layer(GlobalConcurrencyLimitLayer::new(
                config.listener.max_connections,
            ))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configs received on `config_updates` replace the active mirror rule.
    /// Returns once `shutdown` fires and in-flight requests have drained.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<MirrorConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            source = %self.config.mirror.source_header,
            target = %self.config.mirror.target_header,
            on_missing = %self.config.mirror.on_missing,
            "HTTP server starting"
        );

        let mirror = self.mirror.clone();
        let listener_config = self.config.listener.clone();
        tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                apply_reload(&mirror, &listener_config, &new_config);
            }
        });

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config the server was started with.
    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    /// Shared handle to the active mirror rule.
    pub fn mirror(&self) -> Arc<ArcSwap<HeaderMirror>> {
        self.mirror.clone()
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

fn apply_reload(
    mirror: &ArcSwap<HeaderMirror>,
    listener: &ListenerConfig,
    new_config: &MirrorConfig,
) {
    match HeaderMirror::from_settings(&new_config.mirror) {
        Ok(new_mirror) => {
            tracing::info!(
                source = %new_mirror.source(),
                target = %new_mirror.target(),
                on_missing = %new_mirror.on_missing(),
                "Mirror settings reloaded"
            );
            mirror.store(Arc::new(new_mirror));
        }
        Err(e) => {
            tracing::error!("Rejected reloaded mirror settings: {}", e);
        }
    }

    if &new_config.listener != listener {
        tracing::warn!("Listener settings changed; restart required to apply them");
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn config_handler(State(state): State<AppState>) -> Json<MirrorSettings> {
    Json(state.mirror.load().settings())
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "Metrics disabled").into_response(),
    }
}

/// What the live route saw after the middleware ran.
#[derive(Debug, Serialize, Deserialize)]
pub struct EchoResponse {
    pub method: String,
    pub path: String,
    pub headers: BTreeMap<String, Vec<String>>,
}

async fn echo_handler(request: Request<Body>) -> Json<EchoResponse> {
    let mut headers: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in request.headers() {
        headers
            .entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }

    Json(EchoResponse {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        headers,
    })
}
