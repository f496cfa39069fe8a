use crate::error::{AppError, AppResult};
use crate::proxy::config::ProxyConfig;
use crate::proxy::upstream::UpstreamClient;
use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

/// Axum application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub upstream: Arc<UpstreamClient>,
}

impl AppState {
    pub fn new(config: ProxyConfig) -> Self {
        let upstream = UpstreamClient::new(config.request_timeout, Some(&config.upstream_proxy));
        Self {
            config: Arc::new(config),
            upstream: Arc::new(upstream),
        }
    }
}

/// Build routes
pub fn build_router(state: AppState) -> Router {
    use crate::proxy::handlers::forward;

    let body_limit = state.config.body_limit;

    Router::new()
        .route(
            "/api/proxy",
            post(forward::handle_post)
                .get(forward::handle_query)
                .put(forward::handle_query)
                .patch(forward::handle_query)
                .delete(forward::handle_query),
        )
        .route("/healthz", get(health_check_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(
            crate::proxy::middleware::logging_middleware,
        ))
        .layer(crate::proxy::middleware::cors_layer())
        .with_state(state)
}

/// Axum server instance
pub struct AxumServer {
    shutdown_tx: Option<oneshot::Sender<()>>,
    pub local_addr: std::net::SocketAddr,
}

impl AxumServer {
    /// Start Axum server
    pub async fn start(config: ProxyConfig) -> AppResult<(Self, tokio::task::JoinHandle<()>)> {
        let addr = format!("{}:{}", config.get_bind_address(), config.port);
        let app = build_router(AppState::new(config));

        // Bind address
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::Server(format!("Failed to bind address {}: {}", addr, e)))?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Reverse proxy server started at http://{}", local_addr);

        // Create shutdown channel
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let server_instance = Self {
            shutdown_tx: Some(shutdown_tx),
            local_addr,
        };

        // Start server in new task
        let handle = tokio::spawn(async move {
            use hyper::server::conn::http1;
            use hyper_util::rt::TokioIo;
            use hyper_util::service::TowerToHyperService;

            loop {
                tokio::select! {
                    res = listener.accept() => {
                        match res {
                            Ok((stream, _)) => {
                                let io = TokioIo::new(stream);
                                let service = TowerToHyperService::new(app.clone());

                                tokio::task::spawn(async move {
                                    if let Err(err) = http1::Builder::new()
                                        .serve_connection(io, service)
                                        .await
                                    {
                                        debug!("Connection handling finished or errored: {:?}", err);
                                    }
                                });
                            }
                            Err(e) => {
                                error!("Failed to accept connection: {:?}", e);
                            }
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::info!("Reverse proxy server stopped listening");
                        break;
                    }
                }
            }
        });

        Ok((server_instance, handle))
    }

    /// Stop server
    pub fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Health check handler
async fn health_check_handler() -> Response {
    Json(serde_json::json!({
        "status": "ok"
    }))
    .into_response()
}
