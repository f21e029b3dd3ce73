//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router and application state
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve over TLS (with connection introspection) or plaintext
//! - Gate every request against the threat cache
//! - Dispatch fire-and-forget scoring for admitted requests
//! - Forward admitted requests to the upstream chosen by Host header

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, State},
    http::{header, request::Parts, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Extension, Router,
};
use axum_server::Handle;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::content::KeyPath;
use crate::gate::{self, Verdict};
use crate::http::request::{x_request_id, MakeRequestUuid};
use crate::net::tls::load_tls_config;
use crate::net::{ConnMeta, PlainMetaAcceptor, TlsMetaAcceptor};
use crate::observability::metrics;
use crate::routing::RouteDecision;
use crate::scoring::{RequestSnapshot, ScorerClient, ThreatCache};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: ThreatCache,
    pub scorer: Arc<ScorerClient>,
    pub client: Client<HttpConnector, Body>,
    pub content_paths: Arc<Vec<KeyPath>>,
    pub frontend_hostname: String,
    pub frontend_url: String,
    pub backend_url: String,
    pub threshold: f64,
    pub max_body_size: usize,
}

/// HTTP server for the threat-gated proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    cache: ThreatCache,
}

impl HttpServer {
    /// Create a new server from a validated configuration and the compiled
    /// content key paths.
    pub fn new(config: ProxyConfig, content_paths: Vec<KeyPath>) -> Self {
        let cache = ThreatCache::new();
        let scorer = Arc::new(ScorerClient::new(
            &config.scoring.detector_url,
            cache.clone(),
        ));

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            cache: cache.clone(),
            scorer,
            client,
            content_paths: Arc::new(content_paths),
            frontend_hostname: config.upstreams.frontend_hostname.clone(),
            frontend_url: config
                .upstreams
                .frontend_url
                .trim_end_matches('/')
                .to_string(),
            backend_url: config
                .upstreams
                .backend_url
                .trim_end_matches('/')
                .to_string(),
            threshold: config.scoring.threshold,
            max_body_size: config.listener.max_body_size,
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            cache,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(SetRequestIdLayer::new(x_request_id(), MakeRequestUuid))
                    .layer(PropagateRequestIdLayer::new(x_request_id()))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.listener.request_timeout_secs,
                    ))),
            )
    }

    /// The shared threat cache backing this server.
    pub fn cache(&self) -> ThreatCache {
        self.cache.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Run the server until a shutdown signal arrives.
    pub async fn run(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .listener
            .bind_address
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        let handle = Handle::new();
        tokio::spawn(shutdown_signal(handle.clone()));

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        match &self.config.listener.tls {
            Some(tls) => {
                let rustls_config =
                    load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path)).await?;
                tracing::info!(address = %addr, "HTTPS server starting");
                axum_server::bind(addr)
                    .handle(handle)
                    .acceptor(TlsMetaAcceptor::new(rustls_config))
                    .serve(app)
                    .await?;
            }
            None => {
                tracing::info!(address = %addr, "HTTP server starting");
                axum_server::bind(addr)
                    .handle(handle)
                    .acceptor(PlainMetaAcceptor::new())
                    .serve(app)
                    .await?;
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }
}

/// Main proxy handler.
/// Gates on the cached threat score, dispatches scoring, forwards upstream.
async fn proxy_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Extension(conn): Extension<ConnMeta>,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let request_number = conn.next_request_number();
    let method = request.method().to_string();
    let client_ip = peer.ip().to_string();

    // Host header for h1; h2 carries :authority on the URI instead.
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| request.uri().authority().map(|a| a.as_str().to_string()))
        .unwrap_or_default();

    if let Verdict::Deny(reason) = gate::evaluate(&client_ip, &state.cache, state.threshold) {
        tracing::warn!(
            client_ip = %client_ip,
            reason = reason.as_str(),
            "Request denied"
        );
        metrics::record_denial(reason.as_str());
        metrics::record_request(
            &method,
            StatusCode::FORBIDDEN.as_u16(),
            "denied",
            start_time,
        );
        return StatusCode::FORBIDDEN.into_response();
    }

    let route = RouteDecision::select(&host, &state.frontend_hostname);

    tracing::debug!(
        client_ip = %client_ip,
        host = %host,
        route = route.as_str(),
        "Proxying request"
    );

    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(client_ip = %client_ip, error = %err, "Failed to buffer request body");
            metrics::record_request(
                &method,
                StatusCode::PAYLOAD_TOO_LARGE.as_u16(),
                route.as_str(),
                start_time,
            );
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let snapshot = RequestSnapshot::capture(
        &client_ip,
        &parts,
        &conn,
        request_number,
        &body_bytes,
        &state.content_paths,
    );
    let scorer = state.scorer.clone();
    tokio::spawn(async move {
        scorer.score(snapshot).await;
    });

    forward(&state, route, parts, body_bytes, start_time).await
}

/// Forward an admitted request to the selected upstream and relay the response.
async fn forward(
    state: &AppState,
    route: RouteDecision,
    parts: Parts,
    body: Bytes,
    start_time: Instant,
) -> Response {
    let method = parts.method.to_string();
    let upstream = match route {
        RouteDecision::Frontend => state.frontend_url.as_str(),
        RouteDecision::Backend => state.backend_url.as_str(),
    };

    let path_query = parts
        .uri
        .path_and_query()
        .map(|v| v.as_str())
        .unwrap_or_else(|| parts.uri.path());

    let uri = match Uri::try_from(format!("{}{}", upstream, path_query)) {
        Ok(uri) => uri,
        Err(err) => {
            tracing::error!(error = %err, upstream, "Failed to build upstream URI");
            metrics::record_request(&method, 500, route.as_str(), start_time);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut builder = Request::builder().method(parts.method.clone()).uri(uri);
    if let Some(headers) = builder.headers_mut() {
        for (name, value) in parts.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }
    }
    let upstream_request = match builder.body(Body::from(body)) {
        Ok(req) => req,
        Err(err) => {
            tracing::error!(error = %err, upstream, "Failed to build upstream request");
            metrics::record_request(&method, 500, route.as_str(), start_time);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match state.client.request(upstream_request).await {
        Ok(response) => {
            let status = response.status();
            metrics::record_request(&method, status.as_u16(), route.as_str(), start_time);
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body)).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, upstream, "Upstream request failed");
            metrics::record_request(&method, 502, route.as_str(), start_time);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

/// Wait for shutdown signal (Ctrl+C), then drain.
async fn shutdown_signal(handle: Handle) {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
    handle.graceful_shutdown(Some(Duration::from_secs(30)));
}
