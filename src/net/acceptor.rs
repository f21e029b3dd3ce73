//! Connection acceptors that capture per-connection metadata.
//!
//! # Responsibilities
//! - Run the TLS handshake (secured listener) or pass the stream through
//! - Record connection facts the scoring snapshot needs: establishment time,
//!   a per-connection request counter, and the negotiated TLS parameters
//! - Inject the metadata into every request on the connection via an
//!   extension layer
//!
//! # Design Decisions
//! - TLS facts are read off the rustls session once, right after the
//!   handshake, and shared immutably by all requests on the connection
//! - The request counter is an atomic shared by clones, so HTTP/1.1
//!   keep-alive requests on one connection observe increasing numbers

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum_server::accept::Accept;
use axum_server::tls_rustls::{RustlsAcceptor, RustlsConfig};
use futures_util::future::BoxFuture;
use rustls::HandshakeKind;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_rustls::server::TlsStream;
use tower_http::add_extension::AddExtension;

/// Negotiated TLS parameters of one connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsMeta {
    /// Protocol version code (e.g. 0x0304 for TLS 1.3).
    pub version: u16,
    pub handshake_complete: bool,
    pub did_resume: bool,
    /// Cipher suite code as negotiated.
    pub cipher_suite: u16,
    /// ALPN protocol, empty when none was negotiated.
    pub negotiated_protocol: String,
}

impl TlsMeta {
    fn from_connection(conn: &rustls::ServerConnection) -> Self {
        Self {
            version: conn.protocol_version().map(u16::from).unwrap_or(0),
            handshake_complete: !conn.is_handshaking(),
            did_resume: matches!(conn.handshake_kind(), Some(HandshakeKind::Resumed)),
            cipher_suite: conn
                .negotiated_cipher_suite()
                .map(|suite| u16::from(suite.suite()))
                .unwrap_or(0),
            negotiated_protocol: conn
                .alpn_protocol()
                .map(|proto| String::from_utf8_lossy(proto).into_owned())
                .unwrap_or_default(),
        }
    }
}

/// Per-connection metadata, cloned into every request's extensions.
#[derive(Debug, Clone)]
pub struct ConnMeta {
    established_unix: u64,
    requests: Arc<AtomicU64>,
    tls: Option<TlsMeta>,
}

impl ConnMeta {
    /// Metadata for a plaintext connection.
    pub fn plaintext() -> Self {
        Self::new(None)
    }

    /// Metadata for a TLS connection with the given negotiated parameters.
    pub fn secured(tls: TlsMeta) -> Self {
        Self::new(Some(tls))
    }

    fn new(tls: Option<TlsMeta>) -> Self {
        Self {
            established_unix: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            requests: Arc::new(AtomicU64::new(0)),
            tls,
        }
    }

    /// Unix timestamp of connection establishment, in seconds.
    pub fn established_unix(&self) -> u64 {
        self.established_unix
    }

    /// Negotiated TLS parameters, absent on plaintext connections.
    pub fn tls(&self) -> Option<&TlsMeta> {
        self.tls.as_ref()
    }

    /// Claim the next request number on this connection, starting at 1.
    pub fn next_request_number(&self) -> u64 {
        self.requests.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// TLS acceptor that records the negotiated session parameters.
#[derive(Clone)]
pub struct TlsMetaAcceptor {
    inner: RustlsAcceptor,
}

impl TlsMetaAcceptor {
    pub fn new(config: RustlsConfig) -> Self {
        Self {
            inner: RustlsAcceptor::new(config),
        }
    }
}

impl<I, S> Accept<I, S> for TlsMetaAcceptor
where
    I: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    S: Send + 'static,
{
    type Stream = TlsStream<I>;
    type Service = AddExtension<S, ConnMeta>;
    type Future = BoxFuture<'static, io::Result<(Self::Stream, Self::Service)>>;

    fn accept(&self, stream: I, service: S) -> Self::Future {
        let acceptor = self.inner.clone();
        Box::pin(async move {
            let (stream, service) = acceptor.accept(stream, service).await?;
            let (_, connection) = stream.get_ref();
            let meta = ConnMeta::secured(TlsMeta::from_connection(connection));
            Ok((stream, AddExtension::new(service, meta)))
        })
    }
}

/// Plaintext acceptor used when the listener has no TLS configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainMetaAcceptor;

impl PlainMetaAcceptor {
    pub fn new() -> Self {
        Self
    }
}

impl<I, S> Accept<I, S> for PlainMetaAcceptor
where
    I: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    S: Send + 'static,
{
    type Stream = I;
    type Service = AddExtension<S, ConnMeta>;
    type Future = std::future::Ready<io::Result<(Self::Stream, Self::Service)>>;

    fn accept(&self, stream: I, service: S) -> Self::Future {
        let meta = ConnMeta::plaintext();
        std::future::ready(Ok((stream, AddExtension::new(service, meta))))
    }
}
