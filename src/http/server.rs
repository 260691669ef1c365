//! HTTP transport adapter.
//!
//! # Responsibilities
//! - Bind the installed pipeline behind an Axum fallback route
//! - Convert transport requests/responses to and from toolkit types
//! - Apply the host policy for unhandled requests (404) and pipeline
//!   errors (500)
//! - Wire outer middleware (request timeout, trace spans) and graceful
//!   shutdown

use axum::body::Body;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::http::Request;
use crate::pipeline::{Flow, Handler};

/// Serves one pipeline over a TCP listener.
pub struct Server {
    handler: Arc<dyn Handler>,
    secure: bool,
    request_timeout: Duration,
}

#[derive(Clone)]
struct AppState {
    handler: Arc<dyn Handler>,
    secure: bool,
}

impl Server {
    pub fn new(handler: impl Handler + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
            secure: false,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Mark requests as arriving over an encrypted connection. Set this
    /// when a TLS terminator sits in front of the process; auth gates key
    /// off it.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Accept connections until ctrl-c / SIGTERM.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "http server starting");

        let state = AppState {
            handler: self.handler,
            secure: self.secure,
        };
        let app = Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(TimeoutLayer::new(self.request_timeout))
            .layer(TraceLayer::new_for_http());

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("http server stopped");
        Ok(())
    }
}

async fn dispatch(
    State(state): State<AppState>,
    req: axum::extract::Request<Body>,
) -> axum::response::Response {
    let request = Request::from_http(req, state.secure);
    let request_id = request.id().to_string();
    let path = request.path().to_string();

    match state.handler.handle(request).await {
        Ok(Flow::Handled(res)) => res.into_http(),
        Ok(Flow::Pass(_)) => {
            tracing::debug!(request_id = %request_id, path = %path, "no handler claimed the request");
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
        Err(err) => {
            tracing::error!(request_id = %request_id, path = %path, error = %err, "pipeline error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
