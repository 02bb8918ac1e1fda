//! HTTP server and graceful shutdown.
//!
//! # Graceful shutdown and Kubernetes
//!
//! When Kubernetes terminates a pod it sends **SIGTERM** and waits
//! `terminationGracePeriodSeconds` (default 30 s) before sending SIGKILL.
//!
//! The server reacts by:
//! 1. Immediately stopping `listener.accept()`, so no new connections are made.
//! 2. Telling every open connection to shut down gracefully: idle keep-alive
//!    connections close at once, in-flight requests run to completion.
//! 3. Returning from [`Server::serve`], which lets `main` exit cleanly.
//!
//! # One request, one recorder
//!
//! Each request body is collected in full, then the application handler runs
//! synchronously against a fresh [`Recorder`]. Whatever the recorder holds
//! when the handler returns is the response. A handler that panics takes its
//! connection task down with it; the listener keeps running.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::error::Error;
use crate::handler::Handler;
use crate::request::Request;
use crate::response::{Recorder, ResponseWriter};

/// The HTTP server.
pub struct Server {
    addr: String,
}

impl Server {
    /// Configures the server to bind to `addr` (`host:port`) when
    /// [`serve`](Server::serve) is called. The address is parsed at serve
    /// time; a bad one surfaces as [`Error::Addr`].
    ///
    /// ```rust,no_run
    /// use wildroute::Server;
    /// let server = Server::bind("0.0.0.0:3000");
    /// ```
    pub fn bind(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    /// Starts accepting connections and dispatching them to `app`.
    ///
    /// Returns only after a full graceful shutdown (SIGTERM or Ctrl-C,
    /// followed by all in-flight requests completing).
    pub async fn serve(self, app: impl Handler) -> Result<(), Error> {
        self.serve_with_shutdown(app, shutdown_signal()).await
    }

    /// Like [`serve`](Server::serve), but stops when `signal` resolves.
    pub async fn serve_with_shutdown(
        self,
        app: impl Handler,
        signal: impl Future<Output = ()>,
    ) -> Result<(), Error> {
        let addr: SocketAddr = self.addr.parse()?;
        let listener = TcpListener::bind(addr).await?;
        serve_listener(listener, app, signal).await
    }
}

/// Serves `app` on an already-bound listener until `signal` resolves.
///
/// Useful when the port is chosen by the OS (`127.0.0.1:0`) and the caller
/// needs `listener.local_addr()` before serving starts.
pub async fn serve_listener(
    listener: TcpListener,
    app: impl Handler,
    signal: impl Future<Output = ()>,
) -> Result<(), Error> {
    let app: Arc<dyn Handler> = Arc::new(app);

    info!(addr = %listener.local_addr()?, "wildroute listening");

    // Tracks every connection task so shutdown can wait for them.
    let mut tasks = tokio::task::JoinSet::new();
    // Fans the shutdown out to every connection task.
    let (stop_tx, stop_rx) = watch::channel(());

    tokio::pin!(signal);

    loop {
        tokio::select! {
            // Shutdown first: a pending signal stops accepting even when
            // more connections are queued.
            biased;

            () = &mut signal => {
                info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                break;
            }

            res = listener.accept() => {
                let (stream, remote_addr) = match res {
                    Ok(v) => v,
                    Err(e) => {
                        error!("accept error: {e}");
                        continue;
                    }
                };

                let app = Arc::clone(&app);
                let io = TokioIo::new(stream);
                let mut stop = stop_rx.clone();

                tasks.spawn(async move {
                    // Called once per request on the connection.
                    let svc = service_fn(move |req| {
                        let app = Arc::clone(&app);
                        async move { dispatch(app, req, remote_addr).await }
                    });

                    // HTTP/1.1 or HTTP/2, whatever the client negotiates.
                    let builder = ConnBuilder::new(TokioExecutor::new());
                    let conn = builder.serve_connection(io, svc);
                    tokio::pin!(conn);

                    let mut draining = false;
                    loop {
                        tokio::select! {
                            res = conn.as_mut() => {
                                if let Err(e) = res {
                                    error!(peer = %remote_addr, "connection error: {e}");
                                }
                                break;
                            }
                            // A closed channel means the server is gone too.
                            _ = stop.changed(), if !draining => {
                                draining = true;
                                conn.as_mut().graceful_shutdown();
                            }
                        }
                    }
                });
            }

            // Reap finished connection tasks so the JoinSet does not grow
            // without bound on long-running servers.
            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
        }
    }

    // No receivers left just means no open connections.
    let _ = stop_tx.send(());
    while tasks.join_next().await.is_some() {}

    info!("wildroute stopped");
    Ok(())
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Collects the body, runs the handler, returns what it wrote.
///
/// Never fails: a body that cannot be read becomes `400`.
async fn dispatch(
    app: Arc<dyn Handler>,
    req: hyper::Request<hyper::body::Incoming>,
    remote_addr: SocketAddr,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let mut rec = Recorder::new();

    match body.collect().await {
        Ok(collected) => {
            let req = Request::from_parts(parts, collected.to_bytes());
            app.serve(&mut rec, &req);
        }
        Err(e) => {
            debug!(peer = %remote_addr, "failed to read request body: {e}");
            rec.write_header(StatusCode::BAD_REQUEST);
        }
    }

    Ok(rec.into_response())
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal the process receives.
///
/// On Unix this listens for both **SIGTERM** (sent by `kubectl` and the
/// Kubernetes control plane) and **SIGINT** (Ctrl-C, for local dev).
/// If a handler cannot be installed, that arm never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
