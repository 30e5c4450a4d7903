//! HTTP server hosting the injector tree.
//!
//! # Responsibilities
//! - Build the injector tree from config and wrap the downstream with it
//! - Serve HTTP/1.1 and HTTP/2 connections from a bounded listener
//! - Swap in a rebuilt tree when a new config arrives
//! - Close the connection without a response when an injector aborts

use std::error::Error as StdError;
use std::net::SocketAddr;
use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::body::Body;
use axum::http::Request;
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc};

use crate::config::{FaultConfig, InjectorConfig};
use crate::error::FaultError;
use crate::injector::{Abort, Handler, Reporter};
use crate::net::{ConnectionPermit, Listener, ListenerError};
use crate::observability::metrics;

/// Error type for the server loop.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Fault(#[from] FaultError),
}

/// Serves requests through the configured injector tree.
pub struct FaultServer {
    config: FaultConfig,
    downstream: Handler,
    reporter: Option<Arc<dyn Reporter>>,
    current: Arc<ArcSwap<Handler>>,
}

impl FaultServer {
    /// Build the injector tree for `config` around `downstream`.
    ///
    /// `reporter`, when given, is attached to every leaf injector.
    pub fn new(
        config: FaultConfig,
        downstream: Handler,
        reporter: Option<Arc<dyn Reporter>>,
    ) -> Result<Self, FaultError> {
        let handler = build_handler(&config.injector, &downstream, reporter.as_ref())?;
        Ok(Self {
            config,
            downstream,
            reporter,
            current: Arc::new(ArcSwap::from_pointee(handler)),
        })
    }

    /// Replace the running injector tree.
    ///
    /// Requests already in flight finish on the tree they started with.
    pub fn reload(&self, injector: &InjectorConfig) -> Result<(), FaultError> {
        let handler = build_handler(injector, &self.downstream, self.reporter.as_ref())?;
        self.current.store(Arc::new(handler));
        tracing::info!(injector = injector.kind(), "Injector tree reloaded");
        Ok(())
    }

    /// The handler new requests are currently dispatched to.
    pub fn handler(&self) -> Arc<Handler> {
        self.current.load_full()
    }

    pub fn config(&self) -> &FaultConfig {
        &self.config
    }

    /// Accept connections until `shutdown` fires.
    ///
    /// Only the injector section of a config update is applied; listener
    /// and upstream changes need a restart.
    pub async fn run(
        mut self,
        listener: Listener,
        mut config_updates: mpsc::UnboundedReceiver<FaultConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            injector = self.config.injector.kind(),
            "Fault proxy starting"
        );

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer, permit)) => {
                        tokio::spawn(serve_connection(stream, peer, permit, self.current.clone()));
                    }
                    Err(e) => tracing::warn!(error = %e, "Failed to accept connection"),
                },
                Some(config) = config_updates.recv() => {
                    match self.reload(&config.injector) {
                        Ok(()) => self.config = config,
                        Err(e) => tracing::error!(error = %e, "Rejected config update"),
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received");
                    break;
                }
            }
        }

        tracing::info!("Fault proxy stopped");
        Ok(())
    }
}

fn build_handler(
    injector: &InjectorConfig,
    downstream: &Handler,
    reporter: Option<&Arc<dyn Reporter>>,
) -> Result<Handler, FaultError> {
    let injector = injector.build(reporter)?;
    Ok(injector.wrap(downstream.clone()))
}

async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    _permit: ConnectionPermit,
    current: Arc<ArcSwap<Handler>>,
) {
    let service = service_fn(move |request: Request<Incoming>| {
        let handler = current.load_full();
        async move {
            metrics::record_request();
            let result = handler.handle(request.map(Body::new)).await;
            if result.is_err() {
                metrics::record_abort();
            }
            result
        }
    });

    let builder = auto::Builder::new(TokioExecutor::new());
    if let Err(err) = builder.serve_connection(TokioIo::new(stream), service).await {
        if is_abort(&*err) {
            tracing::debug!(peer = %peer, "Connection dropped by injector");
        } else {
            tracing::debug!(peer = %peer, error = %err, "Connection closed with error");
        }
    }
}

fn is_abort(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<Abort>() {
            return true;
        }
        current = e.source();
    }
    false
}
