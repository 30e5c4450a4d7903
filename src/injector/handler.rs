//! The request handler type injectors wrap and produce.
//!
//! A [`Handler`] is a cloneable async function from a request to either a
//! response or an [`Abort`]. It implements `tower::Service`, and any
//! infallible tower service (an `axum::Router`, for instance) can be turned
//! into one with [`Handler::from_service`].

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{Request, Response};
use futures_util::future::BoxFuture;
use thiserror::Error;
use tower::{Service, ServiceExt};

/// Outcome telling the hosting server to drop the connection without
/// writing a status line, headers or body.
///
/// This is an intended result of fault injection, not an application error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("request aborted by fault injection")]
pub struct Abort;

/// Result of invoking a [`Handler`].
pub type HandlerResult = Result<Response<Body>, Abort>;

type HandlerFn = dyn Fn(Request<Body>) -> BoxFuture<'static, HandlerResult> + Send + Sync;

/// A shareable request handler.
#[derive(Clone)]
pub struct Handler {
    inner: Arc<HandlerFn>,
}

impl Handler {
    /// Create a handler from an async function.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |req| -> BoxFuture<'static, HandlerResult> { Box::pin(f(req)) }),
        }
    }

    /// Adapt an infallible tower service into a downstream handler.
    pub fn from_service<S>(service: S) -> Self
    where
        S: Service<Request<Body>, Response = Response<Body>, Error = Infallible>
            + Clone
            + Send
            + Sync
            + 'static,
        S::Future: Send + 'static,
    {
        Self::new(move |req| {
            let service = service.clone();
            async move { Ok(service.oneshot(req).await.unwrap_or_else(|never| match never {})) }
        })
    }

    /// Invoke the handler for one request.
    pub fn handle(&self, req: Request<Body>) -> BoxFuture<'static, HandlerResult> {
        (self.inner)(req)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

impl Service<Request<Body>> for Handler {
    type Response = Response<Body>;
    type Error = Abort;
    type Future = BoxFuture<'static, HandlerResult>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        self.handle(req)
    }
}
