//! Downstream handlers reached once a request gets past the injectors.
//!
//! # Responsibilities
//! - Echo requests back as JSON when no upstream is configured
//! - Forward requests to a configured upstream otherwise
//! - Apply timeout and trace layers to whichever is used

use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        uri::{Authority, InvalidUri, PathAndQuery, Scheme},
        StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    Json, Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde::Serialize;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::UpstreamConfig;
use crate::injector::{ContextTag, Handler, InjectorTrail};

/// Body returned by the echo downstream.
#[derive(Debug, Serialize)]
pub struct EchoResponse {
    pub method: String,
    pub path: String,
    /// Context tags the request picked up on its way through the injectors.
    pub injectors: Vec<&'static str>,
}

async fn echo(request: Request) -> Json<EchoResponse> {
    let injectors = InjectorTrail::of(&request)
        .map(|trail| trail.tags().iter().map(ContextTag::as_str).collect())
        .unwrap_or_default();

    Json(EchoResponse {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        injectors,
    })
}

/// Router answering every request with an [`EchoResponse`].
pub fn echo_router() -> Router {
    Router::new().fallback(echo)
}

#[derive(Clone)]
struct UpstreamState {
    client: Client<HttpConnector, Body>,
    authority: Authority,
}

async fn forward(State(state): State<UpstreamState>, request: Request) -> Response {
    let (mut parts, body) = request.into_parts();

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(state.authority.clone());
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = match Uri::from_parts(uri_parts) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to build upstream URI");
            return (StatusCode::BAD_GATEWAY, "Invalid upstream URI").into_response();
        }
    };

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(upstream = %state.authority, error = %e, "Upstream error");
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

/// Router forwarding every request to `address` (e.g. "127.0.0.1:3000").
pub fn upstream_router(address: &str) -> Result<Router, InvalidUri> {
    let authority: Authority = address.parse()?;
    let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

    Ok(Router::new()
        .fallback(forward)
        .with_state(UpstreamState { client, authority }))
}

/// Build the downstream handler described by `config`.
#[allow(deprecated)]
pub fn build_downstream(config: &UpstreamConfig) -> Result<Handler, InvalidUri> {
    let router = match &config.address {
        Some(address) => {
            tracing::info!(upstream = %address, "Forwarding to upstream");
            upstream_router(address)?
        }
        None => {
            tracing::info!("No upstream configured, echoing requests");
            echo_router()
        }
    };

    let router = router
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeout_secs)))
        .layer(TraceLayer::new_for_http());

    Ok(Handler::from_service(router))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::injector::{ChainInjector, Injector, SlowInjector};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_echo_reports_trail() {
        let downstream = build_downstream(&UpstreamConfig::default()).unwrap();
        let chain = ChainInjector::new([
            Arc::new(SlowInjector::disabled(Duration::ZERO)) as Arc<dyn Injector>
        ]);

        let req = Request::builder()
            .method("POST")
            .uri("/orders?id=1")
            .body(Body::empty())
            .unwrap();
        let res = chain.wrap(downstream).handle(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = axum::body::to_bytes(res.into_body(), 64 * 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["method"], "POST");
        assert_eq!(json["path"], "/orders");
        assert_eq!(json["injectors"], serde_json::json!(["chain", "slow-skipped"]));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_bad_gateway() {
        // Port 9 (discard) is not expected to be listening on loopback.
        let config = UpstreamConfig {
            address: Some("127.0.0.1:9".into()),
            timeout_secs: 5,
        };
        let downstream = build_downstream(&config).unwrap();

        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let res = downstream.handle(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_invalid_upstream_address() {
        assert!(upstream_router("not a host").is_err());
    }
}
