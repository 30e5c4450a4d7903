//! Short-circuit with a status code and its canonical text.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderValue, Response, StatusCode};

use crate::error::FaultError;

use super::handler::Handler;
use super::reporter::{InjectorState, Reporter, ReporterSlot};
use super::Injector;

/// Canonical reason phrase for a status code, if it has one.
pub fn status_text(code: u16) -> Option<&'static str> {
    StatusCode::from_u16(code).ok()?.canonical_reason()
}

/// Responds with a fixed status code and its reason phrase as the body.
#[derive(Debug)]
pub struct ErrorInjector {
    status: StatusCode,
    text: &'static str,
    reporter: ReporterSlot,
}

impl ErrorInjector {
    /// Fails with [`FaultError::InvalidHttpCode`] when `code` has no
    /// canonical reason phrase.
    pub fn new(code: u16) -> Result<Self, FaultError> {
        let status = StatusCode::from_u16(code).map_err(|_| FaultError::InvalidHttpCode(code))?;
        let text = status
            .canonical_reason()
            .ok_or(FaultError::InvalidHttpCode(code))?;

        Ok(Self {
            status,
            text,
            reporter: ReporterSlot::default(),
        })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_text(&self) -> &'static str {
        self.text
    }
}

fn error_response(status: StatusCode, text: &'static str) -> Response<Body> {
    let mut response = Response::new(Body::from(text));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    response
}

impl Injector for ErrorInjector {
    fn name(&self) -> &'static str {
        "Error Injector"
    }

    fn wrap(&self, _next: Handler) -> Handler {
        let name = self.name();
        let status = self.status;
        let text = self.text;
        let reporter = self.reporter.clone();
        Handler::new(move |_req| {
            let reporter = reporter.clone();
            async move {
                reporter.report(name, InjectorState::Started);
                tracing::debug!(status = status.as_u16(), "Injecting error response");
                Ok(error_response(status, text))
            }
        })
    }

    fn set_reporter(&self, reporter: Arc<dyn Reporter>) {
        self.reporter.set(reporter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::injector::testing::{body_text, request, Downstream, RecordingReporter};

    #[test]
    fn test_valid_codes_match_status_table() {
        for code in 100..=599u16 {
            match StatusCode::from_u16(code).ok().and_then(|s| s.canonical_reason()) {
                Some(expected) => {
                    let injector = ErrorInjector::new(code).unwrap();
                    assert_eq!(injector.status().as_u16(), code);
                    assert_eq!(injector.status_text(), expected);
                }
                None => {
                    assert_eq!(
                        ErrorInjector::new(code).unwrap_err(),
                        FaultError::InvalidHttpCode(code)
                    );
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_codes_rejected() {
        for code in [0u16, 42, 99, 600, 999, 1000, u16::MAX] {
            assert_eq!(
                ErrorInjector::new(code).unwrap_err(),
                FaultError::InvalidHttpCode(code)
            );
        }
        assert_eq!(status_text(299), None);
        assert_eq!(status_text(503), Some("Service Unavailable"));
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let downstream = Downstream::new();
        let reporter = Arc::new(RecordingReporter::default());
        let injector = ErrorInjector::new(404).unwrap();
        injector.set_reporter(reporter.clone());

        let res = injector
            .wrap(downstream.handler.clone())
            .handle(request())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            res.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_text(res).await, "Not Found");
        assert_eq!(downstream.calls(), 0);
        assert_eq!(
            reporter.events(),
            vec![("Error Injector".to_string(), InjectorState::Started)]
        );
    }
}
