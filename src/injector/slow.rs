//! Add latency before continuing downstream.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;

use super::context::{tag_request, ContextTag};
use super::handler::Handler;
use super::reporter::{InjectorState, Reporter, ReporterSlot};
use super::Injector;

/// Async delay function used by [`SlowInjector`].
pub type DelayFn = Arc<dyn Fn(Duration) -> BoxFuture<'static, ()> + Send + Sync>;

/// Waits a fixed duration, then continues the request.
///
/// The delay suspends only the current task. If the request future is
/// dropped (client gone, server shutting down) the delay is dropped with it.
pub struct SlowInjector {
    duration: Duration,
    delay: Option<DelayFn>,
    reporter: ReporterSlot,
}

impl SlowInjector {
    /// Delay using the tokio timer.
    pub fn new(duration: Duration) -> Self {
        Self::with_delay(duration, tokio::time::sleep)
    }

    /// Delay using a caller-supplied function, e.g. an instrumented one in tests.
    pub fn with_delay<F, Fut>(duration: Duration, delay: F) -> Self
    where
        F: Fn(Duration) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            duration,
            delay: Some(Arc::new(move |d| -> BoxFuture<'static, ()> { Box::pin(delay(d)) })),
            reporter: ReporterSlot::default(),
        }
    }

    /// Disabled mode: requests pass straight through, tagged `slow-skipped`,
    /// and nothing is reported.
    pub fn disabled(duration: Duration) -> Self {
        Self {
            duration,
            delay: None,
            reporter: ReporterSlot::default(),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_enabled(&self) -> bool {
        self.delay.is_some()
    }
}

impl fmt::Debug for SlowInjector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlowInjector")
            .field("duration", &self.duration)
            .field("enabled", &self.is_enabled())
            .field("reporter", &self.reporter)
            .finish()
    }
}

impl Injector for SlowInjector {
    fn name(&self) -> &'static str {
        "Slow Injector"
    }

    fn wrap(&self, next: Handler) -> Handler {
        let name = self.name();
        let duration = self.duration;
        let delay = self.delay.clone();
        let reporter = self.reporter.clone();
        Handler::new(move |mut req| {
            let next = next.clone();
            let delay = delay.clone();
            let reporter = reporter.clone();
            async move {
                match delay {
                    Some(delay) => {
                        reporter.report(name, InjectorState::Started);
                        delay(duration).await;
                        reporter.report(name, InjectorState::Finished);
                        tag_request(&mut req, ContextTag::SlowApplied);
                    }
                    None => tag_request(&mut req, ContextTag::SlowSkipped),
                }
                next.handle(req).await
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
    use crate::injector::testing::{request, Downstream, RecordingReporter};
    use std::sync::Mutex;
    use std::time::Instant;

    #[tokio::test]
    async fn test_delay_precedes_downstream() {
        let downstream = Downstream::new();
        let reporter = Arc::new(RecordingReporter::default());
        let injector = SlowInjector::new(Duration::from_millis(30));
        injector.set_reporter(reporter.clone());

        let start = Instant::now();
        let res = injector
            .wrap(downstream.handler.clone())
            .handle(request())
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(30));
        assert!(res.status().is_success());
        assert_eq!(downstream.calls(), 1);
        assert_eq!(downstream.trail().unwrap().latest(), Some(ContextTag::SlowApplied));
        assert_eq!(
            reporter.events(),
            vec![
                ("Slow Injector".to_string(), InjectorState::Started),
                ("Slow Injector".to_string(), InjectorState::Finished),
            ]
        );
    }

    #[tokio::test]
    async fn test_instrumented_delay_receives_exact_duration() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let injector = SlowInjector::with_delay(Duration::from_secs(5), move |d| {
            s.lock().unwrap().push(d);
            async {}
        });
        let downstream = Downstream::new();

        let handler = injector.wrap(downstream.handler.clone());
        handler.handle(request()).await.unwrap();
        handler.handle(request()).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![Duration::from_secs(5); 2]);
        assert_eq!(downstream.calls(), 2);
    }

    #[tokio::test]
    async fn test_disabled_passes_through_silently() {
        let downstream = Downstream::new();
        let reporter = Arc::new(RecordingReporter::default());
        let injector = SlowInjector::disabled(Duration::from_secs(60));
        injector.set_reporter(reporter.clone());
        assert!(!injector.is_enabled());

        let start = Instant::now();
        injector
            .wrap(downstream.handler.clone())
            .handle(request())
            .await
            .unwrap();

        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(downstream.calls(), 1);
        assert_eq!(downstream.trail().unwrap().tags(), &[ContextTag::SlowSkipped]);
        assert!(reporter.events().is_empty());
    }
}
