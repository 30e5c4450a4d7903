//! Test doubles shared by the injector unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};

use super::context::InjectorTrail;
use super::handler::Handler;
use super::reporter::{InjectorState, Reporter};
use super::Injector;

/// Reporter remembering every event it saw.
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<(String, InjectorState)>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<(String, InjectorState)> {
        self.events.lock().unwrap().clone()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, source: &str, state: InjectorState) {
        self.events.lock().unwrap().push((source.to_string(), state));
    }
}

/// Downstream answering 200 "ok", counting calls and keeping the last trail.
pub struct Downstream {
    pub handler: Handler,
    pub calls: Arc<AtomicUsize>,
    pub last_trail: Arc<Mutex<Option<InjectorTrail>>>,
}

impl Downstream {
    pub fn new() -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let last_trail = Arc::new(Mutex::new(None));

        let c = calls.clone();
        let t = last_trail.clone();
        let handler = Handler::new(move |req: Request<Body>| {
            c.fetch_add(1, Ordering::SeqCst);
            *t.lock().unwrap() = InjectorTrail::of(&req).cloned();
            async { Ok(Response::new(Body::from("ok"))) }
        });

        Self {
            handler,
            calls,
            last_trail,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn trail(&self) -> Option<InjectorTrail> {
        self.last_trail.lock().unwrap().clone()
    }
}

/// Injector that appends its id to a shared log, then continues.
#[derive(Debug)]
pub struct Marker {
    pub id: usize,
    pub log: Arc<Mutex<Vec<usize>>>,
}

impl Injector for Marker {
    fn name(&self) -> &'static str {
        "Marker"
    }

    fn wrap(&self, next: Handler) -> Handler {
        let id = self.id;
        let log = self.log.clone();
        Handler::new(move |req| {
            log.lock().unwrap().push(id);
            next.handle(req)
        })
    }

    fn set_reporter(&self, _reporter: Arc<dyn Reporter>) {}
}

/// Injector answering with a fixed status without calling downstream.
#[derive(Debug)]
pub struct ShortCircuit(pub StatusCode);

impl Injector for ShortCircuit {
    fn name(&self) -> &'static str {
        "Short Circuit"
    }

    fn wrap(&self, _next: Handler) -> Handler {
        let status = self.0;
        Handler::new(move |_req| async move {
            let mut res = Response::new(Body::empty());
            *res.status_mut() = status;
            Ok(res)
        })
    }

    fn set_reporter(&self, _reporter: Arc<dyn Reporter>) {}
}

pub fn request() -> Request<Body> {
    Request::builder().uri("/").body(Body::empty()).unwrap()
}

pub async fn body_text(res: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(res.into_body(), 64 * 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
