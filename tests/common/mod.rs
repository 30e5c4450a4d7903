//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use fault_proxy::config::FaultConfig;
use fault_proxy::http::{build_downstream, FaultServer};
use fault_proxy::lifecycle::Shutdown;
use fault_proxy::net::Listener;

/// Start a programmable mock backend with async support.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(addr: SocketAddr, f: F)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await.unwrap();
    let f = std::sync::Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let (status, body) = f().await;
                        let reason = StatusCode::from_u16(status)
                            .ok()
                            .and_then(|s| s.canonical_reason())
                            .unwrap_or("OK");

                        let response_str = format!(
                            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            reason,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// A fault proxy running in the background.
#[allow(dead_code)]
pub struct RunningProxy {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<FaultConfig>,
}

impl RunningProxy {
    #[allow(dead_code)]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Bind `addr` and serve `config` on it. The listener is bound before this
/// returns, so requests can be sent right away.
pub async fn start_fault_proxy(addr: SocketAddr, mut config: FaultConfig) -> RunningProxy {
    config.listener.bind_address = addr.to_string();

    let downstream = build_downstream(&config.upstream).unwrap();
    let listener = Listener::bind(&config.listener).await.unwrap();
    let server = FaultServer::new(config, downstream, None).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let (config_tx, config_updates) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    RunningProxy {
        addr,
        shutdown,
        config_updates: config_tx,
    }
}

/// Client without connection pooling, so every request opens a connection.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
