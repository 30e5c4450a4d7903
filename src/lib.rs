//! Composable HTTP fault injection.

pub mod config;
pub mod error;
pub mod http;
pub mod injector;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::schema::FaultConfig;
pub use error::FaultError;
pub use http::FaultServer;
pub use injector::{Handler, Injector, Reporter};
pub use lifecycle::Shutdown;
