//! Construction-time errors for injectors.

use thiserror::Error;

/// Errors raised while building an injector.
///
/// These never occur during request handling; a caller that receives one
/// must not register the injector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaultError {
    /// The status code has no canonical reason phrase.
    #[error("not a valid http status code: {0}")]
    InvalidHttpCode(u16),
}
