//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the fault proxy.
//! All types derive Serde traits for deserialization from config files.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FaultError;
use crate::injector::{
    ChainInjector, ErrorInjector, Injector, NoopInjector, RandomInjector, RejectInjector,
    Reporter, SlowInjector,
};

/// Root configuration for the fault proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct FaultConfig {
    /// Listener configuration (bind address, connection limit).
    pub listener: ListenerConfig,

    /// Where requests go once they make it through the injectors.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Injector tree applied to every request.
    pub injector: InjectorConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            max_connections: 1024,
        }
    }
}

/// Downstream target.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream address (e.g., "127.0.0.1:3000"). Without one the built-in
    /// echo handler answers.
    pub address: Option<String>,

    /// Total time allowed for the downstream response, in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: None,
            timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// One node of the injector tree.
///
/// ```toml
/// [injector]
/// type = "chain"
/// injectors = [{ type = "slow", delay_ms = 100 }, { type = "error", status = 503 }]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InjectorConfig {
    #[default]
    Noop,
    Reject,
    Error {
        status: u16,
    },
    Slow {
        delay_ms: u64,
        #[serde(default = "default_enabled")]
        enabled: bool,
    },
    Chain {
        #[serde(default)]
        injectors: Vec<InjectorConfig>,
    },
    Random {
        #[serde(default)]
        seed: Option<u64>,
        #[serde(default)]
        injectors: Vec<InjectorConfig>,
    },
}

fn default_enabled() -> bool {
    true
}

impl InjectorConfig {
    /// Short kind name as written in config files.
    pub fn kind(&self) -> &'static str {
        match self {
            InjectorConfig::Noop => "noop",
            InjectorConfig::Reject => "reject",
            InjectorConfig::Error { .. } => "error",
            InjectorConfig::Slow { .. } => "slow",
            InjectorConfig::Chain { .. } => "chain",
            InjectorConfig::Random { .. } => "random",
        }
    }

    /// Construct the injector tree, attaching `reporter` to every node.
    pub fn build(&self, reporter: Option<&Arc<dyn Reporter>>) -> Result<Arc<dyn Injector>, FaultError> {
        let injector: Arc<dyn Injector> = match self {
            InjectorConfig::Noop => Arc::new(NoopInjector::new()),
            InjectorConfig::Reject => Arc::new(RejectInjector::new()),
            InjectorConfig::Error { status } => Arc::new(ErrorInjector::new(*status)?),
            InjectorConfig::Slow { delay_ms, enabled } => {
                let duration = Duration::from_millis(*delay_ms);
                if *enabled {
                    Arc::new(SlowInjector::new(duration))
                } else {
                    Arc::new(SlowInjector::disabled(duration))
                }
            }
            InjectorConfig::Chain { injectors } => {
                Arc::new(ChainInjector::new(build_all(injectors, reporter)?))
            }
            InjectorConfig::Random { seed, injectors } => {
                let members = build_all(injectors, reporter)?;
                match seed {
                    Some(seed) => Arc::new(RandomInjector::with_seed(members, *seed)),
                    None => Arc::new(RandomInjector::new(members)),
                }
            }
        };

        if let Some(reporter) = reporter {
            injector.set_reporter(reporter.clone());
        }
        Ok(injector)
    }
}

fn build_all(
    configs: &[InjectorConfig],
    reporter: Option<&Arc<dyn Reporter>>,
) -> Result<Vec<Arc<dyn Injector>>, FaultError> {
    configs.iter().map(|config| config.build(reporter)).collect()
}
