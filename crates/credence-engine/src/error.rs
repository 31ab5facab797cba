//! Error types for the engine facade

use crate::config::ConfigError;
use credence_lifecycle::LifecycleError;
use thiserror::Error;

/// Errors surfaced by [`Engine`](crate::Engine)
#[derive(Error, Debug)]
pub enum EngineError {
    /// Lifecycle rejected the operation
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
