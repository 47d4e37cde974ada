//! Error types for puppet_rig

use crate::loader::LoadError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised around inflation: configuration, loading and rig wiring
///
/// Inflation itself never fails; it prunes what it cannot use.
#[derive(Error, Debug)]
pub enum RigError {
    /// Failed to read a configuration file
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a configuration file
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Two templates registered for the same node name
    #[error("template already registered for node '{0}'")]
    DuplicateTemplate(String),

    /// Failed to load a model
    #[error("model load failed: {0}")]
    Load(#[from] LoadError),

    /// The rig already inflated a model
    #[error("model already inflated for this rig")]
    AlreadyInflated,
}

/// Result type for puppet_rig operations
pub type Result<T> = std::result::Result<T, RigError>;
