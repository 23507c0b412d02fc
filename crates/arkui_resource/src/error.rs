//! Resource subsystem error types

use thiserror::Error;

use crate::platform::PlatformStatus;

/// Errors from loading resource data and configuration
///
/// Resolution calls on a [`ResourceAdapter`](crate::ResourceAdapter) never return these;
/// they degrade to typed defaults and record a diagnostic instead.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// A platform resource-manager call failed
    #[error("platform resource call failed: {0}")]
    Platform(#[from] PlatformStatus),

    /// Resource index content is inconsistent
    #[error("invalid resource index: {0}")]
    InvalidIndex(String),

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Failed to read a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for resource loading operations
pub type Result<T> = std::result::Result<T, ResourceError>;
