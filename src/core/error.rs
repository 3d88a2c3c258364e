//! Error types for the plugin runtime.

use thiserror::Error;

/// Result type alias for plugin runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading plugins or resolving extensions.
#[derive(Error, Debug)]
pub enum Error {
    // Lifecycle errors
    #[error("Plugin initialization failed: {0}")]
    Initialization(String),

    #[error("Plugin {plugin}: cannot {action} while {from}")]
    LifecycleMisuse {
        plugin: String,
        from: String,
        action: &'static str,
    },

    #[error("Plugin {0} is already loaded")]
    DuplicatePlugin(String),

    #[error("Plugin not found: {0}")]
    PluginNotFound(String),

    // Extension errors
    #[error("Extension {name} for {point} already declared by plugin {plugin}")]
    DuplicateExtension {
        point: String,
        plugin: String,
        name: String,
    },

    #[error("No executor provider registered for: {0}")]
    ExecutorNotFound(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_misuse_display() {
        let err = Error::LifecycleMisuse {
            plugin: "nf-amazon".to_string(),
            from: "stopped".to_string(),
            action: "start",
        };
        assert_eq!(err.to_string(), "Plugin nf-amazon: cannot start while stopped");
    }

    #[test]
    fn test_from_serde_json() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::SerializationError(_)));
    }
}
