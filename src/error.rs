//! Error types for the DFR MCP Server
//!
//! This module defines the error hierarchy for all operations in the server.

use thiserror::Error;

/// Main error type for the DFR MCP Server
#[derive(Error, Debug)]
pub enum DfrMcpError {
    /// Project filesystem errors
    #[error("Project error: {0}")]
    Project(#[from] ProjectError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// MCP protocol errors
    #[error("MCP protocol error: {0}")]
    Mcp(#[from] McpError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while reading the project tree
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Filesystem error at {path}: {source}")]
    FileSystem {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid argument: {name} - {message}")]
    InvalidArgument { name: String, message: String },
}

impl ProjectError {
    /// Wrap an I/O failure on `path`
    pub fn file_system(path: &std::path::Path, source: std::io::Error) -> Self {
        ProjectError::FileSystem {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        ProjectError::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Project root not found: {path}")]
    RootNotFound { path: String },

    #[error("Project root is not a directory: {path}")]
    RootNotDirectory { path: String },
}

/// MCP protocol errors
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Invalid tool arguments: {message}")]
    InvalidArguments { message: String },
}

/// Result type alias for DFR MCP operations
pub type Result<T> = std::result::Result<T, DfrMcpError>;
