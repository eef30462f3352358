//! Configuration management for the DFR MCP Server
//!
//! Resolves the install root and the fixed project layout beneath it.

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, DfrMcpError, Result};

/// Environment variable overriding the install root
pub const ROOT_ENV_VAR: &str = "DFR_PROJECT_ROOT";

/// Configuration for the DFR MCP Server
#[derive(Debug, Clone)]
pub struct Config {
    /// Install root every layout directory is resolved against
    pub project_root: PathBuf,

    /// Directory holding the PRP documents
    pub documents_dir: PathBuf,

    /// Source directory summarized by `get-project-status`
    pub src_dir: PathBuf,

    /// Assets directory summarized by `get-project-status`
    pub assets_dir: PathBuf,

    /// Docs directory summarized by `get-project-status`
    pub docs_dir: PathBuf,
}

impl Config {
    /// Create a configuration, taking the root from `root`, then
    /// `DFR_PROJECT_ROOT`, then the current directory.
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let env_root = std::env::var(ROOT_ENV_VAR).ok();
        Self::from_root(Self::resolve_root(root, env_root)?)
    }

    /// Pick the install root from an explicit path, then the value of
    /// `DFR_PROJECT_ROOT`, then the current directory. Blank values count
    /// as unset.
    pub fn resolve_root(root: Option<PathBuf>, env_root: Option<String>) -> Result<PathBuf> {
        if let Some(root) = root {
            return Ok(root);
        }

        match env_root {
            Some(value) if !value.trim().is_empty() => Ok(PathBuf::from(value)),
            _ => std::env::current_dir().map_err(DfrMcpError::Io),
        }
    }

    /// Create a configuration rooted at an explicit directory
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();

        if !root.exists() {
            return Err(ConfigError::RootNotFound {
                path: root.display().to_string(),
            }
            .into());
        }
        if !root.is_dir() {
            return Err(ConfigError::RootNotDirectory {
                path: root.display().to_string(),
            }
            .into());
        }

        let project_root = root.canonicalize().map_err(DfrMcpError::Io)?;

        Ok(Self {
            documents_dir: project_root.join(layout::DOCUMENTS_DIR),
            src_dir: project_root.join(layout::SRC_DIR),
            assets_dir: project_root.join(layout::ASSETS_DIR),
            docs_dir: project_root.join(layout::DOCS_DIR),
            project_root,
        })
    }

    /// Check if the documents directory exists
    pub fn documents_dir_exists(&self) -> bool {
        self.documents_dir.is_dir()
    }
}

/// Fixed project layout
pub mod layout {
    /// Directory of PRP documents, relative to the install root
    pub const DOCUMENTS_DIR: &str = "PRPs";

    pub const SRC_DIR: &str = "src";
    pub const ASSETS_DIR: &str = "assets";
    pub const DOCS_DIR: &str = "docs";

    /// Suffix a document must carry to be listed
    pub const DOCUMENT_SUFFIX: &str = ".md";
}
