//! DFR MCP Server Library
//!
//! A Model Context Protocol (MCP) server for the DFR project.
//! Provides read-only tools for listing and reading PRP documents and
//! summarizing the project directory layout.

pub mod config;
pub mod error;
pub mod mcp;
pub mod project;

pub use config::Config;
pub use error::{DfrMcpError, Result};
