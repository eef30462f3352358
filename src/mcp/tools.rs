//! MCP Tool definitions and handlers
//!
//! Declares the project tools and registers them with a [`ToolHost`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::error::{ProjectError, Result};
use crate::mcp::types::Tool;
use crate::project::files::ProjectFiles;

/// Line logged once the tools are registered
pub const STARTUP_MESSAGE: &str = "DFR MCP Server started on stdio";

pub const LIST_PRPS: &str = "list-prps";
pub const READ_PRP: &str = "read-prp";
pub const GET_PROJECT_STATUS: &str = "get-project-status";

/// Behavior behind a registered tool
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Run the tool and return its result payload
    async fn call(&self, args: Value) -> Result<Value>;
}

/// A named tool with its parameter schema and handler
#[derive(Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub handler: Arc<dyn ToolHandler>,
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
        handler: Arc<dyn ToolHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            handler,
        }
    }

    /// Wire form advertised by `tools/list`
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.clone(),
            description: Some(self.description.clone()),
            input_schema: self.input_schema.clone(),
        }
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish_non_exhaustive()
    }
}

/// Server that accepts tool registrations and then serves them
#[async_trait]
pub trait ToolHost: Send {
    /// Register a tool, replacing any earlier tool with the same name
    fn register_tool(&mut self, descriptor: ToolDescriptor);

    /// Serve requests until the transport closes
    async fn start(&mut self) -> Result<()>;
}

/// Declares the project tools to a host
pub struct Registrar {
    files: Arc<ProjectFiles>,
}

impl Registrar {
    /// Create a registrar over the given project tree
    pub fn new(files: Arc<ProjectFiles>) -> Self {
        Self { files }
    }

    /// Descriptors for every project tool, in registration order
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new(
                LIST_PRPS,
                "List all PRP files in the project",
                empty_schema(),
                Arc::new(ListPrps {
                    files: self.files.clone(),
                }),
            ),
            ToolDescriptor::new(
                READ_PRP,
                "Read a specific PRP file",
                read_prp_schema(),
                Arc::new(ReadPrp {
                    files: self.files.clone(),
                }),
            ),
            ToolDescriptor::new(
                GET_PROJECT_STATUS,
                "Get current project status and structure",
                empty_schema(),
                Arc::new(GetProjectStatus {
                    files: self.files.clone(),
                }),
            ),
        ]
    }

    /// Register every project tool with `host`
    pub fn register<H: ToolHost + ?Sized>(&self, host: &mut H) {
        for descriptor in self.descriptors() {
            tracing::debug!("Registering tool {}", descriptor.name);
            host.register_tool(descriptor);
        }
    }

    /// Register the tools, then hand control to the host's run loop
    pub async fn serve<H: ToolHost>(&self, mut host: H) -> Result<()> {
        self.register(&mut host);
        tracing::info!("{}", STARTUP_MESSAGE);
        host.start().await
    }
}

// ==================== Tool Handlers ====================

struct ListPrps {
    files: Arc<ProjectFiles>,
}

#[async_trait]
impl ToolHandler for ListPrps {
    async fn call(&self, _args: Value) -> Result<Value> {
        let list = self.files.list_documents().await?;
        Ok(serde_json::to_value(list)?)
    }
}

#[derive(Debug, Deserialize, Validate)]
struct ReadPrpArgs {
    #[validate(length(min = 1, message = "must not be empty"))]
    filename: String,
}

struct ReadPrp {
    files: Arc<ProjectFiles>,
}

#[async_trait]
impl ToolHandler for ReadPrp {
    async fn call(&self, args: Value) -> Result<Value> {
        let args: ReadPrpArgs = serde_json::from_value(args)
            .map_err(|e| ProjectError::invalid_argument("filename", e.to_string()))?;
        args.validate()
            .map_err(|e| ProjectError::invalid_argument("filename", e.to_string()))?;

        let document = self.files.read_document(&args.filename).await?;
        Ok(serde_json::to_value(document)?)
    }
}

struct GetProjectStatus {
    files: Arc<ProjectFiles>,
}

#[async_trait]
impl ToolHandler for GetProjectStatus {
    async fn call(&self, _args: Value) -> Result<Value> {
        let status = self.files.project_structure().await?;
        Ok(serde_json::to_value(status)?)
    }
}

// ==================== Tool Schemas ====================

fn empty_schema() -> Value {
    json!({"type": "object", "properties": {}})
}

fn read_prp_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "filename": {
                "type": "string",
                "description": "Name of the PRP file"
            }
        },
        "required": ["filename"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::DfrMcpError;

    #[derive(Default)]
    struct RecordingHost {
        registered: Vec<ToolDescriptor>,
        started: bool,
    }

    #[async_trait]
    impl ToolHost for RecordingHost {
        fn register_tool(&mut self, descriptor: ToolDescriptor) {
            self.registered.push(descriptor);
        }

        async fn start(&mut self) -> Result<()> {
            self.started = true;
            Ok(())
        }
    }

    fn registrar(root: &std::path::Path) -> Registrar {
        let files = ProjectFiles::new(Config::from_root(root).unwrap());
        Registrar::new(Arc::new(files))
    }

    #[test]
    fn test_registers_three_tools_in_order() {
        let temp = tempfile::tempdir().unwrap();
        let mut host = RecordingHost::default();
        registrar(temp.path()).register(&mut host);

        let names: Vec<_> = host.registered.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec![LIST_PRPS, READ_PRP, GET_PROJECT_STATUS]);
        assert!(!host.started);
    }

    #[test]
    fn test_serve_starts_host() {
        let temp = tempfile::tempdir().unwrap();
        let host = RecordingHost::default();
        tokio_test::block_on(registrar(temp.path()).serve(host)).unwrap();
    }

    #[test]
    fn test_read_prp_schema_requires_filename() {
        let schema = read_prp_schema();
        assert_eq!(schema["required"][0], "filename");
        assert_eq!(schema["properties"]["filename"]["type"], "string");
    }

    #[tokio::test]
    async fn test_read_prp_missing_filename() {
        let temp = tempfile::tempdir().unwrap();
        let descriptors = registrar(temp.path()).descriptors();
        let read = &descriptors[1];

        for args in [json!({}), json!({"filename": 7}), json!({"filename": ""})] {
            let err = read.handler.call(args).await.unwrap_err();
            assert!(matches!(
                err,
                DfrMcpError::Project(ProjectError::InvalidArgument { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_list_prps_payload() {
        let temp = tempfile::tempdir().unwrap();
        let prps = temp.path().join("PRPs");
        std::fs::create_dir_all(&prps).unwrap();
        std::fs::write(prps.join("a.md"), "# A").unwrap();
        std::fs::write(prps.join("b.txt"), "B").unwrap();

        let descriptors = registrar(temp.path()).descriptors();
        let payload = descriptors[0].handler.call(json!({})).await.unwrap();
        assert_eq!(payload, json!({"files": ["a.md"]}));
    }
}
