//! Result payloads returned by the project tools

use serde::{Deserialize, Serialize};

/// Payload of `list-prps`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentList {
    /// Document file names, sorted
    pub files: Vec<String>,
}

/// Payload of `read-prp`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentContent {
    pub content: String,
}

/// Payload of `get-project-status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStatus {
    pub structure: ProjectStructure,
}

/// Entry listings of the summarized directories
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectStructure {
    pub src: Vec<String>,
    pub assets: Vec<String>,
    pub docs: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_shape() {
        let status = ProjectStatus {
            structure: ProjectStructure {
                src: vec!["main.cpp".to_string()],
                assets: vec![],
                docs: vec!["README.md".to_string()],
            },
        };

        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["structure"]["src"][0], "main.cpp");
        assert!(value["structure"]["assets"].as_array().unwrap().is_empty());
        assert_eq!(value["structure"]["docs"][0], "README.md");
    }

    #[test]
    fn test_document_list_key() {
        let list = DocumentList {
            files: vec!["a.md".to_string()],
        };
        assert_eq!(
            serde_json::to_value(&list).unwrap(),
            serde_json::json!({"files": ["a.md"]})
        );
    }
}
