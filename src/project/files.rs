//! Project filesystem access
//!
//! Every call re-reads the filesystem; nothing is cached. Paths in errors
//! are reported relative to the install root.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::config::{layout, Config};
use crate::error::ProjectError;
use crate::project::types::{DocumentContent, DocumentList, ProjectStatus, ProjectStructure};

type Result<T> = std::result::Result<T, ProjectError>;

/// Read-only view of the project tree under the install root
#[derive(Debug, Clone)]
pub struct ProjectFiles {
    config: Config,
}

impl ProjectFiles {
    /// Create a project view from a resolved configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// List the `.md` files in the documents directory
    pub async fn list_documents(&self) -> Result<DocumentList> {
        let mut files = Vec::new();
        for (name, path) in self.entries(&self.config.documents_dir).await? {
            if !name.ends_with(layout::DOCUMENT_SUFFIX) {
                continue;
            }

            // Follows symlinks, so a link to a document counts as a document.
            match tokio::fs::metadata(&path).await {
                Ok(metadata) if metadata.is_file() => files.push(name),
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry {}: {}", name, e);
                }
            }
        }

        files.sort();
        Ok(DocumentList { files })
    }

    /// Read one document as UTF-8 text
    pub async fn read_document(&self, filename: &str) -> Result<DocumentContent> {
        let path = self.resolve_document(filename).await?;
        let shown = Path::new(layout::DOCUMENTS_DIR).join(filename);

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ProjectError::FileNotFound {
                    path: shown.display().to_string(),
                },
                _ => ProjectError::file_system(&shown, e),
            })?;

        Ok(DocumentContent { content })
    }

    /// List the entries of the source, assets and docs directories
    pub async fn project_structure(&self) -> Result<ProjectStatus> {
        let structure = ProjectStructure {
            src: self.list_dir(&self.config.src_dir).await?,
            assets: self.list_dir(&self.config.assets_dir).await?,
            docs: self.list_dir(&self.config.docs_dir).await?,
        };

        Ok(ProjectStatus { structure })
    }

    /// Resolve `filename` to a path inside the documents directory.
    ///
    /// Only relative paths made of plain components are accepted, and the
    /// canonical target must stay under the canonical documents directory,
    /// so neither `..` nor a symlink can lead outside of it.
    pub async fn resolve_document(&self, filename: &str) -> Result<PathBuf> {
        if filename.trim().is_empty() {
            return Err(ProjectError::invalid_argument(
                "filename",
                "must not be empty",
            ));
        }

        let relative = Path::new(filename);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(ProjectError::invalid_argument(
                "filename",
                format!("'{}' must be a relative path inside {}", filename, layout::DOCUMENTS_DIR),
            ));
        }

        let documents_dir = &self.config.documents_dir;
        let joined = documents_dir.join(relative);

        let target = tokio::fs::canonicalize(&joined)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ProjectError::FileNotFound {
                    path: self.relative(&joined).display().to_string(),
                },
                _ => ProjectError::file_system(self.relative(&joined), e),
            })?;

        let base = tokio::fs::canonicalize(documents_dir)
            .await
            .map_err(|e| ProjectError::file_system(self.relative(documents_dir), e))?;

        if !target.starts_with(&base) {
            tracing::warn!("Rejected document path outside {}: {}", layout::DOCUMENTS_DIR, filename);
            return Err(ProjectError::invalid_argument(
                "filename",
                format!("'{}' resolves outside {}", filename, layout::DOCUMENTS_DIR),
            ));
        }

        Ok(target)
    }

    /// Sorted entry names of a directory
    async fn list_dir(&self, dir: &Path) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .entries(dir)
            .await?
            .into_iter()
            .map(|(name, _)| name)
            .collect();

        names.sort();
        Ok(names)
    }

    /// Entries of `dir` whose names are valid UTF-8.
    ///
    /// Other names are skipped: they could not be passed back to a tool
    /// as a string argument.
    async fn entries(&self, dir: &Path) -> Result<Vec<(String, PathBuf)>> {
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| ProjectError::file_system(self.relative(dir), e))?;

        let mut found = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ProjectError::file_system(self.relative(dir), e))?
        {
            match entry.file_name().into_string() {
                Ok(name) => found.push((name, entry.path())),
                Err(raw) => {
                    tracing::warn!(
                        "Skipping entry with non UTF-8 name in {}: {:?}",
                        self.relative(dir).display(),
                        raw
                    );
                }
            }
        }

        Ok(found)
    }

    /// `path` relative to the install root, as shown to callers
    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.config.project_root).unwrap_or(path)
    }
}
