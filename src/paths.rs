use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_ASSETS_FOLDER: &str = "assets";

/// Suffix appended to an image's stem to name its annotated copy.
pub const ANNOTATED_SUFFIX: &str = "_annotated.jpg";

/// Resolves logical image names to paths inside an assets folder.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Resolve relative to `root`. A relative root is made absolute against
    /// the current directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = std::path::absolute(root.as_ref())
            .map_err(|_| Error::NotFound(root.as_ref().to_path_buf()))?;
        Ok(Self { root })
    }

    pub fn from_current_dir() -> Result<Self> {
        Self::new(".")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of `file_name` inside `folder`.
    ///
    /// Only the folder has to exist; whether the file itself exists is left
    /// to whoever opens it.
    pub fn resolve(&self, file_name: &str, folder: &str) -> Result<PathBuf> {
        let dir = self.root.join(folder);
        if !dir.is_dir() {
            return Err(Error::NotFound(dir));
        }
        Ok(dir.join(file_name))
    }

    /// Path of the annotated copy of `file_name`: `<stem>_annotated.jpg` in
    /// the same folder.
    pub fn annotated_output(&self, file_name: &str, folder: &str) -> Result<PathBuf> {
        let stem = Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.to_string());
        self.resolve(&format!("{}{}", stem, ANNOTATED_SUFFIX), folder)
    }
}
