//! Canvas file store

use roadmap_canvas::{CanvasDocument, CanvasStore, StoreError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Canvas JSON file on disk
///
/// A missing file loads as an empty canvas. Saves go through a sibling
/// temporary file and a rename, so readers see either the old or the new
/// document.
#[derive(Debug, Clone)]
pub struct JsonCanvasStore {
    path: PathBuf,
}

impl JsonCanvasStore {
    /// Store backed by `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Canvas file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map_or_else(|| "canvas".to_string(), |n| n.to_string_lossy().into_owned());
        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

impl CanvasStore for JsonCanvasStore {
    fn load(&self) -> Result<CanvasDocument, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(CanvasDocument::from_json(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(CanvasDocument::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, document: &CanvasDocument) -> Result<(), StoreError> {
        let json = document.to_json()?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        if let Err(e) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }
        tracing::debug!(
            "saved {} nodes, {} edges to {}",
            document.nodes.len(),
            document.edges.len(),
            self.path.display()
        );
        Ok(())
    }
}
