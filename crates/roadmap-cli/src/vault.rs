//! Filesystem record source and archive sink

use roadmap_canvas::{ArchiveError, ArchiveSink, RecordSource, SourceError};
use roadmap_entity::SourceLocation;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Vault-relative location with `/` separators
fn location_of(root: &Path, path: &Path) -> SourceLocation {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    SourceLocation::new(parts.join("/"))
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

/// Every Markdown file under a vault directory
///
/// Hidden entries and the top-level archive folder are skipped. Items come
/// back sorted by location.
#[derive(Debug, Clone)]
pub struct FsRecordSource {
    root: PathBuf,
    archive_folder: String,
}

impl FsRecordSource {
    /// Source over `root`, never descending into `root/<archive_folder>`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, archive_folder: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            archive_folder: archive_folder.into(),
        }
    }

    /// Vault root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_pruned(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.')
            || (entry.depth() == 1
                && entry.file_type().is_dir()
                && name == self.archive_folder.as_str())
    }

    fn markdown_paths(&self) -> Result<Vec<PathBuf>, SourceError> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|e| !self.is_pruned(e))
        {
            let entry = entry.map_err(|e| map_walkdir_error(&self.root, e))?;
            if entry.file_type().is_file() && is_markdown(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        Ok(paths)
    }
}

fn map_walkdir_error(root: &Path, err: walkdir::Error) -> SourceError {
    match (err.path(), err.io_error()) {
        (Some(path), Some(io_err)) if path != root => SourceError::Read {
            location: location_of(root, path),
            source: io::Error::new(io_err.kind(), io_err.to_string()),
        },
        _ => SourceError::Unavailable(format!("{}: {err}", root.display())),
    }
}

impl RecordSource for FsRecordSource {
    fn records(&self) -> Result<Vec<(SourceLocation, String)>, SourceError> {
        if !self.root.is_dir() {
            return Err(SourceError::Unavailable(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }

        let paths = self.markdown_paths()?;
        let mut items = Vec::with_capacity(paths.len());
        for path in paths {
            let location = location_of(&self.root, &path);
            let bytes = fs::read(&path).map_err(|source| SourceError::Read {
                location: location.clone(),
                source,
            })?;
            items.push((location, String::from_utf8_lossy(&bytes).into_owned()));
        }
        items.sort_by(|a, b| a.0.cmp(&b.0));
        tracing::debug!("read {} records from {}", items.len(), self.root.display());
        Ok(items)
    }
}

/// Moves archived records into `<vault>/<archive_folder>/`
///
/// A name already taken in the archive gets `-1`, `-2`, … appended to its
/// stem.
#[derive(Debug, Clone)]
pub struct FsArchiveSink {
    root: PathBuf,
    folder: String,
}

impl FsArchiveSink {
    /// Sink for the vault at `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, folder: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            folder: folder.into(),
        }
    }

    fn free_target(dir: &Path, name: &str) -> PathBuf {
        let candidate = dir.join(name);
        if !candidate.exists() {
            return candidate;
        }
        let (stem, ext) = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
            _ => (name, None),
        };
        (1..)
            .map(|n| match ext {
                Some(ext) => dir.join(format!("{stem}-{n}.{ext}")),
                None => dir.join(format!("{stem}-{n}")),
            })
            .find(|p| !p.exists())
            .unwrap_or(candidate)
    }
}

impl ArchiveSink for FsArchiveSink {
    fn archive(&mut self, location: &SourceLocation) -> Result<SourceLocation, ArchiveError> {
        let io_error = |source: io::Error| ArchiveError::Io {
            location: location.clone(),
            source,
        };

        let from = self.root.join(location.as_str());
        let Some(name) = from.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            return Err(ArchiveError::Rejected {
                location: location.clone(),
                reason: "not a file".to_string(),
            });
        };

        let dir = self.root.join(&self.folder);
        fs::create_dir_all(&dir).map_err(io_error)?;
        let to = Self::free_target(&dir, &name);
        fs::rename(&from, &to).map_err(io_error)?;

        let target = location_of(&self.root, &to);
        tracing::debug!("moved {location} to {target}");
        Ok(target)
    }
}
