//! Command implementations shared by the binary and its tests

use crate::store::JsonCanvasStore;
use crate::vault::{FsArchiveSink, FsRecordSource};
use anyhow::{Context, Result};
use roadmap_canvas::{CanvasEngine, EngineConfig, PassMode, PassSummary};
use roadmap_entity::Report;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Canvas file used when none is given
pub const DEFAULT_CANVAS: &str = "roadmap.canvas";

/// Resolved inputs of one invocation
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Vault directory
    pub vault: PathBuf,
    /// Canvas file
    pub canvas: PathBuf,
    /// Engine configuration after file and flag overrides
    pub config: EngineConfig,
}

impl Invocation {
    /// Invocation over `vault` with the default canvas path and configuration
    #[must_use]
    pub fn new(vault: impl Into<PathBuf>) -> Self {
        let vault = vault.into();
        Self {
            canvas: vault.join(DEFAULT_CANVAS),
            vault,
            config: EngineConfig::default(),
        }
    }

    /// With canvas path
    #[must_use]
    pub fn with_canvas(mut self, canvas: impl Into<PathBuf>) -> Self {
        self.canvas = canvas.into();
        self
    }

    /// With engine configuration
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    fn source(&self) -> FsRecordSource {
        FsRecordSource::new(&self.vault, self.config.archive_folder.clone())
    }
}

/// Read an engine configuration file
///
/// # Errors
/// Unreadable file, invalid TOML or unusable layout values.
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: EngineConfig =
        toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))?;
    config.validate().context("invalid layout configuration")?;
    Ok(config)
}

/// Run `populate` or `reposition` against the vault and canvas file
///
/// # Errors
/// Any pass failure; the canvas file is left untouched in that case.
pub fn run_pass(mode: PassMode, invocation: &Invocation) -> Result<PassSummary> {
    let engine = CanvasEngine::new(invocation.config.clone());
    let source = invocation.source();
    let mut store = JsonCanvasStore::new(&invocation.canvas);
    let mut archive = FsArchiveSink::new(&invocation.vault, invocation.config.archive_folder.clone());
    let mut reports: Vec<Report> = Vec::new();

    engine
        .run(mode, &source, &mut store, &mut archive, &mut reports)
        .with_context(|| format!("{mode} failed for {}", invocation.canvas.display()))
}

/// Outcome of `check`
#[derive(Debug, Clone, Serialize)]
pub struct CheckSummary {
    /// Records parsed, archived ones included
    pub records: usize,
    /// Live entities laid out
    pub entities: usize,
    /// Entities placed in the orphan grid
    pub orphans: usize,
    /// Edges dropped to break cycles
    pub cycles_broken: usize,
    /// Records flagged for archival
    pub pending_archive: usize,
    /// Every report of the analysis
    pub reports: Vec<Report>,
}

impl CheckSummary {
    /// Whether any report is a warning
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.reports.iter().any(|r| r.kind.is_warning())
    }
}

/// Analyse the vault without touching the canvas or moving files
///
/// # Errors
/// Unreadable vault or unusable layout configuration.
pub fn check(invocation: &Invocation) -> Result<CheckSummary> {
    let engine = CanvasEngine::new(invocation.config.clone());
    let analysis = engine
        .analyze(&invocation.source())
        .with_context(|| format!("check failed for {}", invocation.vault.display()))?;

    Ok(CheckSummary {
        records: analysis.records.len(),
        entities: analysis.layout.len(),
        orphans: analysis.graphs.orphans.len(),
        cycles_broken: analysis.graphs.cycles_broken(),
        pending_archive: analysis.archived().count(),
        reports: analysis.reports,
    })
}
