//! Pass pipeline
//!
//! One pass runs parse → build graphs → resolve cycles → reduce → layout →
//! reconcile on a snapshot of the records, then performs the archive moves,
//! and only then hands back the new canvas. The old canvas is never touched
//! in place, so a pass that fails leaves it exactly as it was.

use crate::collaborators::{ArchiveSink, CanvasStore, RecordSource, ReportSink};
use crate::config::EngineConfig;
use crate::document::CanvasDocument;
use crate::error::Result;
use crate::reconcile::{reconcile, PlacementMode, Removal};
use roadmap_entity::{EntityRecord, RecordParser, Report, ReportKind, SourceLocation};
use roadmap_graph::ResolvedGraphs;
use roadmap_layout::{Layout, LayoutEngine};
use serde::Serialize;
use std::fmt;

/// The two entry points of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PassMode {
    /// Add, archive and prune nodes; never move an existing node
    Populate,
    /// Everything `Populate` does, plus move every entity node to its layout position
    Reposition,
}

impl PassMode {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PassMode::Populate => "populate",
            PassMode::Reposition => "reposition",
        }
    }

    fn placement(self) -> PlacementMode {
        match self {
            PassMode::Populate => PlacementMode::KeepExisting,
            PassMode::Reposition => PlacementMode::Relayout,
        }
    }
}

impl fmt::Display for PassMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only result of parsing, resolving and laying out a snapshot
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Every parsed record, archived ones included, sorted by id
    pub records: Vec<EntityRecord>,
    /// Locations that failed to parse, in location order
    pub unparsed: Vec<SourceLocation>,
    /// Resolved relationship graphs over the live records
    pub graphs: ResolvedGraphs,
    /// Positions for every live entity
    pub layout: Layout,
    /// Parse, reference, consistency and cycle reports
    pub reports: Vec<Report>,
}

impl Analysis {
    /// Records flagged for archival
    pub fn archived(&self) -> impl Iterator<Item = &EntityRecord> {
        self.records.iter().filter(|r| r.archived)
    }

    /// Reports that are warnings rather than notices
    pub fn warnings(&self) -> impl Iterator<Item = &Report> {
        self.reports.iter().filter(|r| r.kind.is_warning())
    }
}

/// What a pass did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    /// Nodes created
    pub added: usize,
    /// Records moved to the archive
    pub archived: usize,
    /// Stale and duplicate nodes removed
    pub removed: usize,
    /// Existing entity nodes moved
    pub repositioned: usize,
    /// Every report of the pass, notices included
    pub warnings: Vec<Report>,
}

impl PassSummary {
    /// Number of reports that are actual warnings
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings.iter().filter(|r| r.kind.is_warning()).count()
    }
}

impl fmt::Display for PassSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} archived, {} removed, {} repositioned, {} warnings",
            self.added,
            self.archived,
            self.removed,
            self.repositioned,
            self.warning_count()
        )
    }
}

/// Replacement canvas plus summary
#[derive(Debug, Clone, PartialEq)]
pub struct PassOutcome {
    /// New canvas document
    pub document: CanvasDocument,
    /// Counts and reports
    pub summary: PassSummary,
}

/// Resolver and layout engine
#[derive(Debug, Clone, Default)]
pub struct CanvasEngine {
    config: EngineConfig,
}

impl CanvasEngine {
    /// Create an engine
    #[inline]
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Snapshot `source` and analyse it
    ///
    /// # Errors
    /// Source failure or unusable layout configuration.
    pub fn analyze(&self, source: &dyn RecordSource) -> Result<Analysis> {
        let items = source.records()?;
        self.analyze_items(items)
    }

    /// Analyse already collected `(location, text)` items
    ///
    /// Items inside the archive folder are skipped whatever their contents.
    ///
    /// # Errors
    /// Unusable layout configuration.
    pub fn analyze_items(&self, items: Vec<(SourceLocation, String)>) -> Result<Analysis> {
        let (archived_area, items): (Vec<_>, Vec<_>) = items
            .into_iter()
            .partition(|(location, _)| self.config.in_archive(location.as_str()));
        if !archived_area.is_empty() {
            tracing::debug!("skipped {} items inside the archive folder", archived_area.len());
        }

        let batch = RecordParser::with_options(self.config.parser).parse_batch(items);
        let mut reports = batch.reports;
        let records = batch.records;
        let unparsed = batch.failed;

        let graphs = ResolvedGraphs::resolve(&records);
        reports.extend(graphs.reports.iter().cloned());

        let layout = LayoutEngine::new(self.config.layout.clone()).layout(&records, &graphs)?;

        tracing::info!(
            "analysed {} records: {} live, {} orphans, {} cycles broken, {} reports",
            records.len(),
            graphs.index.len(),
            graphs.orphans.len(),
            graphs.cycles_broken(),
            reports.len()
        );

        Ok(Analysis {
            records,
            unparsed,
            graphs,
            layout,
            reports,
        })
    }

    /// Add new nodes, archive flagged records, prune stale and duplicate
    /// nodes; existing nodes keep their positions
    ///
    /// # Errors
    /// See [`crate::PassError`]; on error nothing has been replaced.
    pub fn populate(
        &self,
        source: &dyn RecordSource,
        document: CanvasDocument,
        archive: &mut dyn ArchiveSink,
    ) -> Result<PassOutcome> {
        self.pass(PassMode::Populate, source, document, archive)
    }

    /// Everything [`Self::populate`] does, then move every entity node to its
    /// computed position; non-entity nodes are left alone
    ///
    /// # Errors
    /// See [`crate::PassError`]; on error nothing has been replaced.
    pub fn reposition(
        &self,
        source: &dyn RecordSource,
        document: CanvasDocument,
        archive: &mut dyn ArchiveSink,
    ) -> Result<PassOutcome> {
        self.pass(PassMode::Reposition, source, document, archive)
    }

    /// Run one pass against `mode`
    ///
    /// # Errors
    /// See [`crate::PassError`]; on error nothing has been replaced.
    pub fn pass(
        &self,
        mode: PassMode,
        source: &dyn RecordSource,
        document: CanvasDocument,
        archive: &mut dyn ArchiveSink,
    ) -> Result<PassOutcome> {
        let analysis = self.analyze(source)?;
        let reconciliation = reconcile(
            document,
            &analysis.records,
            &analysis.unparsed,
            &analysis.graphs,
            &analysis.layout,
            mode.placement(),
        );

        let mut reports = analysis.reports.clone();
        for (node_id, location) in &reconciliation.kept {
            reports.push(
                Report::new(
                    ReportKind::NodeKept,
                    format!("kept node {node_id}: {location} failed to parse"),
                )
                .at(location.clone()),
            );
        }
        let mut archived = 0;
        for record in analysis.archived() {
            let target = archive.archive(&record.location)?;
            archived += 1;
            reports.push(
                Report::new(
                    ReportKind::Archived,
                    format!("archived {}: {} → {}", record.entity_id, record.location, target),
                )
                .with_entities([record.entity_id.clone()])
                .at(record.location.clone()),
            );
        }

        for report in &reports {
            if report.kind.is_warning() {
                tracing::warn!("{report}");
            } else {
                tracing::info!("{report}");
            }
        }

        let summary = PassSummary {
            added: reconciliation.added.len(),
            archived,
            removed: reconciliation.removed_for(Removal::Stale) + reconciliation.removed_for(Removal::Duplicate),
            repositioned: reconciliation.repositioned.len(),
            warnings: reports,
        };
        tracing::info!("{mode}: {summary}");

        Ok(PassOutcome {
            document: reconciliation.document,
            summary,
        })
    }

    /// Load the canvas, run a pass, save the result and forward every report
    ///
    /// The store is written once, and only after the pass and all archive
    /// moves succeeded.
    ///
    /// # Errors
    /// See [`crate::PassError`]; on error the store has not been written.
    pub fn run(
        &self,
        mode: PassMode,
        source: &dyn RecordSource,
        store: &mut dyn CanvasStore,
        archive: &mut dyn ArchiveSink,
        sink: &mut dyn ReportSink,
    ) -> Result<PassSummary> {
        let document = store.load()?;
        let outcome = self.pass(mode, source, document, archive)?;
        store.save(&outcome.document)?;
        for report in &outcome.summary.warnings {
            sink.emit(report);
        }
        Ok(outcome.summary)
    }
}
