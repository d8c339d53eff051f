//! Lenient record parser
//!
//! Turns raw record text into [`EntityRecord`]s. Nothing in here panics or
//! aborts a batch: an item either yields a record (possibly with warnings) or
//! is excluded with a report saying why.

use crate::error::ParseError;
use crate::field::{self, ParsedField};
use crate::frontmatter;
use crate::record::{EntityId, EntityRecord, EntityType, SourceLocation};
use crate::report::{Report, ReportKind};
use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use std::collections::HashSet;

static CANONICAL_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]+-\d+$").expect("canonical id pattern is valid"));

/// Parser behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Coerce unknown types to `task` and accept non-canonical ids, with a
    /// warning, instead of excluding the record
    pub lenient: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self { lenient: true }
    }
}

/// Result of parsing one scan
#[derive(Debug, Clone, Default)]
pub struct ParsedBatch {
    /// Accepted records, sorted by entity id
    pub records: Vec<EntityRecord>,
    /// Everything excluded, coerced or skipped along the way
    pub reports: Vec<Report>,
    /// Locations that produced no record because they failed to parse
    pub failed: Vec<SourceLocation>,
}

/// Frontmatter record parser
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordParser {
    options: ParserOptions,
}

impl RecordParser {
    /// Create a lenient parser
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With explicit options
    #[inline]
    #[must_use]
    pub fn with_options(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Parse one item, pushing warnings into `reports`
    ///
    /// # Errors
    /// Returns a [`ParseError`] when the item cannot become a record. The
    /// error itself is *not* pushed into `reports`.
    pub fn parse(
        &self,
        location: &SourceLocation,
        text: &str,
        reports: &mut Vec<Report>,
    ) -> Result<EntityRecord, ParseError> {
        let fields = match frontmatter::split(text) {
            Ok(Some((block, _body))) => frontmatter::parse_block(block)
                .map_err(|e| ParseError::unparseable(location, e))?,
            Ok(None) => {
                return Err(ParseError::MissingRequiredFields {
                    location: location.clone(),
                    fields: vec!["id", "type"],
                })
            }
            Err(e) => return Err(ParseError::unparseable(location, e)),
        };

        let raw_id = field::scalar(frontmatter::lookup(&fields, &["id"])).present();
        let raw_type = field::scalar(frontmatter::lookup(&fields, &["type"])).present();
        let (raw_id, raw_type) = match (raw_id, raw_type) {
            (Some(id), Some(ty)) => (id, ty),
            (id, ty) => {
                let mut missing = Vec::new();
                if id.is_none() {
                    missing.push("id");
                }
                if ty.is_none() {
                    missing.push("type");
                }
                return Err(ParseError::MissingRequiredFields {
                    location: location.clone(),
                    fields: missing,
                });
            }
        };

        let entity_id = EntityId::new(raw_id);
        let canonical = CANONICAL_ID.is_match(entity_id.as_str());
        if !canonical {
            if !self.options.lenient {
                return Err(ParseError::InvalidId {
                    location: location.clone(),
                    value: entity_id.to_string(),
                });
            }
            reports.push(
                Report::new(
                    ReportKind::NonCanonicalId,
                    format!("id '{entity_id}' does not follow the PREFIX-NNN convention"),
                )
                .with_entities([entity_id.clone()])
                .at(location.clone()),
            );
        }

        let entity_type = match raw_type.parse::<EntityType>() {
            Ok(ty) => ty,
            Err(_) if self.options.lenient => {
                reports.push(
                    Report::new(
                        ReportKind::UnknownType,
                        format!("unknown type '{raw_type}' on {entity_id}, treated as task"),
                    )
                    .with_entities([entity_id.clone()])
                    .at(location.clone()),
                );
                EntityType::Task
            }
            Err(_) => {
                return Err(ParseError::InvalidType {
                    location: location.clone(),
                    value: raw_type,
                })
            }
        };

        if canonical {
            let implied = entity_id.prefix().and_then(EntityType::from_id_prefix);
            if implied.is_some_and(|t| t != entity_type) {
                reports.push(
                    Report::new(
                        ReportKind::TypePrefixMismatch,
                        format!("{entity_id} is declared as {entity_type} but its prefix suggests otherwise"),
                    )
                    .with_entities([entity_id.clone()])
                    .at(location.clone()),
                );
            }
        }

        let mut reader = FieldReader {
            fields: &fields,
            entity_id: &entity_id,
            location,
            reports,
        };

        let title = reader.scalar("title", &["title"]);
        let workstream = reader.scalar("workstream", &["workstream"]);
        let parent = reader
            .scalar("parent", &["parent"])
            .and_then(|p| normalize_reference(&p));
        let children = reader.references("children", &["children"]);
        let depends_on = reader.references("depends_on", &["depends_on", "dependsOn"]);
        let blocks = reader.references("blocks", &["blocks"]);
        let enables = reader.references("enables", &["enables"]);
        let affects = reader.references("affects", &["affects"]);
        let implemented_by =
            reader.references("implemented_by", &["implemented_by", "implementedBy"]);
        let implements = reader.references("implements", &["implements"]);
        let archived = reader.flag("archived", &["archived"]);

        Ok(EntityRecord {
            entity_id,
            entity_type,
            title,
            workstream,
            parent,
            children,
            depends_on,
            blocks,
            enables,
            affects,
            implemented_by,
            implements,
            archived,
            location: location.clone(),
            fields,
        })
    }

    /// Parse one item; on failure the error is reported and `None` returned
    pub fn parse_record(
        &self,
        location: &SourceLocation,
        text: &str,
        reports: &mut Vec<Report>,
    ) -> Option<EntityRecord> {
        match self.parse(location, text, reports) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::debug!("excluded {}: {}", location, err);
                reports.push(Report::from(&err));
                None
            }
        }
    }

    /// Parse a whole scan
    ///
    /// Items are visited in location order, so when two items claim the same
    /// id the one whose location sorts first wins and the other is reported
    /// as skipped.
    pub fn parse_batch<I>(&self, items: I) -> ParsedBatch
    where
        I: IntoIterator<Item = (SourceLocation, String)>,
    {
        let mut items: Vec<_> = items.into_iter().collect();
        items.sort_by(|a, b| a.0.cmp(&b.0));

        let mut batch = ParsedBatch::default();
        let mut seen: HashSet<EntityId> = HashSet::with_capacity(items.len());

        for (location, text) in &items {
            let Some(record) = self.parse_record(location, text, &mut batch.reports) else {
                batch.failed.push(location.clone());
                continue;
            };
            if seen.contains(&record.entity_id) {
                batch.reports.push(
                    Report::new(
                        ReportKind::DuplicateId,
                        format!("duplicate ID {}, skipped {}", record.entity_id, location),
                    )
                    .with_entities([record.entity_id.clone()])
                    .at(location.clone()),
                );
                continue;
            }
            seen.insert(record.entity_id.clone());
            batch.records.push(record);
        }

        batch.records.sort_by(|a, b| a.entity_id.cmp(&b.entity_id));
        tracing::debug!(
            "parsed {} records from {} items ({} reports)",
            batch.records.len(),
            items.len(),
            batch.reports.len()
        );
        batch
    }
}

/// Field access bound to one record, reporting malformed fields as it goes
struct FieldReader<'a> {
    fields: &'a Mapping,
    entity_id: &'a EntityId,
    location: &'a SourceLocation,
    reports: &'a mut Vec<Report>,
}

impl FieldReader<'_> {
    fn resolve<T>(&mut self, name: &str, parsed: ParsedField<T>) -> Option<T> {
        match parsed {
            ParsedField::Present(value) => Some(value),
            ParsedField::Absent => None,
            ParsedField::Malformed(reason) => {
                self.reports.push(
                    Report::new(
                        ReportKind::MalformedField,
                        format!("ignored field '{name}' on {}: {reason}", self.entity_id),
                    )
                    .with_entities([self.entity_id.clone()])
                    .at(self.location.clone()),
                );
                None
            }
        }
    }

    fn scalar(&mut self, name: &str, keys: &[&str]) -> Option<String> {
        let parsed = field::scalar(frontmatter::lookup(self.fields, keys));
        self.resolve(name, parsed)
    }

    fn references(&mut self, name: &str, keys: &[&str]) -> IndexSet<EntityId> {
        let parsed = field::list(frontmatter::lookup(self.fields, keys));
        self.resolve(name, parsed)
            .unwrap_or_default()
            .iter()
            .filter_map(|raw| normalize_reference(raw))
            .collect()
    }

    fn flag(&mut self, name: &str, keys: &[&str]) -> bool {
        let parsed = field::flag(frontmatter::lookup(self.fields, keys));
        self.resolve(name, parsed).unwrap_or(false)
    }
}

/// Reduce a written reference to a bare entity id
///
/// Accepts plain ids as well as wiki-link forms such as `[[S-001]]`,
/// `[[S-001|Login]]` and `[[stories/S-001.md]]`. Blank references yield
/// `None`.
#[must_use]
pub fn normalize_reference(raw: &str) -> Option<EntityId> {
    let mut target = raw.trim();
    if let Some(inner) = target.strip_prefix("[[").and_then(|t| t.strip_suffix("]]")) {
        target = inner;
    }
    let target = target.split('|').next().unwrap_or(target);
    let target = target.split('#').next().unwrap_or(target);
    let target = target.rsplit('/').next().unwrap_or(target);
    let target = target.strip_suffix(".md").unwrap_or(target).trim();
    if target.is_empty() {
        None
    } else {
        Some(EntityId::new(target))
    }
}
