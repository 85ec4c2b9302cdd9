use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::classifier::{Classification, classify_document};
use super::sequence::SequenceAudit;
use crate::core::{AuditConfig, AuditError, InputSource, SourceKind, has_extension, read_archive};

/// Nested archives deeper than this are skipped.
const MAX_ARCHIVE_DEPTH: usize = 8;

/// A classified document together with its original bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedDocument {
    /// Outcome of [`classify_document`] on `bytes`.
    pub classification: Classification,
    /// Bytes exactly as read from the input or archive entry.
    pub bytes: Vec<u8>,
}

/// Result of a classification batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationReport {
    /// Unique documents in first-seen order.
    pub documents: Vec<ClassifiedDocument>,
    /// Documents skipped because their fingerprint was already seen.
    pub duplicates: usize,
    /// Files rejected as not plausible fiscal XML.
    pub rejected: usize,
}

impl ClassificationReport {
    pub fn classifications(&self) -> impl Iterator<Item = &Classification> {
        self.documents.iter().map(|d| &d.classification)
    }

    /// Sequence audit over the taxpayer's normal documents.
    pub fn sequence_audit(&self) -> SequenceAudit {
        SequenceAudit::from_classifications(self.classifications())
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// User-facing one-line outcome of the batch.
    pub fn summary(&self) -> String {
        if self.documents.is_empty() {
            "no valid documents found".to_string()
        } else {
            format!(
                "{} documents classified ({} duplicates skipped)",
                self.documents.len(),
                self.duplicates
            )
        }
    }
}

/// Batch state threaded through the traversal: the report plus the set of
/// fingerprints already taken.
#[derive(Default)]
struct Panning {
    seen: HashSet<String>,
    report: ClassificationReport,
}

impl Panning {
    fn offer(mut self, name: &str, bytes: &[u8], config: &AuditConfig) -> Self {
        let Some(classification) = classify_document(bytes, name, config) else {
            debug!(document = %name, "not a fiscal XML");
            self.report.rejected += 1;
            return self;
        };
        if !self.seen.insert(classification.fingerprint().to_string()) {
            debug!(document = %name, fingerprint = classification.fingerprint(), "duplicate");
            self.report.duplicates += 1;
            return self;
        }
        self.report.documents.push(ClassifiedDocument {
            classification,
            bytes: bytes.to_vec(),
        });
        self
    }

    fn archive(
        self,
        name: &str,
        bytes: &[u8],
        config: &AuditConfig,
        depth: usize,
    ) -> Result<Self, AuditError> {
        if depth > MAX_ARCHIVE_DEPTH {
            warn!(archive = %name, "archive nesting too deep, skipped");
            return Ok(self);
        }
        let nested = config.nested_archives;
        let entries = read_archive(name, bytes, |n| {
            has_extension(n, "xml") || (nested && has_extension(n, "zip"))
        })?;

        entries.into_iter().try_fold(self, |acc, entry| {
            if has_extension(&entry.name, "zip") {
                acc.archive(&format!("{name}/{}", entry.name), &entry.bytes, config, depth + 1)
            } else {
                Ok(acc.offer(&entry.name, &entry.bytes, config))
            }
        })
    }
}

/// Classify and deduplicate every document across all sources.
///
/// The same access key appearing in several archives (or loose and zipped)
/// is kept once, in first-seen order. ZIP files inside archives are followed
/// when [`AuditConfig::nested_archives`] is set. An unreadable archive aborts
/// the batch.
pub fn classify_batch(
    sources: &[InputSource],
    config: &AuditConfig,
) -> Result<ClassificationReport, AuditError> {
    let panning = sources
        .iter()
        .try_fold(Panning::default(), |acc, source| match source.kind() {
            SourceKind::Document => Ok(acc.offer(&source.name, &source.bytes, config)),
            SourceKind::Archive => acc.archive(&source.name, &source.bytes, config, 0),
            SourceKind::Unsupported => {
                warn!(source = %source.name, "skipping unsupported input");
                Ok(acc)
            }
        })?;

    let report = panning.report;
    info!(
        documents = report.documents.len(),
        duplicates = report.duplicates,
        rejected = report.rejected,
        "classification batch finished"
    );
    Ok(report)
}
