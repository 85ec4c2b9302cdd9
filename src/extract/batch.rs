use tracing::{info, warn};

use super::extractor::{DocumentOutcome, extract_document};
use super::record::LineRecord;
use crate::core::{
    AuditConfig, AuditError, DiscardReason, InputSource, SourceKind, has_extension, read_archive,
};

/// A document that contributed no records, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscardedDocument {
    /// Source name, or `archive.zip/entry.xml` for archive entries.
    pub name: String,
    pub reason: DiscardReason,
}

/// Accumulated result of an extraction batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// All line records, in input order then line-item order.
    pub records: Vec<LineRecord>,
    /// Number of XML documents handed to the extractor.
    pub documents: usize,
    /// Documents that yielded nothing.
    pub discarded: Vec<DiscardedDocument>,
}

impl ExtractionReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// User-facing one-line outcome of the batch.
    pub fn summary(&self) -> String {
        if self.records.is_empty() {
            "no valid records found".to_string()
        } else {
            format!("{} records extracted", self.records.len())
        }
    }

    fn absorb(mut self, name: String, outcome: DocumentOutcome) -> Self {
        self.documents += 1;
        match outcome {
            DocumentOutcome::Extracted(records) => self.records.extend(records),
            DocumentOutcome::Discarded(reason) => {
                warn!(document = %name, %reason, "document discarded");
                self.discarded.push(DiscardedDocument { name, reason });
            }
        }
        self
    }
}

/// Extract line records from loose XML files and ZIP archives.
///
/// Loose `.xml` sources are processed directly; every `.xml` entry of a
/// `.zip` source is processed in archive order. Other sources are skipped.
/// Bad documents are recorded in [`ExtractionReport::discarded`]; an archive
/// that cannot be read aborts the batch with [`AuditError::Archive`].
pub fn extract_batch(
    sources: &[InputSource],
    config: &AuditConfig,
) -> Result<ExtractionReport, AuditError> {
    let mut report = ExtractionReport::default();

    for source in sources {
        report = match source.kind() {
            SourceKind::Document => {
                let outcome = extract_document(&source.bytes, &config.taxpayer_cnpj);
                report.absorb(source.name.clone(), outcome)
            }
            SourceKind::Archive => {
                let entries = read_archive(&source.name, &source.bytes, |n| has_extension(n, "xml"))?;
                entries.into_iter().fold(report, |acc, entry| {
                    let outcome = extract_document(&entry.bytes, &config.taxpayer_cnpj);
                    acc.absorb(format!("{}/{}", source.name, entry.name), outcome)
                })
            }
            SourceKind::Unsupported => {
                warn!(source = %source.name, "skipping unsupported input");
                report
            }
        };
    }

    info!(
        documents = report.documents,
        records = report.records.len(),
        discarded = report.discarded.len(),
        "extraction batch finished"
    );
    Ok(report)
}
