//! Document classification, deduplication and numbering audit.
//!
//! Each XML is fingerprinted by its 44-digit access key, classified by model
//! (NF-e, NFC-e, CT-e, MDF-e) and status (normal, cancelled, correction
//! letter, voided) through raw-text markers, deduplicated across all inputs
//! and assigned a folder such as `EMITIDOS_CLIENTE/NF-e/NORMAIS/Serie_1`.
//! The taxpayer's normal documents feed a per-series [`SequenceAudit`].
//!
//! # Example
//!
//! ```no_run
//! use nfe_audit::classify::classify_batch;
//! use nfe_audit::core::{AuditConfig, InputSource};
//!
//! let config = AuditConfig::new("11222333000144").unwrap();
//! let sources = vec![
//!     InputSource::from_path("janeiro.zip").unwrap(),
//!     InputSource::from_path("fevereiro.zip").unwrap(),
//! ];
//! let report = classify_batch(&sources, &config).unwrap();
//! for gap in report.sequence_audit().missing_ranges() {
//!     println!("serie {} missing {}..={}", gap.series, gap.first, gap.last);
//! }
//! ```

mod batch;
mod classifier;
pub mod markers;
mod sequence;

pub use batch::{ClassificationReport, ClassifiedDocument, classify_batch};
pub use classifier::{
    Classification, KeyParts, OWNED_FOLDER, THIRD_PARTY_FOLDER, classify_document, folder_for,
    is_candidate, is_hidden,
};
pub use markers::{DocumentModel, DocumentStatus};
pub use sequence::{MissingNumber, MissingRange, SequenceAudit, SeriesSequence, SeriesSummary};
