//! NF-e line-item extraction.
//!
//! Turns NF-e XML (loose or zipped) into a flat table with one
//! [`LineRecord`] per `det` element, covering ICMS, IPI, PIS, COFINS and the
//! IBS/CBS tax-reform groups, and tags each row as inbound or outbound
//! relative to the audited taxpayer.
//!
//! # Example
//!
//! ```no_run
//! use nfe_audit::core::{AuditConfig, InputSource};
//! use nfe_audit::extract::extract_batch;
//!
//! let config = AuditConfig::new("11.222.333/0001-44").unwrap();
//! let sources = vec![InputSource::from_path("notas.zip").unwrap()];
//! let report = extract_batch(&sources, &config).unwrap();
//! println!("{}", report.summary());
//! ```

mod batch;
mod extractor;
mod record;

pub use batch::{DiscardedDocument, ExtractionReport, extract_batch};
pub use extractor::{DocumentOutcome, extract_document, extract_from_tree, strip_namespaces};
pub use record::{Cell, Direction, LINE_COLUMNS, LineRecord};
