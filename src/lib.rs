//! # nfe-audit
//!
//! Extraction and audit tooling for Brazilian fiscal XML documents
//! (NF-e, NFC-e, CT-e, MDF-e), delivered loose or packed in ZIP archives.
//!
//! Two independent pipelines:
//!
//! - [`extract`]: one normalized row per NF-e line item, covering ICMS, IPI,
//!   PIS, COFINS and the IBS/CBS/CLClass tax-reform fields, tagged as
//!   inbound (`ENTRADA`) or outbound (`SAIDA`) for the audited taxpayer.
//! - [`classify`]: access-key fingerprinting, model/status classification,
//!   cross-upload deduplication, folder bucketing and a per-series numbering
//!   audit that reports missing invoice numbers.
//!
//! A malformed document never aborts a batch: it is counted and logged
//! (via `tracing`) and the batch moves on. All amounts are
//! [`rust_decimal::Decimal`] rounded to 4 places.
//!
//! ## Quick Start
//!
//! ```rust
//! use nfe_audit::core::{AuditConfig, InputSource};
//! use nfe_audit::extract::{Direction, extract_batch};
//!
//! let xml = r#"<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe"><NFe><infNFe Id="NFe35240111222333000144550010000012341000012345">
//!   <ide><nNF>1234</nNF><tpNF>1</tpNF></ide>
//!   <emit><CNPJ>11222333000144</CNPJ></emit>
//!   <det nItem="1"><prod><CFOP>5102</CFOP><vProd>1.234,56</vProd></prod></det>
//! </infNFe></NFe></nfeProc>"#;
//!
//! let config = AuditConfig::new("11.222.333/0001-44").unwrap();
//! let report = extract_batch(&[InputSource::new("nota.xml", xml)], &config).unwrap();
//!
//! assert_eq!(report.records.len(), 1);
//! assert_eq!(report.records[0].direction, Direction::Outbound);
//! assert_eq!(report.records[0].product_value.to_string(), "1234.56");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Numeric coercion, XML tree, CNPJ helpers, input sources, config |
//! | `extract` (default) | NF-e line-item extraction |
//! | `classify` (default) | Classification, deduplication, sequence audit |
//! | `export` | CSV tables and re-bucketed ZIP archives |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "extract")]
pub mod extract;

#[cfg(feature = "classify")]
pub mod classify;

#[cfg(feature = "export")]
pub mod export;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
