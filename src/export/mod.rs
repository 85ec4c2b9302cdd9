//! Export helpers: CSV tables and re-bucketed ZIP archives.
//!
//! The tables are the hand-off point to spreadsheet tooling; the archives
//! mirror the folder taxonomy computed by the classifier.
//!
//! # Example
//!
//! ```ignore
//! use nfe_audit::export::*;
//!
//! let csv = records_to_csv(&report.records);
//! let by_folder = bucketed_archive(&classification_report)?;
//! let flat = flat_archive(&classification_report)?;
//! ```

mod archive;
mod csv;

pub use archive::{bucketed_archive, flat_archive};
pub use csv::{
    CLASSIFICATION_COLUMNS, MISSING_COLUMNS, MISSING_RANGE_COLUMNS, SUMMARY_COLUMNS,
    classifications_to_csv, missing_numbers_to_csv, missing_ranges_to_csv, records_to_csv,
    summaries_to_csv,
};
