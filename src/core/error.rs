use thiserror::Error;

/// Errors that can surface from the audit pipelines.
///
/// Per-document problems (bad XML, missing invoice root, unparseable numbers)
/// never reach the caller as an `AuditError`; they are recorded as a
/// [`DiscardReason`] or absorbed as a zero value. Only batch-level I/O and
/// configuration failures propagate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuditError {
    /// XML could not be parsed into an element tree.
    #[error("XML error: {0}")]
    Xml(String),

    /// A ZIP archive could not be opened, read or written.
    #[error("archive error: {0}")]
    Archive(String),

    /// Reading an input file from disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration (e.g. a taxpayer CNPJ without 14 digits).
    #[error("configuration error: {0}")]
    Config(String),

    /// Rendering an export artifact failed.
    #[error("export error: {0}")]
    Export(String),
}

impl From<zip::result::ZipError> for AuditError {
    fn from(e: zip::result::ZipError) -> Self {
        AuditError::Archive(e.to_string())
    }
}

/// Why a single document contributed nothing to a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscardReason {
    /// The XML parsed but carries no `infNFe` element.
    NotAnInvoice,
    /// The buffer is not well-formed XML.
    Malformed(String),
}

impl std::fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscardReason::NotAnInvoice => write!(f, "no infNFe element"),
            DiscardReason::Malformed(msg) => write!(f, "malformed XML: {msg}"),
        }
    }
}
