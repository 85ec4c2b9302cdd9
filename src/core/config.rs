use serde::{Deserialize, Serialize};

use super::error::AuditError;
use super::taxid::normalize_cnpj;

/// Number of leading bytes scanned for an XML/invoice marker before a
/// document is rejected by the classifier.
pub const DEFAULT_SCAN_LIMIT: usize = 20_000;

/// Configuration shared by both pipelines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// CNPJ of the audited taxpayer, digits only.
    pub taxpayer_cnpj: String,
    /// Leading bytes inspected for an XML or invoice root marker.
    pub scan_limit: usize,
    /// Descend into ZIP files found inside ZIP archives (classifier only).
    pub nested_archives: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            taxpayer_cnpj: String::new(),
            scan_limit: DEFAULT_SCAN_LIMIT,
            nested_archives: true,
        }
    }
}

impl AuditConfig {
    /// Configuration with defaults for the given taxpayer (any formatting).
    pub fn new(taxpayer_cnpj: &str) -> Result<Self, AuditError> {
        AuditConfigBuilder::new(taxpayer_cnpj).build()
    }

    /// Check a configuration that was deserialized or built by hand.
    pub fn validate(&self) -> Result<(), AuditError> {
        normalize_cnpj(&self.taxpayer_cnpj)?;
        if self.scan_limit == 0 {
            return Err(AuditError::Config("scan_limit must be greater than zero".into()));
        }
        Ok(())
    }
}

/// Builder for [`AuditConfig`].
///
/// ```
/// use nfe_audit::core::AuditConfigBuilder;
///
/// let config = AuditConfigBuilder::new("11.222.333/0001-44")
///     .scan_limit(4096)
///     .nested_archives(false)
///     .build()
///     .unwrap();
/// assert_eq!(config.taxpayer_cnpj, "11222333000144");
/// ```
pub struct AuditConfigBuilder {
    taxpayer: String,
    config: AuditConfig,
}

impl AuditConfigBuilder {
    pub fn new(taxpayer_cnpj: impl Into<String>) -> Self {
        Self {
            taxpayer: taxpayer_cnpj.into(),
            config: AuditConfig::default(),
        }
    }

    /// Set how many leading bytes the classifier inspects.
    pub fn scan_limit(mut self, bytes: usize) -> Self {
        self.config.scan_limit = bytes;
        self
    }

    /// Enable or disable descending into nested ZIP files.
    pub fn nested_archives(mut self, enabled: bool) -> Self {
        self.config.nested_archives = enabled;
        self
    }

    /// Normalize the CNPJ and validate the result.
    pub fn build(mut self) -> Result<AuditConfig, AuditError> {
        self.config.taxpayer_cnpj = normalize_cnpj(&self.taxpayer)?;
        self.config.validate()?;
        Ok(self.config)
    }
}
