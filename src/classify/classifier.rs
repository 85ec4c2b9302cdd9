//! Heuristic per-document classification.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::markers::{
    ACCESS_KEY, ANY_CNPJ, CTE_TOTAL, DocumentModel, DocumentStatus, MDFE_TOTAL,
    MODEL_TAG, NFE_TOTAL, NUMBER_TAG, SERIES_TAG, VOIDED_START_TAG, XML_MARKERS, capture,
    issuer_cnpj,
};
use crate::core::{AuditConfig, base_name, digits_only, has_extension, normalize_text};

/// Folder root for documents issued by the audited taxpayer.
pub const OWNED_FOLDER: &str = "EMITIDOS_CLIENTE";
/// Folder root for everything else.
pub const THIRD_PARTY_FOLDER: &str = "RECEBIDOS_TERCEIROS";

/// Summary of one fiscal document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Base name of the file (without archive directories).
    pub filename: String,
    /// 44-digit access key, or `""` when none was found.
    pub key: String,
    pub model: DocumentModel,
    /// Series without leading zeros (`""` when unknown).
    pub series: String,
    pub number: Option<u64>,
    pub status: DocumentStatus,
    /// Declared total; zero unless the status is [`DocumentStatus::Normal`].
    pub value: Decimal,
    /// Target folder, e.g. `EMITIDOS_CLIENTE/NF-e/NORMAIS/Serie_1`.
    pub folder: String,
    /// Issued by the audited taxpayer.
    pub owned: bool,
}

impl Classification {
    /// Deduplication key: the access key, or the file name when there is none.
    pub fn fingerprint(&self) -> &str {
        if self.key.is_empty() {
            &self.filename
        } else {
            &self.key
        }
    }

    /// Folder plus file name.
    pub fn path(&self) -> String {
        format!("{}/{}", self.folder, self.filename)
    }
}

/// Positional fields of a 44-digit access key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyParts<'a> {
    /// IBGE state code, digits 1-2.
    pub uf: &'a str,
    /// `AAMM` of issue, digits 3-6.
    pub year_month: &'a str,
    /// Digits 7-20.
    pub issuer_cnpj: &'a str,
    /// Two-digit model code, digits 21-22.
    pub model: &'a str,
    /// Zero-padded series, digits 23-25.
    pub series: &'a str,
    /// Zero-padded document number, digits 26-34.
    pub number: &'a str,
}

impl<'a> KeyParts<'a> {
    /// Split a key; `None` unless it is exactly 44 ASCII digits.
    pub fn parse(key: &'a str) -> Option<Self> {
        if key.len() != 44 || !key.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self {
            uf: &key[0..2],
            year_month: &key[2..6],
            issuer_cnpj: &key[6..20],
            model: &key[20..22],
            series: &key[22..25],
            number: &key[25..34],
        })
    }
}

/// True for hidden files, office lock files and macOS resource forks.
pub fn is_hidden(name: &str) -> bool {
    let base = base_name(name);
    base.starts_with('.')
        || base.starts_with('~')
        || name.split(['/', '\\']).any(|seg| seg == "__MACOSX")
}

/// Cheap plausibility check: XML extension, not hidden, and a marker in the
/// first `scan_limit` bytes.
pub fn is_candidate(filename: &str, bytes: &[u8], scan_limit: usize) -> bool {
    if !has_extension(filename, "xml") || is_hidden(filename) {
        return false;
    }
    let head = &bytes[..bytes.len().min(scan_limit)];
    let head = String::from_utf8_lossy(head).to_lowercase();
    XML_MARKERS.iter().any(|m| head.contains(m))
}

/// Classify a raw document, or `None` when it is not a plausible fiscal XML.
///
/// Classification works on the lower-cased raw text and never parses the XML
/// structurally, so truncated or otherwise broken files are still bucketed.
pub fn classify_document(
    bytes: &[u8],
    filename: &str,
    config: &AuditConfig,
) -> Option<Classification> {
    if !is_candidate(filename, bytes, config.scan_limit) {
        return None;
    }

    let lower = String::from_utf8_lossy(bytes).to_lowercase();
    let key = ACCESS_KEY
        .find(&lower)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let parts = KeyParts::parse(&key);

    let status = DocumentStatus::detect(&lower);
    let model = detect_model(&lower, parts.as_ref());

    let series = capture(&SERIES_TAG, &lower)
        .or(parts.map(|p| p.series))
        .map(strip_leading_zeros)
        .unwrap_or_default();

    let number_text = if status == DocumentStatus::Voided {
        capture(&VOIDED_START_TAG, &lower)
    } else {
        capture(&NUMBER_TAG, &lower)
    };
    let number = number_text
        .or(parts.map(|p| p.number))
        .and_then(|n| n.parse::<u64>().ok());

    let value = if status == DocumentStatus::Normal {
        let total = match model {
            DocumentModel::CTe => &CTE_TOTAL,
            DocumentModel::MDFe => &MDFE_TOTAL,
            _ => &NFE_TOTAL,
        };
        normalize_text(capture(total, &lower).unwrap_or_default())
    } else {
        Decimal::ZERO
    };

    let taxpayer = digits_only(&config.taxpayer_cnpj);
    let issuer = issuer_cnpj(&lower)
        .or_else(|| {
            // voiding requests carry the issuer CNPJ outside any <emit> group
            (status == DocumentStatus::Voided)
                .then(|| capture(&ANY_CNPJ, &lower))
                .flatten()
        })
        .map(digits_only)
        .unwrap_or_default();
    let owned = !taxpayer.is_empty()
        && (issuer == taxpayer || parts.is_some_and(|p| p.issuer_cnpj == taxpayer));

    let folder = folder_for(owned, model, status, &series);

    Some(Classification {
        filename: base_name(filename).to_string(),
        key,
        model,
        series,
        number,
        status,
        value,
        folder,
        owned,
    })
}

fn detect_model(lower: &str, parts: Option<&KeyParts<'_>>) -> DocumentModel {
    let from_tag = capture(&MODEL_TAG, lower).map(DocumentModel::from_code);
    let from_key = parts.map(|p| DocumentModel::from_code(p.model));

    [from_tag, from_key]
        .into_iter()
        .flatten()
        .find(|m| *m != DocumentModel::Other)
        .unwrap_or_else(|| {
            if lower.contains("<cte") {
                DocumentModel::CTe
            } else if lower.contains("<mdfe") {
                DocumentModel::MDFe
            } else if lower.contains("<nfe") {
                DocumentModel::NFe
            } else {
                DocumentModel::Other
            }
        })
}

/// `{owner}/{model}/{status}[/Serie_{series}]`.
pub fn folder_for(
    owned: bool,
    model: DocumentModel,
    status: DocumentStatus,
    series: &str,
) -> String {
    let owner = if owned { OWNED_FOLDER } else { THIRD_PARTY_FOLDER };
    let mut folder = format!("{owner}/{}/{}", model.label(), status.label());
    if !series.is_empty() {
        folder.push_str("/Serie_");
        folder.push_str(series);
    }
    folder
}

fn strip_leading_zeros(s: &str) -> String {
    let trimmed = s.trim_start_matches('0');
    if trimmed.is_empty() && !s.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
