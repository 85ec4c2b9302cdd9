//! Raw-text markers used to classify documents without a structural parse.
//!
//! All patterns run against the lower-cased document text. Namespace
//! prefixes on tags (`<nfe:serie>`) are tolerated.
//!
//! Known limitation: event codes are matched as bare substrings, so a value
//! that happens to contain `110111` or `110110` is classified as an event.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Event type code of an NF-e/CT-e cancellation.
pub const CANCELLATION_EVENT: &str = "110111";
/// Event type code of a correction letter (CC-e).
pub const CORRECTION_EVENT: &str = "110110";

/// Root elements of number-voiding (inutilização) documents.
pub const VOIDED_MARKERS: [&str; 6] = [
    "<inutnfe",
    "<procinutnfe",
    "<retinutnfe",
    "<inutcte",
    "<procinutcte",
    "<retinutcte",
];

/// Markers that make a buffer plausible as a fiscal XML document.
pub const XML_MARKERS: [&str; 9] = [
    "<?xml",
    "<nfe",
    "<cte",
    "<mdfe",
    "<procevento",
    "<evento",
    "<inut",
    "<procinut",
    "<retinut",
];

/// 44-digit access key, ASCII digits only.
pub static ACCESS_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{44}").expect("access key regex"));

pub static MODEL_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(?:\w+:)?mod>\s*([0-9]{2})\s*<").expect("mod regex"));

pub static SERIES_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(?:\w+:)?serie>\s*([0-9]+)\s*<").expect("serie regex"));

pub static NUMBER_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?:\w+:)?n(?:nf|ct|mdf)>\s*([0-9]+)\s*<").expect("number regex")
});

pub static VOIDED_START_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?:\w+:)?n(?:nf|ct)ini>\s*([0-9]+)\s*<").expect("voided range regex")
});

/// Body of the first `<emit>` group, up to its closing tag.
pub static EMIT_GROUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(?:\w+:)?emit>(.*?)</(?:\w+:)?emit>").expect("emit regex")
});

pub static ANY_CNPJ: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?:\w+:)?cnpj>\s*([0-9./-]+)\s*<").expect("cnpj regex")
});

pub static NFE_TOTAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(?:\w+:)?vnf>([^<]*)<").expect("vNF regex"));

pub static CTE_TOTAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(?:\w+:)?vtprest>([^<]*)<").expect("vTPrest regex"));

pub static MDFE_TOTAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(?:\w+:)?vcarga>([^<]*)<").expect("vCarga regex"));

/// Fiscal document model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DocumentModel {
    /// NF-e, model 55.
    NFe,
    /// NFC-e, model 65.
    NFCe,
    /// CT-e, model 57.
    CTe,
    /// MDF-e, model 58.
    MDFe,
    Other,
}

impl DocumentModel {
    /// Model from its two-digit code.
    pub fn from_code(code: &str) -> Self {
        match code {
            "55" => DocumentModel::NFe,
            "65" => DocumentModel::NFCe,
            "57" => DocumentModel::CTe,
            "58" => DocumentModel::MDFe,
            _ => DocumentModel::Other,
        }
    }

    pub fn code(&self) -> Option<&'static str> {
        match self {
            DocumentModel::NFe => Some("55"),
            DocumentModel::NFCe => Some("65"),
            DocumentModel::CTe => Some("57"),
            DocumentModel::MDFe => Some("58"),
            DocumentModel::Other => None,
        }
    }

    /// Folder / column label.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentModel::NFe => "NF-e",
            DocumentModel::NFCe => "NFC-e",
            DocumentModel::CTe => "CT-e",
            DocumentModel::MDFe => "MDF-e",
            DocumentModel::Other => "OUTROS",
        }
    }
}

impl std::fmt::Display for DocumentModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Document status as inferred from event markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    Normal,
    Cancelled,
    CorrectionLetter,
    /// Number range voided before use (inutilização).
    Voided,
}

impl DocumentStatus {
    /// Detect the status from lower-cased raw text.
    pub fn detect(lower: &str) -> Self {
        if lower.contains(CANCELLATION_EVENT) {
            DocumentStatus::Cancelled
        } else if lower.contains(CORRECTION_EVENT) {
            DocumentStatus::CorrectionLetter
        } else if VOIDED_MARKERS.iter().any(|m| lower.contains(m)) {
            DocumentStatus::Voided
        } else {
            DocumentStatus::Normal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentStatus::Normal => "NORMAIS",
            DocumentStatus::Cancelled => "CANCELADOS",
            DocumentStatus::CorrectionLetter => "CARTA_CORRECAO",
            DocumentStatus::Voided => "INUTILIZADOS",
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// First capture group of `re` in `text`.
pub(crate) fn capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// CNPJ declared inside the `<emit>` group.
///
/// `None` when there is no closed `<emit>` group or when the issuer is
/// identified by something else (e.g. a CPF); a CNPJ further down the
/// document never counts.
pub fn issuer_cnpj(lower: &str) -> Option<&str> {
    capture(&EMIT_GROUP, lower).and_then(|emit| capture(&ANY_CNPJ, emit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_codes() {
        for model in [
            DocumentModel::NFe,
            DocumentModel::NFCe,
            DocumentModel::CTe,
            DocumentModel::MDFe,
        ] {
            let code = model.code().unwrap();
            assert_eq!(DocumentModel::from_code(code), model);
        }
        assert_eq!(DocumentModel::from_code("01"), DocumentModel::Other);
    }

    #[test]
    fn status_precedence() {
        assert_eq!(
            DocumentStatus::detect("<tpevento>110111</tpevento>"),
            DocumentStatus::Cancelled
        );
        assert_eq!(
            DocumentStatus::detect("<tpevento>110110</tpevento>"),
            DocumentStatus::CorrectionLetter
        );
        assert_eq!(DocumentStatus::detect("<procinutnfe>"), DocumentStatus::Voided);
        assert_eq!(DocumentStatus::detect("<nfeproc>"), DocumentStatus::Normal);
    }

    #[test]
    fn event_code_collision_is_a_known_false_positive() {
        assert_eq!(
            DocumentStatus::detect("<vprod>110111.00</vprod>"),
            DocumentStatus::Cancelled
        );
    }

    #[test]
    fn tag_patterns_tolerate_prefixes() {
        assert_eq!(capture(&SERIES_TAG, "<nfe:serie>3</nfe:serie>"), Some("3"));
        assert_eq!(capture(&NUMBER_TAG, "<nct> 77 </nct>"), Some("77"));
        assert_eq!(capture(&MODEL_TAG, "<mod>65</mod>"), Some("65"));
        assert_eq!(
            issuer_cnpj("<emit>\n <cnpj>11222333000144</cnpj></emit>"),
            Some("11222333000144")
        );
    }

    #[test]
    fn issuer_cnpj_stays_inside_emit() {
        let cpf_issuer = "<emit><cpf>12345678901</cpf><xnome>joao</xnome></emit>\
                          <dest><cnpj>11222333000144</cnpj></dest>";
        assert_eq!(issuer_cnpj(cpf_issuer), None);
        assert_eq!(
            issuer_cnpj("<nfe:emit><nfe:cnpj>11.222.333/0001-44</nfe:cnpj></nfe:emit>"),
            Some("11.222.333/0001-44")
        );
        assert_eq!(issuer_cnpj("<emit><cnpj>11222333000144</cnpj>"), None);
    }

    #[test]
    fn access_key_requires_ascii_digits() {
        let arabic_indic: String = std::iter::repeat('\u{0663}').take(44).collect();
        let key = "35240111222333000144550010000012341000012345";
        let text = format!("<x>{arabic_indic}</x><chnfe>{key}</chnfe>");
        assert_eq!(ACCESS_KEY.find(&text).map(|m| m.as_str()), Some(key));

        let fullwidth: String = std::iter::repeat('\u{FF11}').take(44).collect();
        assert!(ACCESS_KEY.find(&fullwidth).is_none());
        assert_eq!(capture(&NUMBER_TAG, "<nnf>\u{0663}</nnf>"), None);
    }
}
