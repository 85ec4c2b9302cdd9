//! Per-document NF-e line-item extraction.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::record::{Direction, LineRecord};
use crate::core::{DiscardReason, XmlNode, digits_only, normalize_text, tag_text};

/// `xmlns="..."` and `xmlns:prefix="..."` declarations.
static NAMESPACE_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\sxmlns(:\w+)?="[^"]+""#).expect("namespace regex"));

/// Prefix of `infNFe@Id` in front of the 44-digit key (`"NFe"`).
const KEY_PREFIX_LEN: usize = 3;

/// Result of processing one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// The document was an NF-e; one record per `det` (possibly none).
    Extracted(Vec<LineRecord>),
    /// The document contributed nothing.
    Discarded(DiscardReason),
}

impl DocumentOutcome {
    /// Records carried by the outcome (empty when discarded).
    pub fn into_records(self) -> Vec<LineRecord> {
        match self {
            DocumentOutcome::Extracted(records) => records,
            DocumentOutcome::Discarded(_) => Vec::new(),
        }
    }
}

/// Decode, clean and parse a raw XML buffer, then extract its line items.
///
/// `taxpayer` is the audited CNPJ in any formatting. Failures never escape:
/// a buffer that is not XML, or XML without `infNFe`, yields
/// [`DocumentOutcome::Discarded`].
pub fn extract_document(bytes: &[u8], taxpayer: &str) -> DocumentOutcome {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim_start_matches('\u{feff}');
    let cleaned = strip_namespaces(text);

    let root = match XmlNode::parse(&cleaned) {
        Ok(root) => root,
        Err(e) => return DocumentOutcome::Discarded(DiscardReason::Malformed(e.to_string())),
    };

    match extract_from_tree(&root, taxpayer) {
        Some(records) => DocumentOutcome::Extracted(records),
        None => DocumentOutcome::Discarded(DiscardReason::NotAnInvoice),
    }
}

/// Remove every namespace declaration so lookups see bare element names.
pub fn strip_namespaces(xml: &str) -> String {
    NAMESPACE_DECL.replace_all(xml, "").into_owned()
}

/// Extract line records from an already parsed document.
///
/// Returns `None` when the tree has no `infNFe` element.
pub fn extract_from_tree(root: &XmlNode, taxpayer: &str) -> Option<Vec<LineRecord>> {
    let inf = root.find("infNFe")?;

    let ide = root.find("ide");
    let emit = root.find("emit");
    let dest = root.find("dest");

    let issuer_cnpj = digits_only(&tag_text("CNPJ", emit));
    let taxpayer_cnpj = digits_only(taxpayer);
    let direction = Direction::classify(&issuer_cnpj, &taxpayer_cnpj, &tag_text("tpNF", ide));

    let access_key: String = inf
        .attr("Id")
        .unwrap_or_default()
        .chars()
        .skip(KEY_PREFIX_LEN)
        .collect();
    let access_key = access_key.trim().to_string();

    let number = tag_text("nNF", ide);
    let issued_at = first_non_empty(&[tag_text("dhEmi", ide), tag_text("dEmi", ide)]);
    let issuer_uf = tag_text("UF", emit);
    let recipient_cnpj = digits_only(&tag_text("CNPJ", dest));
    let recipient_uf = tag_text("UF", dest);
    let recipient_ie_indicator = tag_text("indIEDest", dest);

    let records: Vec<LineRecord> = root
        .find_all("det")
        .map(|det| {
            let prod = det.child("prod");
            let imp = det.child("imposto");
            let icms = det.find("ICMS");
            let ipi = det.find("IPI");
            let pis = det.find("PIS");
            let cofins = det.find("COFINS");
            let ibs = det.find("IBS");
            let cbs = det.find("CBS");

            let num = |tag: &str, node: Option<&XmlNode>| normalize_text(&tag_text(tag, node));

            let icms_origin = tag_text("orig", icms);
            let situation = first_non_empty(&[tag_text("CST", icms), tag_text("CSOSN", icms)]);
            let icms_cst = format!("{icms_origin}{situation}");

            LineRecord {
                access_key: access_key.clone(),
                number: number.clone(),
                issued_at: issued_at.clone(),
                direction,

                issuer_cnpj: issuer_cnpj.clone(),
                issuer_uf: issuer_uf.clone(),
                recipient_cnpj: recipient_cnpj.clone(),
                recipient_uf: recipient_uf.clone(),
                recipient_ie_indicator: recipient_ie_indicator.clone(),

                cfop: tag_text("CFOP", prod),
                ncm: tag_text("NCM", prod),
                product_value: num("vProd", prod),

                icms_origin,
                icms_cst,
                icms_base: num("vBC", icms),
                icms_rate: num("pICMS", icms),
                icms_value: num("vICMS", icms),
                icms_st_value: num("vICMSST", icms),
                substitute_ie: tag_text("IEST", icms).trim().to_string(),
                difal_value: num("vICMSUFDest", imp) + num("vFCPUFDest", imp),

                ipi_cst: tag_text("CST", ipi),
                ipi_rate: num("pIPI", ipi),
                ipi_value: num("vIPI", ipi),
                pis_cst: tag_text("CST", pis),
                pis_value: num("vPIS", pis),
                cofins_cst: tag_text("CST", cofins),
                cofins_value: num("vCOFINS", cofins),

                cl_class: first_non_empty(&[tag_text("CLClass", prod), tag_text("CLClass", imp)]),
                ibs_cst: tag_text("CST", ibs),
                ibs_base: num("vBC", ibs),
                ibs_value: num("vIBS", ibs),
                cbs_cst: tag_text("CST", cbs),
                cbs_base: num("vBC", cbs),
                cbs_value: num("vCBS", cbs),
            }
        })
        .collect();

    debug!(key = %access_key, items = records.len(), %direction, "extracted NF-e");
    Some(records)
}

fn first_non_empty(candidates: &[String]) -> String {
    candidates
        .iter()
        .find(|s| !s.is_empty())
        .cloned()
        .unwrap_or_default()
}
