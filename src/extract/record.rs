use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of an operation relative to the audited taxpayer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Issued by the taxpayer as an outgoing document (`tpNF = 1`).
    Outbound,
    /// Everything else: purchases, returns, third-party documents.
    Inbound,
}

impl Direction {
    /// `ide/tpNF` value marking an outgoing document.
    pub const OUTBOUND_FLAG: &'static str = "1";

    /// Outbound iff the issuer is the taxpayer and the document is flagged
    /// outgoing. Both CNPJs must already be digits-only.
    pub fn classify(issuer_cnpj: &str, taxpayer_cnpj: &str, tp_nf: &str) -> Self {
        if issuer_cnpj == taxpayer_cnpj && tp_nf == Self::OUTBOUND_FLAG {
            Direction::Outbound
        } else {
            Direction::Inbound
        }
    }

    /// Column label used in exports.
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Outbound => "SAIDA",
            Direction::Inbound => "ENTRADA",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Column headers of the extraction table, in output order.
pub const LINE_COLUMNS: [&str; 34] = [
    "CHAVE_ACESSO",
    "NUM_NF",
    "DATA_EMISSAO",
    "TIPO_SISTEMA",
    "CNPJ_EMIT",
    "UF_EMIT",
    "CNPJ_DEST",
    "UF_DEST",
    "INDIEDEST",
    "CFOP",
    "NCM",
    "VPROD",
    "ORIGEM",
    "CST-ICMS",
    "BC-ICMS",
    "ALQ-ICMS",
    "VLR-ICMS",
    "VAL-ICMS-ST",
    "IE_SUBST",
    "VAL-DIFAL",
    "CST-IPI",
    "ALQ-IPI",
    "VLR-IPI",
    "CST-PIS",
    "VLR-PIS",
    "CST-COFINS",
    "VLR-COFINS",
    "CLCLASS",
    "CST-IBS",
    "BC-IBS",
    "VLR-IBS",
    "CST-CBS",
    "BC-CBS",
    "VLR-CBS",
];

/// One output row: a single `det` line item of an NF-e.
///
/// Field order matches [`LINE_COLUMNS`]. Text defaults to `""`, numbers to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    // identification
    /// `infNFe@Id` without its `NFe` prefix.
    pub access_key: String,
    /// `ide/nNF`.
    pub number: String,
    /// `ide/dhEmi`, else `ide/dEmi` (older layouts).
    pub issued_at: String,
    /// From `emit/CNPJ` against the taxpayer and `ide/tpNF`.
    pub direction: Direction,

    // trade flow
    /// `emit/CNPJ`, digits only.
    pub issuer_cnpj: String,
    /// `emit//UF`.
    pub issuer_uf: String,
    /// `dest/CNPJ`, digits only.
    pub recipient_cnpj: String,
    /// `dest//UF`.
    pub recipient_uf: String,
    /// `dest/indIEDest`.
    pub recipient_ie_indicator: String,

    // item
    /// `prod/CFOP`.
    pub cfop: String,
    /// `prod/NCM`.
    pub ncm: String,
    /// `prod/vProd`.
    pub product_value: Decimal,

    // ICMS
    /// `ICMS//orig`.
    pub icms_origin: String,
    /// `ICMS//orig` followed by `CST`, or by `CSOSN` under Simples Nacional.
    pub icms_cst: String,
    /// `ICMS//vBC`.
    pub icms_base: Decimal,
    /// `ICMS//pICMS`.
    pub icms_rate: Decimal,
    /// `ICMS//vICMS`.
    pub icms_value: Decimal,
    /// `ICMS//vICMSST`.
    pub icms_st_value: Decimal,
    /// `ICMS//IEST`, trimmed.
    pub substitute_ie: String,
    /// `imposto//vICMSUFDest` plus `imposto//vFCPUFDest`.
    pub difal_value: Decimal,

    // IPI / PIS / COFINS
    /// `IPI//CST`.
    pub ipi_cst: String,
    /// `IPI//pIPI`.
    pub ipi_rate: Decimal,
    /// `IPI//vIPI`.
    pub ipi_value: Decimal,
    /// `PIS//CST`.
    pub pis_cst: String,
    /// `PIS//vPIS`.
    pub pis_value: Decimal,
    /// `COFINS//CST`.
    pub cofins_cst: String,
    /// `COFINS//vCOFINS`.
    pub cofins_value: Decimal,

    // tax reform
    /// `prod/CLClass`, else `imposto//CLClass`.
    pub cl_class: String,
    /// `IBS//CST`.
    pub ibs_cst: String,
    /// `IBS//vBC`.
    pub ibs_base: Decimal,
    /// `IBS//vIBS`.
    pub ibs_value: Decimal,
    /// `CBS//CST`.
    pub cbs_cst: String,
    /// `CBS//vBC`.
    pub cbs_base: Decimal,
    /// `CBS//vCBS`.
    pub cbs_value: Decimal,
}

/// A single table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell<'a> {
    Text(&'a str),
    Number(Decimal),
}

impl LineRecord {
    /// Cells in [`LINE_COLUMNS`] order.
    pub fn cells(&self) -> [Cell<'_>; 34] {
        use Cell::{Number as N, Text as T};
        [
            T(&self.access_key),
            T(&self.number),
            T(&self.issued_at),
            T(self.direction.label()),
            T(&self.issuer_cnpj),
            T(&self.issuer_uf),
            T(&self.recipient_cnpj),
            T(&self.recipient_uf),
            T(&self.recipient_ie_indicator),
            T(&self.cfop),
            T(&self.ncm),
            N(self.product_value),
            T(&self.icms_origin),
            T(&self.icms_cst),
            N(self.icms_base),
            N(self.icms_rate),
            N(self.icms_value),
            N(self.icms_st_value),
            T(&self.substitute_ie),
            N(self.difal_value),
            T(&self.ipi_cst),
            N(self.ipi_rate),
            N(self.ipi_value),
            T(&self.pis_cst),
            N(self.pis_value),
            T(&self.cofins_cst),
            N(self.cofins_value),
            T(&self.cl_class),
            T(&self.ibs_cst),
            N(self.ibs_base),
            N(self.ibs_value),
            T(&self.cbs_cst),
            N(self.cbs_base),
            N(self.cbs_value),
        ]
    }
}
