use criterion::{Criterion, black_box, criterion_group, criterion_main};

use nfe_audit::classify::{SequenceAudit, classify_batch, classify_document};
use nfe_audit::core::*;
use nfe_audit::extract::{extract_batch, extract_document};

const TAXPAYER: &str = "11222333000144";

fn det(n: usize) -> String {
    format!(
        r#"<det nItem="{n}">
  <prod><cProd>{n}</cProd><CFOP>5102</CFOP><NCM>84713012</NCM><vProd>1.234,56</vProd></prod>
  <imposto>
    <ICMS><ICMS00><orig>0</orig><CST>00</CST><vBC>1234.56</vBC><pICMS>18.00</pICMS><vICMS>222.22</vICMS></ICMS00></ICMS>
    <IPI><IPITrib><CST>50</CST><pIPI>5.00</pIPI><vIPI>61.73</vIPI></IPITrib></IPI>
    <PIS><PISAliq><CST>01</CST><vPIS>20.37</vPIS></PISAliq></PIS>
    <COFINS><COFINSAliq><CST>01</CST><vCOFINS>93.83</vCOFINS></COFINSAliq></COFINS>
    <IBSCBS><CLClass>000001</CLClass><IBS><CST>000</CST><vBC>1234.56</vBC><vIBS>1.23</vIBS></IBS><CBS><CST>000</CST><vBC>1234.56</vBC><vCBS>11.11</vCBS></CBS></IBSCBS>
  </imposto>
</det>"#
    )
}

fn build_nfe(number: u64, items: usize) -> String {
    let key = format!("352401{TAXPAYER}55001{number:09}1{number:08}0");
    let dets: String = (1..=items).map(det).collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe" versao="4.00">
  <NFe xmlns="http://www.portalfiscal.inf.br/nfe">
    <infNFe Id="NFe{key}" versao="4.00">
      <ide><mod>55</mod><serie>1</serie><nNF>{number}</nNF><dhEmi>2024-01-15T10:00:00-03:00</dhEmi><tpNF>1</tpNF></ide>
      <emit><CNPJ>{TAXPAYER}</CNPJ><enderEmit><UF>SP</UF></enderEmit></emit>
      <dest><CNPJ>99888777000166</CNPJ><enderDest><UF>MG</UF></enderDest><indIEDest>1</indIEDest></dest>
      {dets}
      <total><ICMSTot><vNF>{items}234,56</vNF></ICMSTot></total>
    </infNFe>
  </NFe>
</nfeProc>"#
    )
}

fn bench_extract_document(c: &mut Criterion) {
    let small = build_nfe(1, 10);
    let big = build_nfe(2, 500);

    c.bench_function("extract_document_10_items", |b| {
        b.iter(|| extract_document(black_box(small.as_bytes()), TAXPAYER))
    });
    c.bench_function("extract_document_500_items", |b| {
        b.iter(|| extract_document(black_box(big.as_bytes()), TAXPAYER))
    });
}

fn bench_extract_batch(c: &mut Criterion) {
    let config = AuditConfig::new(TAXPAYER).unwrap();
    let sources: Vec<InputSource> = (1..=100)
        .map(|n| InputSource::new(format!("{n}.xml"), build_nfe(n, 5)))
        .collect();

    c.bench_function("extract_batch_100_docs", |b| {
        b.iter(|| extract_batch(black_box(&sources), &config).unwrap())
    });
}

fn bench_classify(c: &mut Criterion) {
    let config = AuditConfig::new(TAXPAYER).unwrap();
    let doc = build_nfe(1, 10);
    c.bench_function("classify_document", |b| {
        b.iter(|| classify_document(black_box(doc.as_bytes()), "nota.xml", &config))
    });

    // every third number missing
    let sources: Vec<InputSource> = (1..=300u64)
        .filter(|n| n % 3 != 0)
        .map(|n| InputSource::new(format!("{n}.xml"), build_nfe(n, 1)))
        .collect();
    c.bench_function("classify_batch_and_audit_200_docs", |b| {
        b.iter(|| {
            let report = classify_batch(black_box(&sources), &config).unwrap();
            let audit: SequenceAudit = report.sequence_audit();
            audit.missing_numbers()
        })
    });
}

criterion_group!(
    benches,
    bench_extract_document,
    bench_extract_batch,
    bench_classify
);
criterion_main!(benches);
