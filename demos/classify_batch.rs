//! Classify, deduplicate and re-bucket fiscal XMLs, then audit numbering gaps.
//!
//! ```text
//! cargo run --example classify_batch --features all -- 11222333000144 out/ janeiro.zip fevereiro.zip
//! ```
//!
//! Writes `classificados.zip`, `todos.zip`, `classificacao.csv`, `resumo.csv`
//! and `faltantes.csv` into the output directory.

use std::path::Path;

use nfe_audit::classify::classify_batch;
use nfe_audit::core::*;
use nfe_audit::export::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("nfe_audit=info".parse().unwrap()))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        eprintln!("usage: classify_batch <taxpayer-cnpj> <out-dir> <file.xml|file.zip>...");
        std::process::exit(2);
    }

    if let Err(e) = run(&args[0], Path::new(&args[1]), &args[2..]) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cnpj: &str, out: &Path, inputs: &[String]) -> Result<(), AuditError> {
    let config = AuditConfig::new(cnpj)?;
    let sources = inputs
        .iter()
        .map(InputSource::from_path)
        .collect::<Result<Vec<_>, _>>()?;

    let report = classify_batch(&sources, &config)?;
    println!("{}", report.summary());
    if report.is_empty() {
        return Ok(());
    }

    let audit = report.sequence_audit();
    let missing = audit.missing_ranges();
    for summary in audit.summaries() {
        println!(
            "  {} serie {}: {}..={} ({} docs, total {})",
            summary.model, summary.series, summary.first, summary.last, summary.count, summary.total
        );
    }
    println!(
        "{} missing numbers in {} runs",
        missing.iter().map(|r| r.count()).sum::<u64>(),
        missing.len()
    );

    std::fs::create_dir_all(out)?;
    std::fs::write(out.join("classificados.zip"), bucketed_archive(&report)?)?;
    std::fs::write(out.join("todos.zip"), flat_archive(&report)?)?;
    std::fs::write(
        out.join("classificacao.csv"),
        classifications_to_csv(report.classifications()),
    )?;
    std::fs::write(out.join("resumo.csv"), summaries_to_csv(&audit.summaries()))?;
    std::fs::write(out.join("faltantes.csv"), missing_ranges_to_csv(&missing))?;
    Ok(())
}
