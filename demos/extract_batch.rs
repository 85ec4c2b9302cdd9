//! Extract NF-e line items from XML files and ZIP archives into a CSV table.
//!
//! ```text
//! cargo run --example extract_batch --features all -- 11222333000144 notas.zip avulsa.xml > itens.csv
//! ```
//!
//! Set `RUST_LOG=nfe_audit=debug` to see per-document decisions.

use nfe_audit::core::*;
use nfe_audit::export::records_to_csv;
use nfe_audit::extract::extract_batch;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("nfe_audit=info".parse().unwrap()))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(cnpj) = args.next() else {
        eprintln!("usage: extract_batch <taxpayer-cnpj> <file.xml|file.zip>...");
        std::process::exit(2);
    };

    let config = match AuditConfig::new(&cnpj) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let sources: Vec<InputSource> = args
        .map(|path| InputSource::from_path(&path).expect("readable input file"))
        .collect();

    match extract_batch(&sources, &config) {
        Ok(report) => {
            eprintln!("{}", report.summary());
            for d in &report.discarded {
                eprintln!("  skipped {}: {}", d.name, d.reason);
            }
            print!("{}", records_to_csv(&report.records));
        }
        Err(e) => {
            eprintln!("Batch failed: {e}");
            std::process::exit(1);
        }
    }
}
