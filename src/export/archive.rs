//! Re-packing classified documents into new ZIP archives.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::classify::ClassificationReport;
use crate::core::AuditError;

/// ZIP with every kept document stored under its classification folder.
pub fn bucketed_archive(report: &ClassificationReport) -> Result<Vec<u8>, AuditError> {
    write_archive(
        report
            .documents
            .iter()
            .map(|d| (d.classification.path(), d.bytes.as_slice())),
    )
}

/// ZIP with every kept document at the archive root.
pub fn flat_archive(report: &ClassificationReport) -> Result<Vec<u8>, AuditError> {
    write_archive(
        report
            .documents
            .iter()
            .map(|d| (d.classification.filename.clone(), d.bytes.as_slice())),
    )
}

fn write_archive<'a>(
    files: impl Iterator<Item = (String, &'a [u8])>,
) -> Result<Vec<u8>, AuditError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opts = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let mut used = HashSet::new();

    for (path, bytes) in files {
        let path = unique_path(&mut used, &path);
        zip.start_file(path.as_str(), opts)
            .map_err(|e| AuditError::Export(format!("{path}: {e}")))?;
        zip.write_all(bytes)
            .map_err(|e| AuditError::Export(format!("{path}: {e}")))?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| AuditError::Export(format!("finishing archive: {e}")))?;
    Ok(cursor.into_inner())
}

/// `path`, or `stem_2.ext`, `stem_3.ext`, ... when already taken.
fn unique_path(used: &mut HashSet<String>, path: &str) -> String {
    if used.insert(path.to_string()) {
        return path.to_string();
    }
    let (stem, ext) = match path.rfind('.') {
        Some(dot) if !path[dot..].contains('/') => (&path[..dot], &path[dot..]),
        _ => (path, ""),
    };
    let mut n = 2;
    loop {
        let candidate = format!("{stem}_{n}{ext}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
