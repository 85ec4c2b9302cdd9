//! Named input buffers and ZIP entry iteration.

use std::io::{Cursor, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::AuditError;

/// A named byte buffer handed to a batch: a loose XML document or a ZIP archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSource {
    /// File name (or archive entry path) the bytes came from.
    pub name: String,
    /// Raw content.
    pub bytes: Vec<u8>,
}

/// How a source is treated by the batch orchestrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A single XML document (`.xml`).
    Document,
    /// A ZIP container (`.zip`).
    Archive,
    /// Anything else; skipped.
    Unsupported,
}

impl InputSource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk; the file name becomes the source name.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    /// Classify the source by its (case-insensitive) extension.
    pub fn kind(&self) -> SourceKind {
        if has_extension(&self.name, "xml") {
            SourceKind::Document
        } else if has_extension(&self.name, "zip") {
            SourceKind::Archive
        } else {
            SourceKind::Unsupported
        }
    }
}

/// Case-insensitive `name.ends_with(".{ext}")`.
pub fn has_extension(name: &str, ext: &str) -> bool {
    name.to_ascii_lowercase()
        .ends_with(&format!(".{}", ext.to_ascii_lowercase()))
}

/// Last path segment of an archive entry name (`"a/b/c.xml"` → `"c.xml"`).
pub fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Most bytes pre-allocated from an entry's declared size; `read_to_end`
/// grows the buffer past this as real data arrives.
const PREALLOC_LIMIT: u64 = 1 << 20;

/// One file read out of a ZIP archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path inside the archive.
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Read every non-directory entry of a ZIP archive whose name passes `wanted`,
/// in archive order.
///
/// Failure to open the archive or read an entry is a batch-level error and is
/// returned to the caller.
pub fn read_archive(
    archive_name: &str,
    bytes: &[u8],
    mut wanted: impl FnMut(&str) -> bool,
) -> Result<Vec<ArchiveEntry>, AuditError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AuditError::Archive(format!("cannot open {archive_name}: {e}")))?;

    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| AuditError::Archive(format!("{archive_name} entry #{i}: {e}")))?;
        if file.is_dir() || !wanted(file.name()) {
            continue;
        }
        let name = file.name().to_string();
        // the declared size comes from the archive and is not trusted
        let mut buf = Vec::with_capacity(file.size().min(PREALLOC_LIMIT) as usize);
        file.read_to_end(&mut buf)
            .map_err(|e| AuditError::Archive(format!("{archive_name}/{name}: {e}")))?;
        entries.push(ArchiveEntry { name, bytes: buf });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn zip_of(files: &[(&str, &str)]) -> Vec<u8> {
        let mut w = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in files {
            w.start_file(*name, SimpleFileOptions::default()).unwrap();
            w.write_all(body.as_bytes()).unwrap();
        }
        w.finish().unwrap().into_inner()
    }

    #[test]
    fn extension_checks_are_case_insensitive() {
        assert!(has_extension("nota.XML", "xml"));
        assert!(has_extension("lote.Zip", "zip"));
        assert!(!has_extension("xml", "xml"));
        assert!(!has_extension("notaxml", "xml"));
        assert!(!has_extension("nota.xml.bak", "xml"));
    }

    #[test]
    fn source_kind() {
        assert_eq!(InputSource::new("a.xml", b"".to_vec()).kind(), SourceKind::Document);
        assert_eq!(InputSource::new("a.ZIP", b"".to_vec()).kind(), SourceKind::Archive);
        assert_eq!(InputSource::new("a.pdf", b"".to_vec()).kind(), SourceKind::Unsupported);
    }

    #[test]
    fn base_name_of_entries() {
        assert_eq!(base_name("2024/01/nota.xml"), "nota.xml");
        assert_eq!(base_name("dir\\nota.xml"), "nota.xml");
        assert_eq!(base_name("nota.xml"), "nota.xml");
    }

    #[test]
    fn reads_filtered_entries_in_order() {
        let bytes = zip_of(&[("b.xml", "<b/>"), ("readme.txt", "hi"), ("dir/a.XML", "<a/>")]);
        let entries = read_archive("lote.zip", &bytes, |n| has_extension(n, "xml")).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["b.xml", "dir/a.XML"]);
        assert_eq!(entries[1].bytes, b"<a/>");
    }

    /// Rewrite the central-directory uncompressed size of the first entry to
    /// `u64::MAX / 2` (through its zip64 field when present).
    fn forge_declared_size(mut bytes: Vec<u8>) -> Vec<u8> {
        let cd = bytes.windows(4).position(|w| w == b"PK\x01\x02").unwrap();
        let u16_at = |b: &[u8], i: usize| u16::from_le_bytes([b[i], b[i + 1]]) as usize;
        let name_len = u16_at(&bytes, cd + 28);
        let extra_len = u16_at(&bytes, cd + 30);

        let mut pos = cd + 46 + name_len;
        let end = pos + extra_len;
        while pos + 4 <= end {
            let (id, len) = (u16_at(&bytes, pos), u16_at(&bytes, pos + 2));
            if id == 0x0001 && len >= 8 {
                bytes[cd + 24..cd + 28].copy_from_slice(&u32::MAX.to_le_bytes());
                bytes[pos + 4..pos + 12].copy_from_slice(&(u64::MAX / 2).to_le_bytes());
                return bytes;
            }
            pos += 4 + len;
        }
        bytes[cd + 24..cd + 28].copy_from_slice(&(u32::MAX - 1).to_le_bytes());
        bytes
    }

    #[test]
    fn forged_entry_size_does_not_preallocate() {
        let mut w = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let opts = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored)
            .large_file(true);
        w.start_file("nota.xml", opts).unwrap();
        w.write_all(b"<nfe/>").unwrap();
        let bytes = forge_declared_size(w.finish().unwrap().into_inner());

        match read_archive("forged.zip", &bytes, |_| true) {
            Ok(entries) => assert_eq!(entries[0].bytes, b"<nfe/>"),
            Err(e) => assert!(matches!(e, AuditError::Archive(_))),
        }
    }

    #[test]
    fn corrupt_archive_is_an_error() {
        let err = read_archive("bad.zip", b"not a zip", |_| true).unwrap_err();
        assert!(matches!(err, AuditError::Archive(_)));
    }
}
