use std::{io::Cursor, path::Path};

use anyhow::{Context, Result};
use zip::ZipArchive;

/// Expand a ZIP archive into `dest`, creating the directory if needed.
/// Entries whose paths would escape `dest` fail the whole extraction.
///
/// Returns the number of entries in the archive.
pub fn extract(bytes: &[u8], dest: &Path) -> Result<usize> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).context("Payload is not a zip archive")?;
    std::fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create directory {}", dest.display()))?;
    let entries = archive.len();
    archive.extract(dest).context("Failed to extract archive")?;
    Ok(entries)
}

#[cfg(test)]
pub(crate) fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    use std::io::Write;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for &(name, data) in files {
        writer.start_file(name, zip::write::SimpleFileOptions::default()).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
