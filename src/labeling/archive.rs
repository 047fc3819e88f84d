use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

pub const ARCHIVE_NAME: &str = "results.zip";

/// Zip the given description files (flat, by file name) and write the
/// archive into `dir`. Returns the archive bytes.
pub fn build_archive(dir: &Path, files: &[PathBuf]) -> std::io::Result<Vec<u8>> {
    let cursor = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(cursor);

    let file_opts = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for path in files {
        let name = super::grouping::file_name_of(path);
        let content = std::fs::read(path)?;
        zip.start_file(name, file_opts)?;
        zip.write_all(&content)?;
    }

    let bytes = zip.finish()?.into_inner();
    std::fs::write(dir.join(ARCHIVE_NAME), &bytes)?;
    Ok(bytes)
}
