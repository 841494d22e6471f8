use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;

use flate2::read::MultiGzDecoder;

/// 256KB buffer, variant files are large and read strictly sequentially.
const READER_CAPACITY: usize = 256 * 1024;

///
/// Check whether a path looks gzip or bgzf compressed, based on its extension.
///
pub fn is_gzipped(path: &Path) -> bool {
    matches!(
        path.extension().and_then(OsStr::to_str),
        Some("gz") | Some("bgz")
    )
}

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> std::io::Result<BufReader<Box<dyn Read + Send>>> {
    let file = File::open(path)?;
    let file: Box<dyn Read + Send> = match is_gzipped(path) {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::with_capacity(READER_CAPACITY, file))
}

///
/// Normalize a chromosome name so that `chr22`, `CHR22` and `22` compare equal.
///
pub fn normalize_chrom(chrom: &str) -> &str {
    let trimmed = chrom.trim();
    match trimmed.get(..3) {
        Some(prefix) if trimmed.len() > 3 && prefix.eq_ignore_ascii_case("chr") => &trimmed[3..],
        _ => trimmed,
    }
}
