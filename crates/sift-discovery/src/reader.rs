//! Multi-encoding file reader.
//!
//! Files are read whole. A byte-order mark, when present, picks the encoding
//! outright. Otherwise the fallback chain in [`FALLBACK_ENCODINGS`] is tried
//! in order and the first strict (non-replacing) decode wins. When none of
//! them fits, the bytes are taken as ISO-8859-1, which maps every byte.

use encoding_rs::{Encoding, GBK, UTF_16LE, UTF_8};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::trace;

/// Decode attempts without a BOM, in order.
///
/// `GBK` here is the WHATWG decoder, which also covers GB2312 and GB18030.
pub const FALLBACK_ENCODINGS: &[&Encoding] = &[UTF_8, GBK, UTF_16LE];

/// Name reported for the final byte-to-code-point fallback.
pub const LATIN1: &str = "ISO-8859-1";

/// Errors reading a file's text.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The file could not be opened or read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Read a file and decode it to text.
///
/// # Errors
/// Returns [`ReadError::Io`] on I/O failure.
pub fn read_text(path: &Path) -> Result<String, ReadError> {
    let bytes = std::fs::read(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (text, encoding) = decode(&bytes);
    trace!(path = %path.display(), encoding, "decoded file");
    Ok(text)
}

/// Decode bytes, returning the text and the name of the encoding used.
#[must_use]
pub fn decode(bytes: &[u8]) -> (String, &'static str) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        if let Some(text) =
            encoding.decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        {
            return (text.into_owned(), encoding.name());
        }
    }

    FALLBACK_ENCODINGS
        .iter()
        .find_map(|&encoding| {
            encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| (text.into_owned(), encoding.name()))
        })
        .unwrap_or_else(|| (bytes.iter().map(|&b| char::from(b)).collect(), LATIN1))
}
