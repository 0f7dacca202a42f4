//! Text/binary classification.
//!
//! Decision order, first applicable rule wins:
//! 1. extension on the binary deny-list → binary
//! 2. extension on the text allow-list → text
//! 3. MIME type guessed from the name → text for `text/*` and a few structured types
//! 4. sniff the first [`SNIFF_LEN`] bytes: no NUL byte and decodable as UTF-8 or GBK → text
//!
//! Any I/O error while sniffing classifies the file as binary.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Number of leading bytes inspected by the content sniff.
pub const SNIFF_LEN: usize = 1024;

static TEXT_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "txt", "md", "py", "js", "html", "htm", "css", "xml", "json", "yml", "yaml", "ini", "cfg",
        "conf", "config", "properties", "sql", "sh", "bat", "ps1", "php", "java", "cpp", "c", "h",
        "cs", "go", "rs", "rb", "pl", "swift", "kt", "scala", "clj", "lua", "r", "m", "dart", "tsx",
        "jsx", "vue", "log", "env", "dockerfile", "makefile", "gitignore", "gitattributes",
        "editorconfig",
    ]
    .into_iter()
    .collect()
});

static BINARY_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "exe", "dll", "so", "dylib", "bin", "dat", "db", "sqlite", "jpg", "jpeg", "png", "gif",
        "bmp", "ico", "svg", "webp", "mp4", "avi", "mkv", "mov", "wmv", "flv", "webm", "m4v", "mp3",
        "wav", "flac", "aac", "ogg", "wma", "m4a", "zip", "rar", "7z", "tar", "gz", "bz2", "xz",
        "lzma", "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "class", "jar", "war", "ear",
        "pyc", "pyo", "pyd",
    ]
    .into_iter()
    .collect()
});

/// Non-`text/*` MIME types that still hold text.
const STRUCTURED_TEXT_MIME: &[&str] = &[
    "application/json",
    "application/xml",
    "application/javascript",
];

/// Decide whether a file should be scanned as text.
#[must_use]
pub fn is_text(path: &Path) -> bool {
    if let Some(decision) = classify_by_name(path) {
        return decision;
    }

    match sniff_file(path) {
        Ok(decision) => decision,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "failed to sniff file, treating as binary");
            false
        }
    }
}

/// Classify from the file name alone (rules 1-3). `None` means undecided.
#[must_use]
pub fn classify_by_name(path: &Path) -> Option<bool> {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        let ext = ext.to_lowercase();
        if BINARY_EXTENSIONS.contains(ext.as_str()) {
            return Some(false);
        }
        if TEXT_EXTENSIONS.contains(ext.as_str()) {
            return Some(true);
        }
    }

    mime_guess::from_path(path).first().map(|mime| {
        let essence = mime.essence_str();
        essence.starts_with("text/") || STRUCTURED_TEXT_MIME.contains(&essence)
    })
}

fn sniff_file(path: &Path) -> std::io::Result<bool> {
    let mut chunk = Vec::with_capacity(SNIFF_LEN);
    File::open(path)?
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut chunk)?;
    Ok(looks_like_text(&chunk))
}

/// Content sniff on leading bytes (rule 4).
#[must_use]
pub fn looks_like_text(chunk: &[u8]) -> bool {
    if chunk.contains(&0) {
        return false;
    }

    match std::str::from_utf8(chunk) {
        Ok(_) => true,
        // a multi-byte character cut off by the sniff window
        Err(e) if e.error_len().is_none() && chunk.len() == SNIFF_LEN => true,
        Err(_) => encoding_rs::GBK
            .decode_without_bom_handling_and_without_replacement(chunk)
            .is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_binary_extensions_win() {
        assert_eq!(classify_by_name(Path::new("image.png")), Some(false));
        assert_eq!(classify_by_name(Path::new("ARCHIVE.ZIP")), Some(false));
        assert_eq!(classify_by_name(Path::new("lib.so")), Some(false));
    }

    #[test]
    fn test_text_extensions() {
        assert_eq!(classify_by_name(Path::new("notes.txt")), Some(true));
        assert_eq!(classify_by_name(Path::new("c.env")), Some(true));
        assert_eq!(classify_by_name(Path::new("Main.JAVA")), Some(true));
    }

    #[test]
    fn test_mime_fallback() {
        assert_eq!(classify_by_name(Path::new("data.csv")), Some(true));
        assert_eq!(classify_by_name(Path::new("clip.mpeg")), Some(false));
    }

    #[test]
    fn test_no_extension_is_undecided() {
        assert_eq!(classify_by_name(Path::new("Makefile")), None);
        assert_eq!(classify_by_name(Path::new(".env")), None);
    }

    #[test]
    fn test_binary_extension_skips_content() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("b.png");
        fs::write(&path, b"plain text really").expect("write file");
        assert!(!is_text(&path));
    }

    #[test]
    fn test_sniff_null_byte() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("blob");
        fs::write(&path, b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR").expect("write file");
        assert!(!is_text(&path));
    }

    #[test]
    fn test_sniff_utf8_and_gbk() {
        let tmp = TempDir::new().expect("create temp dir");

        let utf8 = tmp.path().join("README");
        fs::write(&utf8, "敏感信息 scanner").expect("write file");
        assert!(is_text(&utf8));

        let (gbk_bytes, _, _) = encoding_rs::GBK.encode("手机号码");
        let gbk = tmp.path().join("LEGACY");
        fs::write(&gbk, &gbk_bytes).expect("write file");
        assert!(is_text(&gbk));
    }

    #[test]
    fn test_sniff_rejects_undecodable() {
        // 0xFF is invalid in both UTF-8 and GBK
        assert!(!looks_like_text(&[0x41, 0xFF, 0xFF, 0x41]));
    }

    #[test]
    fn test_truncated_utf8_at_window_edge() {
        let mut chunk = vec![b'a'; SNIFF_LEN - 1];
        chunk.push(0xE6); // first byte of a 3-byte sequence
        assert!(looks_like_text(&chunk));
    }

    #[test]
    fn test_missing_file_is_not_text() {
        let tmp = TempDir::new().expect("create temp dir");
        assert!(!is_text(&tmp.path().join("does-not-exist")));
    }

    #[test]
    fn test_empty_file_is_text() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("EMPTY");
        fs::write(&path, b"").expect("write file");
        assert!(is_text(&path));
    }
}
