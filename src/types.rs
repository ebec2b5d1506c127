use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::error::{ImportError, Result};

/// How resolved entries reach the database writer.
#[derive(Debug, Clone, Copy, Serialize, ValueEnum, PartialEq, Eq, Default)]
pub enum ResolveMode {
    /// Write entries as the walk yields them; duplicate keys produce duplicate rows.
    Stream,
    /// Collect entries keyed by (year, name) first; later duplicates replace earlier ones.
    #[default]
    Indexed,
}

/// What to do with a malformed spoiler line or a directory without a year.
#[derive(Debug, Clone, Copy, Serialize, ValueEnum, PartialEq, Eq, Default)]
pub enum ParseErrorPolicy {
    #[default]
    Abort,
    Skip,
}

#[derive(Debug, Clone, Copy, Serialize, ValueEnum, PartialEq, Eq, Default)]
pub enum HintEncoding {
    #[default]
    Utf8,
    /// Decode as UTF-8, falling back to ISO-8859-1 for legacy hint files.
    Latin1Fallback,
}

impl HintEncoding {
    pub fn label(&self) -> &'static str {
        match self {
            HintEncoding::Utf8 => "utf-8",
            HintEncoding::Latin1Fallback => "utf-8 or latin-1",
        }
    }
}

/// Natural key of a winning entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EntryKey {
    pub year: String,
    pub name: String,
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.year, self.name)
    }
}

/// One contest-winning submission. Source and hint contents stay on disk
/// until [`WinnerEntry::prog`] / [`WinnerEntry::hint`] are called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinnerEntry {
    pub name: String,
    pub year: String,
    pub prog_location: PathBuf,
    pub hint_location: Option<PathBuf>,
    pub spoiler: Option<String>,
}

impl WinnerEntry {
    pub fn key(&self) -> EntryKey {
        EntryKey {
            year: self.year.clone(),
            name: self.name.clone(),
        }
    }

    pub fn year_number(&self) -> Option<i64> {
        self.year.parse().ok()
    }

    pub fn prog(&self) -> Result<Vec<u8>> {
        fs::read(&self.prog_location).map_err(|e| ImportError::io(&self.prog_location, e))
    }

    /// Reads the hint text. Returns `Ok(None)` when the entry has no hint file and
    /// `ImportError::HintDecode` when the bytes don't fit `encoding`.
    pub fn hint(&self, encoding: HintEncoding) -> Result<Option<String>> {
        let Some(path) = &self.hint_location else {
            return Ok(None);
        };
        let bytes = fs::read(path).map_err(|e| ImportError::io(path, e))?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => match encoding {
                HintEncoding::Utf8 => {
                    return Err(ImportError::HintDecode {
                        path: path.clone(),
                        encoding: encoding.label(),
                    });
                }
                HintEncoding::Latin1Fallback => decode_latin1(err.as_bytes()),
            },
        };
        Ok(Some(normalize_newlines(text)))
    }
}

/// Hints are stored with `\n` line endings whatever the file used.
pub fn normalize_newlines(text: String) -> String {
    if !text.contains('\r') {
        return text;
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// ISO-8859-1 maps every byte to the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct ResolveStats {
    pub directories: usize,
    pub candidates: usize,
    pub emitted: usize,
    pub dropped_no_hint: usize,
    pub skipped_unparseable: usize,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct WriteStats {
    pub rows_written: usize,
    /// Hints stored as an empty string because they could not be decoded.
    pub hints_undecodable: usize,
}

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub output: PathBuf,
    pub mode: ResolveMode,
    pub spoilers_loaded: usize,
    pub resolve: ResolveStats,
    /// Entries replaced by a later entry with the same (year, name) in indexed mode.
    pub duplicates_replaced: usize,
    pub write: WriteStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn entry_with_hint(hint: Option<PathBuf>) -> WinnerEntry {
        WinnerEntry {
            name: "ollinger".to_string(),
            year: "2001".to_string(),
            prog_location: PathBuf::from("/nonexistent/prog.c"),
            hint_location: hint,
            spoiler: None,
        }
    }

    #[test]
    fn missing_hint_location_reads_as_none() {
        let entry = entry_with_hint(None);
        assert_eq!(entry.hint(HintEncoding::Utf8).unwrap(), None);
    }

    #[test]
    fn latin1_hint_fails_strict_decode_but_passes_fallback() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"caf\xe9 au lait").unwrap();
        let entry = entry_with_hint(Some(f.path().to_path_buf()));

        let strict = entry.hint(HintEncoding::Utf8);
        assert!(matches!(strict, Err(ImportError::HintDecode { .. })));

        let relaxed = entry.hint(HintEncoding::Latin1Fallback).unwrap();
        assert_eq!(relaxed.as_deref(), Some("café au lait"));
    }

    #[test]
    fn hint_line_endings_become_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\rc\n".to_string()), "a\nb\nc\n");
        assert_eq!(normalize_newlines("plain\n".to_string()), "plain\n");

        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"caf\xe9\r\nnoir\r").unwrap();
        let entry = entry_with_hint(Some(f.path().to_path_buf()));
        let hint = entry.hint(HintEncoding::Latin1Fallback).unwrap();
        assert_eq!(hint.as_deref(), Some("café\nnoir\n"));
    }

    #[test]
    fn prog_reports_missing_file_as_io_error() {
        let entry = entry_with_hint(None);
        assert!(matches!(entry.prog(), Err(ImportError::Io { .. })));
    }

    #[test]
    fn key_displays_as_year_slash_name() {
        let entry = entry_with_hint(None);
        assert_eq!(entry.key().to_string(), "2001/ollinger");
        assert_eq!(entry.year_number(), Some(2001));
    }
}
