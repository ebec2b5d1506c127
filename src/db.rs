use rusqlite::{Connection, params, types::Value};
use std::path::Path;

use crate::error::{ImportError, Result};
use crate::progress::ImportProgress;
use crate::report::Reporter;
use crate::types::{HintEncoding, WinnerEntry, WriteStats};

/// Handle on the output database. Every insert is committed on its own.
pub struct WinnersDb {
    conn: Connection,
}

impl WinnersDb {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = WinnersDb { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS winners (
                name TEXT,
                year INTEGER,
                spoiler TEXT,
                prog BLOB,
                hint TEXT
            );",
        )?;
        Ok(())
    }

    /// Inserts one row, reading the source and hint from disk now. Returns
    /// `false` when the hint could not be decoded and was stored empty.
    pub fn insert(
        &self,
        entry: &WinnerEntry,
        encoding: HintEncoding,
        reporter: &dyn Reporter,
    ) -> Result<bool> {
        reporter.debug(format!("writing to DB {}", entry.key()));

        let (hint, decoded) = match entry.hint(encoding) {
            Ok(hint) => (hint.unwrap_or_default(), true),
            Err(ImportError::HintDecode { .. }) => {
                reporter.warn(format!(
                    "can't get the hint for {}, the encoding isn't {}!",
                    entry.key(),
                    encoding.label()
                ));
                (String::new(), false)
            }
            Err(err) => return Err(err),
        };
        let prog = entry.prog()?;

        // INTEGER affinity; keep the raw text if a caller built an odd year
        let year = match entry.year_number() {
            Some(year) => Value::Integer(year),
            None => Value::Text(entry.year.clone()),
        };

        self.conn.execute(
            "INSERT INTO winners (name, year, spoiler, prog, hint) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![entry.name, year, entry.spoiler.as_deref(), prog, hint],
        )?;
        Ok(decoded)
    }
}

/// Creates (or appends to) `output` with one row per entry, in order. The
/// first error from `entries` or from SQLite stops the build; rows already
/// inserted stay.
pub fn build_db<I>(
    entries: I,
    output: &Path,
    encoding: HintEncoding,
    reporter: &dyn Reporter,
    progress: &ImportProgress,
) -> Result<WriteStats>
where
    I: IntoIterator<Item = Result<WinnerEntry>>,
{
    let db = WinnersDb::open(output)?;
    let mut stats = WriteStats::default();

    for entry in entries {
        let entry = entry?;
        if !db.insert(&entry, encoding, reporter)? {
            stats.hints_undecodable += 1;
        }
        stats.rows_written += 1;
        progress.row_written(&entry.key().to_string());
    }

    progress.finish();
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::MemoryReporter;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn open_twice_keeps_existing_rows() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("winners.sqlite");

        let db = WinnersDb::open(&db_path).unwrap();
        db.conn
            .execute(
                "INSERT INTO winners (name, year) VALUES ('dlowe', 2011)",
                [],
            )
            .unwrap();
        drop(db);

        let db = WinnersDb::open(&db_path).unwrap();
        let count: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM winners", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn undecodable_hint_is_stored_empty_with_warning() {
        let dir = tempdir().unwrap();
        let prog = dir.path().join("prog.c");
        let hint = dir.path().join("ollinger.text");
        fs::write(&prog, b"main(){}").unwrap();
        fs::write(&hint, b"\xff\xfe broken").unwrap();

        let entry = WinnerEntry {
            name: "ollinger".to_string(),
            year: "2001".to_string(),
            prog_location: prog,
            hint_location: Some(hint),
            spoiler: None,
        };
        let reporter = MemoryReporter::new();
        let db = WinnersDb::open(&dir.path().join("out.sqlite")).unwrap();

        assert!(!db.insert(&entry, HintEncoding::Utf8, &reporter).unwrap());
        let (stored, spoiler): (String, Option<String>) = db
            .conn
            .query_row("SELECT hint, spoiler FROM winners", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(stored, "");
        assert_eq!(spoiler, None);

        let warnings = reporter.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("2001/ollinger"));
    }

    #[test]
    fn missing_source_file_fails_the_insert() {
        let dir = tempdir().unwrap();
        let entry = WinnerEntry {
            name: "ghost".to_string(),
            year: "1990".to_string(),
            prog_location: dir.path().join("missing.c"),
            hint_location: None,
            spoiler: None,
        };
        let db = WinnersDb::open(&dir.path().join("out.sqlite")).unwrap();
        let result = db.insert(&entry, HintEncoding::Utf8, &MemoryReporter::new());
        assert!(matches!(result, Err(ImportError::Io { .. })));
    }
}
