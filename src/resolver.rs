use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::VecDeque;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::{ImportError, Result};
use crate::report::Reporter;
use crate::spoilers::SpoilerTable;
use crate::types::{ParseErrorPolicy, ResolveStats, WinnerEntry};

const SINGLE_PROGRAM: &str = "prog.c";

// `<year>` alone, or `<year>` followed by one separator and the author
// (`winner/2011/dlowe`, `winner/1991`). The greedy prefix picks the last match.
static ENTRY_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r".*/(\d{4}).(\w+)|.*/(\d{4})").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDetails {
    pub year: String,
    pub author: Option<String>,
}

/// Recovers year and (when the directory names it) author from an entry directory.
pub fn entry_details_from_path(path: &Path) -> Option<EntryDetails> {
    let mut text = path.to_string_lossy().into_owned();
    if MAIN_SEPARATOR != '/' {
        text = text.replace(MAIN_SEPARATOR, "/");
    }

    let caps = ENTRY_PATH.captures(&text)?;
    if let Some(year) = caps.get(3) {
        return Some(EntryDetails {
            year: year.as_str().to_string(),
            author: None,
        });
    }

    Some(EntryDetails {
        year: caps.get(1)?.as_str().to_string(),
        author: caps.get(2).map(|m| m.as_str().to_string()),
    })
}

/// Picks the source files of one directory: `prog.c` alone when present,
/// otherwise every `*.c` file.
pub fn candidate_sources(file_names: &[String]) -> Vec<String> {
    if file_names.iter().any(|name| name == SINGLE_PROGRAM) {
        return vec![SINGLE_PROGRAM.to_string()];
    }

    file_names
        .iter()
        .filter(|name| name.ends_with(".c"))
        .cloned()
        .collect()
}

pub fn locate_hint(dir: &Path, author: &str) -> Option<PathBuf> {
    [
        format!("{author}.text"),
        "hint.text".to_string(),
        format!("{author}.hint"),
    ]
    .into_iter()
    .map(|name| dir.join(name))
    .find(|candidate| candidate.exists())
}

/// Lazy walk over a winners tree yielding one [`WinnerEntry`] per resolvable
/// candidate source. Single pass: once exhausted (or after yielding an error)
/// it stays exhausted.
pub struct WinnerEntries<'a> {
    walker: walkdir::IntoIter,
    spoilers: &'a SpoilerTable,
    policy: ParseErrorPolicy,
    reporter: &'a dyn Reporter,
    // directory whose files are still being collected from the walk
    open_dir: Option<(PathBuf, Vec<String>)>,
    pending: VecDeque<(PathBuf, String)>,
    stats: ResolveStats,
    walk_done: bool,
    finished: bool,
}

impl<'a> WinnerEntries<'a> {
    pub fn new(
        root: impl AsRef<Path>,
        spoilers: &'a SpoilerTable,
        policy: ParseErrorPolicy,
        reporter: &'a dyn Reporter,
    ) -> Self {
        // Files sort ahead of subdirectories, so a directory's file list is
        // complete as soon as the walk reaches its first subdirectory.
        let walker = WalkDir::new(root.as_ref())
            .sort_by(|a, b| {
                a.file_type()
                    .is_dir()
                    .cmp(&b.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            })
            .into_iter();

        Self {
            walker,
            spoilers,
            policy,
            reporter,
            open_dir: None,
            pending: VecDeque::new(),
            stats: ResolveStats::default(),
            walk_done: false,
            finished: false,
        }
    }

    pub fn stats(&self) -> &ResolveStats {
        &self.stats
    }

    fn close_directory(&mut self) {
        if let Some((dir, file_names)) = self.open_dir.take() {
            for name in candidate_sources(&file_names) {
                self.pending.push_back((dir.clone(), name));
            }
        }
    }

    fn visit(&mut self, dent: DirEntry) {
        if dent.file_type().is_dir() {
            self.close_directory();
            self.stats.directories += 1;
            self.open_dir = Some((dent.into_path(), Vec::new()));
            return;
        }

        // a symlink to a directory is not a file of this directory
        if dent.path_is_symlink() && dent.path().is_dir() {
            return;
        }

        let Some((_, file_names)) = self.open_dir.as_mut() else {
            return;
        };
        match dent.file_name().to_str() {
            Some(name) => file_names.push(name.to_string()),
            None => self.reporter.warn(format!(
                "file name of {} is not valid utf-8, ignoring it.",
                dent.path().to_string_lossy()
            )),
        }
    }

    fn build_entry(&mut self, dir: &Path, c_filename: &str) -> Result<Option<WinnerEntry>> {
        self.stats.candidates += 1;
        let prog_location = dir.join(c_filename);

        let Some(details) = entry_details_from_path(dir) else {
            let err = ImportError::UnparseablePath(dir.to_path_buf());
            return match self.policy {
                ParseErrorPolicy::Abort => Err(err),
                ParseErrorPolicy::Skip => {
                    self.stats.skipped_unparseable += 1;
                    self.reporter.warn(format!(
                        "{err}, ignoring {}.",
                        prog_location.display()
                    ));
                    Ok(None)
                }
            };
        };

        let author = details.author.unwrap_or_else(|| {
            c_filename
                .strip_suffix(".c")
                .unwrap_or(c_filename)
                .to_string()
        });
        let spoiler = self
            .spoilers
            .get(&details.year, &author)
            .map(str::to_string);

        let Some(hint_location) = locate_hint(dir, &author) else {
            self.stats.dropped_no_hint += 1;
            self.reporter.warn(format!(
                "can't find hint for {}, ignoring it.",
                prog_location.display()
            ));
            return Ok(None);
        };

        self.reporter.debug(format!(
            "resolved {}/{author} from {}",
            details.year,
            prog_location.display()
        ));

        Ok(Some(WinnerEntry {
            name: author,
            year: details.year,
            prog_location,
            hint_location: Some(hint_location),
            spoiler,
        }))
    }
}

impl Iterator for WinnerEntries<'_> {
    type Item = Result<WinnerEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            if let Some((dir, name)) = self.pending.pop_front() {
                match self.build_entry(&dir, &name) {
                    Ok(Some(entry)) => {
                        self.stats.emitted += 1;
                        return Some(Ok(entry));
                    }
                    Ok(None) => continue,
                    Err(err) => {
                        self.finished = true;
                        self.pending.clear();
                        self.open_dir = None;
                        return Some(Err(err));
                    }
                }
            }

            if self.walk_done {
                self.finished = true;
                return None;
            }

            match self.walker.next() {
                Some(Ok(dent)) => self.visit(dent),
                Some(Err(err)) => {
                    let path = err
                        .path()
                        .map(|p| p.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    self.reporter
                        .warn(format!("walk error at {path}: {err}, skipping it."));
                }
                None => {
                    self.close_directory();
                    self.walk_done = true;
                }
            }
        }
    }
}
