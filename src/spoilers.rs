use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ImportError, Result};
use crate::report::Reporter;
use crate::types::ParseErrorPolicy;

// year, author token, spoiler text
static SPOILER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})\s+([\w.-]+)\s+(.*)$").unwrap());

/// Short per-entry summaries from `all/summary.txt`, keyed by (year, author).
#[derive(Debug, Default, Clone)]
pub struct SpoilerTable {
    spoilers: HashMap<(String, String), String>,
}

impl SpoilerTable {
    pub fn load(path: &Path, policy: ParseErrorPolicy, reporter: &dyn Reporter) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ImportError::io(path, e))?;
        let table = Self::parse(&text, path, policy, reporter)?;
        reporter.debug(format!(
            "loaded {} spoilers from {}",
            table.len(),
            path.display()
        ));
        Ok(table)
    }

    /// Parses spoiler lines. `source` only names the origin in error messages.
    pub fn parse(
        text: &str,
        source: &Path,
        policy: ParseErrorPolicy,
        reporter: &dyn Reporter,
    ) -> Result<Self> {
        let mut spoilers = HashMap::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some(caps) = SPOILER_LINE.captures(line) else {
                let err = ImportError::MalformedSpoiler {
                    path: PathBuf::from(source),
                    line_no: idx + 1,
                    line: line.to_string(),
                };
                match policy {
                    ParseErrorPolicy::Abort => return Err(err),
                    ParseErrorPolicy::Skip => {
                        reporter.warn(format!("{err}, skipping it."));
                        continue;
                    }
                }
            };

            spoilers.insert(
                (caps[1].to_string(), caps[2].to_string()),
                caps[3].to_string(),
            );
        }

        Ok(Self { spoilers })
    }

    pub fn get(&self, year: &str, author: &str) -> Option<&str> {
        self.spoilers
            .get(&(year.to_string(), author.to_string()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.spoilers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spoilers.is_empty()
    }
}
