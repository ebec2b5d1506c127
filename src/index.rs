use std::collections::HashMap;

use crate::error::Result;
use crate::types::{EntryKey, WinnerEntry};

/// Entries keyed by (year, name). A later entry with a known key replaces the
/// earlier one in place, so iteration keeps first-seen order.
#[derive(Debug, Default, Clone)]
pub struct WinnerIndex {
    slots: HashMap<EntryKey, usize>,
    entries: Vec<WinnerEntry>,
    replaced: usize,
}

impl WinnerIndex {
    /// Drains a resolver stream. The first error aborts the build.
    pub fn build<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<WinnerEntry>>,
    {
        let mut index = Self::default();
        for entry in entries {
            index.insert(entry?);
        }
        Ok(index)
    }

    /// Returns the entry that was replaced, if any.
    pub fn insert(&mut self, entry: WinnerEntry) -> Option<WinnerEntry> {
        let key = entry.key();
        match self.slots.get(&key) {
            Some(&slot) => {
                self.replaced += 1;
                Some(std::mem::replace(&mut self.entries[slot], entry))
            }
            None => {
                self.slots.insert(key, self.entries.len());
                self.entries.push(entry);
                None
            }
        }
    }

    pub fn get(&self, year: &str, name: &str) -> Option<&WinnerEntry> {
        let key = EntryKey {
            year: year.to_string(),
            name: name.to_string(),
        };
        self.slots.get(&key).map(|&slot| &self.entries[slot])
    }

    pub fn entries(&self) -> std::slice::Iter<'_, WinnerEntry> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<WinnerEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn duplicates_replaced(&self) -> usize {
        self.replaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportError;
    use std::path::PathBuf;

    fn entry(year: &str, name: &str, prog: &str) -> WinnerEntry {
        WinnerEntry {
            name: name.to_string(),
            year: year.to_string(),
            prog_location: PathBuf::from(prog),
            hint_location: Some(PathBuf::from("hint.text")),
            spoiler: None,
        }
    }

    #[test]
    fn later_duplicate_replaces_earlier_in_place() {
        let index = WinnerIndex::build(vec![
            Ok(entry("1991", "foo", "a/foo.c")),
            Ok(entry("1991", "bar", "a/bar.c")),
            Ok(entry("1991", "foo", "b/foo.c")),
        ])
        .unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.duplicates_replaced(), 1);
        assert_eq!(
            index.get("1991", "foo").unwrap().prog_location,
            PathBuf::from("b/foo.c")
        );

        let order: Vec<&str> = index.entries().map(|e| e.name.as_str()).collect();
        assert_eq!(order, vec!["foo", "bar"]);
    }

    #[test]
    fn entries_can_be_iterated_twice() {
        let index = WinnerIndex::build(vec![Ok(entry("2011", "dlowe", "prog.c"))]).unwrap();
        assert_eq!(index.entries().count(), 1);
        assert_eq!(index.entries().count(), 1);
        assert!(index.get("2011", "nobody").is_none());
    }

    #[test]
    fn build_stops_at_first_error() {
        let result = WinnerIndex::build(vec![
            Ok(entry("2011", "dlowe", "prog.c")),
            Err(ImportError::UnparseablePath(PathBuf::from("winner/misc"))),
        ]);
        assert!(matches!(result, Err(ImportError::UnparseablePath(_))));
    }
}
