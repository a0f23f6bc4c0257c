use crate::types::Slot;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Slot keys seen as available in earlier runs, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownSet {
    keys: Vec<String>,
}

impl KnownSet {
    /// Reads the record file. A missing file is an empty set, not an error.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!(
                    "No collected file found at {}, creating a new one ({e})",
                    path.display()
                );
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };

        let keys = content
            .lines()
            .map(str::trim_end)
            .map(String::from)
            .collect();

        Ok(Self { keys })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Appends the keys of `slots` not yet present. Returns how many were added.
    pub fn merge(&mut self, slots: &[Slot]) -> usize {
        let before = self.keys.len();
        for slot in slots {
            if !self.contains(&slot.datetime) {
                self.keys.push(slot.datetime.clone());
            }
        }
        self.keys.len() - before
    }

    /// Overwrites the record file; keys joined by newlines, no trailing newline.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        fs::write(path, self.keys.join("\n"))
    }
}

/// Loads the record file, adds the current slots and writes it back.
/// Returns the set as it was before this run.
pub fn load_and_merge_known(path: &Path, slots: &[Slot]) -> std::io::Result<KnownSet> {
    let mut known = KnownSet::load(path)?;
    log::debug!("Already known entries: {:?}", known.keys());

    let old_known = known.clone();
    let added = known.merge(slots);
    known.save(path)?;

    log::debug!("Recorded {added} new entries in {}", path.display());
    Ok(old_known)
}
