//! In-memory zip container reader.

use super::{ArchiveError, ArchiveResult};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Read};

/// Entries above this size are skipped while loading.
pub const DEFAULT_MAX_ENTRY_BYTES: u64 = 100 * 1024 * 1024;

static TOPIC_FOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[1-5][0-9a-fA-F]{3}-[89abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}$",
    )
    .expect("valid topic folder regex")
});

/// Returns whether `value` has the canonical GUID shape used for topic folders.
pub fn is_topic_folder_name(value: &str) -> bool {
    TOPIC_FOLDER_RE.is_match(value)
}

/// Loaded container with every file entry held in memory.
#[derive(Debug, Clone, Default)]
pub struct ContainerArchive {
    entries: BTreeMap<String, Vec<u8>>,
}

impl ContainerArchive {
    /// Opens a zip container from raw bytes.
    ///
    /// Unreadable or oversized individual entries are skipped with a warning;
    /// only a container that cannot be opened at all is an error.
    pub fn open(bytes: &[u8], max_entry_bytes: u64) -> ArchiveResult<Self> {
        let mut zip = zip::ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = BTreeMap::new();

        for index in 0..zip.len() {
            let mut file = match zip.by_index(index) {
                Ok(file) => file,
                Err(err) => {
                    warn!(
                        "event=archive_entry module=archive status=skipped index={} error={}",
                        index, err
                    );
                    continue;
                }
            };
            if file.is_dir() {
                continue;
            }

            let path = normalize_entry_path(file.name());
            if path.is_empty() {
                continue;
            }
            if file.size() > max_entry_bytes {
                warn!(
                    "event=archive_entry module=archive status=skipped path={} size={} limit={}",
                    path,
                    file.size(),
                    max_entry_bytes
                );
                continue;
            }

            // Declared sizes are untrusted; the read itself is bounded.
            let mut contents = Vec::new();
            if let Err(err) = Read::by_ref(&mut file)
                .take(max_entry_bytes.saturating_add(1))
                .read_to_end(&mut contents)
            {
                warn!(
                    "event=archive_entry module=archive status=skipped path={} error={}",
                    path, err
                );
                continue;
            }
            if contents.len() as u64 > max_entry_bytes {
                warn!(
                    "event=archive_entry module=archive status=skipped path={} reason=read_over_limit limit={}",
                    path, max_entry_bytes
                );
                continue;
            }
            entries.insert(path, contents);
        }

        info!(
            "event=archive_open module=archive status=ok entries={}",
            entries.len()
        );
        Ok(Self { entries })
    }

    /// Builds an archive from already-extracted `(path, bytes)` pairs.
    pub fn from_entries<I, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (P, Vec<u8>)>,
        P: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(path, bytes)| (normalize_entry_path(path.as_ref()), bytes))
                .filter(|(path, _)| !path.is_empty())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lists every file entry path.
    pub fn list_entries(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Resolves a path exactly, then case-insensitively.
    pub fn resolve(&self, path: &str) -> Option<&str> {
        let wanted = normalize_entry_path(path);
        if let Some((key, _)) = self.entries.get_key_value(wanted.as_str()) {
            return Some(key.as_str());
        }
        self.entries
            .keys()
            .find(|key| key.eq_ignore_ascii_case(&wanted))
            .map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.resolve(path).is_some()
    }

    pub fn read_bytes(&self, path: &str) -> ArchiveResult<&[u8]> {
        let key = self
            .resolve(path)
            .ok_or_else(|| ArchiveError::NotFound(path.to_string()))?;
        Ok(self.entries[key].as_slice())
    }

    /// Reads an entry as text, decoding lossily and dropping a UTF-8 BOM.
    pub fn read_text(&self, path: &str) -> ArchiveResult<String> {
        let bytes = self.read_bytes(path)?;
        let text = String::from_utf8_lossy(bytes);
        Ok(text.trim_start_matches('\u{feff}').to_string())
    }

    /// Reads an entry as text when present.
    pub fn read_optional_text(&self, path: &str) -> Option<String> {
        match self.read_text(path) {
            Ok(text) => Some(text),
            Err(ArchiveError::NotFound(_)) => None,
            Err(err) => {
                debug!(
                    "event=archive_read module=archive status=error path={} error={}",
                    path, err
                );
                None
            }
        }
    }

    /// Discovers topic folders from the first path segment of every entry.
    pub fn topic_folders(&self) -> BTreeSet<String> {
        self.entries
            .keys()
            .filter_map(|path| path.split_once('/').map(|(first, _)| first))
            .filter(|segment| is_topic_folder_name(segment))
            .map(str::to_string)
            .collect()
    }

    /// Lists entries directly or transitively inside `folder`.
    pub fn folder_entries(&self, folder: &str) -> Vec<&str> {
        let prefix = format!("{folder}/");
        self.entries
            .keys()
            .filter(|path| path.starts_with(prefix.as_str()))
            .map(String::as_str)
            .collect()
    }
}

fn normalize_entry_path(raw: &str) -> String {
    raw.replace('\\', "/").trim_start_matches('/').to_string()
}

/// File name component of an entry path.
pub(crate) fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
