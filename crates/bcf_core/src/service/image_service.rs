//! Snapshot image matching.
//!
//! # Responsibility
//! - Index raster files per topic folder once per parse.
//! - Attach snapshot bytes to viewpoints on demand.
//!
//! # Invariants
//! - Matching is tiered: exact snapshot name, then identifier substring,
//!   then fuzzy basename containment. The first hit wins.
//! - Viewpoints that already carry an image are left untouched.
//! - A viewpoint without a match is not an error.

use crate::archive::{file_name, ContainerArchive};
use crate::model::topic::Topic;
use crate::model::viewpoint::{SnapshotImage, Viewpoint};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];
const DEFAULT_MIME_TYPE: &str = "image/png";

/// Tier that produced a snapshot match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    ExactName,
    IdentifierSubstring,
    FuzzyBasename,
}

/// Shared archive handle plus a per-topic index of raster entries.
///
/// Cloning is cheap; clones share the same archive.
#[derive(Clone, Default)]
pub struct SnapshotSource {
    archive: Arc<ContainerArchive>,
    folders: BTreeMap<String, Vec<String>>,
}

impl Debug for SnapshotSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotSource")
            .field("entries", &self.archive.len())
            .field("folders", &self.folders)
            .finish()
    }
}

impl SnapshotSource {
    pub fn new(archive: Arc<ContainerArchive>) -> Self {
        let mut folders: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for folder in archive.topic_folders() {
            let images: Vec<String> = archive
                .folder_entries(&folder)
                .into_iter()
                .filter(|path| is_raster(path))
                .map(str::to_string)
                .collect();
            if !images.is_empty() {
                folders.insert(folder, images);
            }
        }
        Self { archive, folders }
    }

    /// Raster entry paths indexed for `topic_id`.
    pub fn images_for(&self, topic_id: &str) -> &[String] {
        self.folders
            .get(topic_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Attaches images to every imageless viewpoint of `topics`.
    ///
    /// Returns how many images were attached by this call.
    pub fn extract_images(&self, topics: &mut [Topic]) -> usize {
        let mut attached = 0;
        for topic in topics.iter_mut() {
            let images = self.images_for(&topic.identifier);
            if images.is_empty() {
                continue;
            }
            for viewpoint in topic.viewpoints.iter_mut().filter(|vp| !vp.has_image()) {
                let Some((path, tier)) = match_snapshot(viewpoint, images) else {
                    debug!(
                        "event=image_match module=service status=unmatched topic={} viewpoint={}",
                        topic.identifier, viewpoint.identifier
                    );
                    continue;
                };
                match self.archive.read_bytes(path) {
                    Ok(bytes) => {
                        let name = file_name(path);
                        viewpoint.image =
                            Some(SnapshotImage::new(name, mime_type_for(name), bytes.to_vec()));
                        attached += 1;
                        debug!(
                            "event=image_match module=service status=ok topic={} viewpoint={} file={} tier={:?}",
                            topic.identifier, viewpoint.identifier, name, tier
                        );
                    }
                    Err(err) => warn!(
                        "event=image_match module=service status=error topic={} path={} error={}",
                        topic.identifier, path, err
                    ),
                }
            }
        }
        info!(
            "event=image_extract module=service status=ok attached={}",
            attached
        );
        attached
    }
}

/// Picks the snapshot for one viewpoint from the topic's raster entries.
pub fn match_snapshot<'a>(
    viewpoint: &Viewpoint,
    images: &'a [String],
) -> Option<(&'a str, MatchTier)> {
    if let Some(reference) = viewpoint.snapshot_reference.as_deref() {
        let wanted = file_name(reference);
        if let Some(path) = images
            .iter()
            .find(|path| file_name(path).eq_ignore_ascii_case(wanted))
        {
            return Some((path.as_str(), MatchTier::ExactName));
        }
    }

    let identifier = viewpoint.identifier.to_ascii_lowercase();
    if !identifier.is_empty() {
        let compact = identifier.replace('-', "");
        if let Some(path) = images.iter().find(|path| {
            let name = file_name(path).to_ascii_lowercase();
            name.contains(&identifier) || name.replace('-', "").contains(&compact)
        }) {
            return Some((path.as_str(), MatchTier::IdentifierSubstring));
        }
    }

    let stems: Vec<String> = [
        viewpoint.snapshot_reference.as_deref(),
        viewpoint.source_file_name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(basename)
    .filter(|stem| !stem.is_empty())
    .collect();
    images
        .iter()
        .find(|path| {
            let image = basename(path);
            !image.is_empty()
                && stems
                    .iter()
                    .any(|stem| image.contains(stem.as_str()) || stem.contains(image.as_str()))
        })
        .map(|path| (path.as_str(), MatchTier::FuzzyBasename))
}

/// Lowercased file name without its extension.
fn basename(path: &str) -> String {
    let name = file_name(path);
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    stem.to_ascii_lowercase()
}

fn extension(path: &str) -> Option<String> {
    file_name(path)
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

fn is_raster(path: &str) -> bool {
    extension(path).is_some_and(|ext| RASTER_EXTENSIONS.contains(&ext.as_str()))
}

/// MIME type from the file extension, `image/png` when unknown.
pub fn mime_type_for(path: &str) -> &'static str {
    match extension(path).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        _ => DEFAULT_MIME_TYPE,
    }
}
