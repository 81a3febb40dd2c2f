use std::path::{Path, PathBuf};

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use log::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::Track;

pub(super) fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// First configured cover image that exists in the track's directory.
pub(super) fn find_artwork(path: &Path, names: &[String]) -> Option<PathBuf> {
    let dir = path.parent()?;
    names
        .iter()
        .map(|n| dir.join(n))
        .find(|candidate| candidate.is_file())
}

fn non_empty(v: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn read_track(path: &Path, settings: &LibrarySettings) -> Track {
    let mut track = Track::from_path(path);
    track.artwork = find_artwork(path, &settings.artwork_names);

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            track.duration = Some(tagged.properties().duration());

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(title) = non_empty(tag.title()) {
                    track.title = title;
                }
                track.artist = non_empty(tag.artist());
                track.album = non_empty(tag.album());
            }
        }
        Err(e) => debug!("no readable tags in {}: {e}", path.display()),
    }

    track
}

/// Walk `dir` and return every audio file as a `Track`, ordered by path so
/// album folders keep their on-disk track order.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("skipping unreadable entry under {}: {e}", dir.display());
                continue;
            }
        };
        let path = entry.path();
        if path.is_file()
            && (settings.include_hidden || !is_hidden(path))
            && is_audio_file(path, settings)
        {
            tracks.push(read_track(path, settings));
        }
    }

    tracks.sort_by(|a, b| a.path.cmp(&b.path));
    debug!("scanned {} tracks from {}", tracks.len(), dir.display());
    tracks
}
