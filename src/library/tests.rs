use std::fs;
use std::path::Path;
use std::time::Duration;

use tempfile::tempdir;

use super::Track;
use super::scan::{find_artwork, is_audio_file, scan};
use crate::config::LibrarySettings;

#[test]
fn display_name_prefers_artist_dash_title() {
    let mut t = Track::from_path("/tmp/Song.mp3");
    assert_eq!(t.display_name(), "Song");
    t.artist = Some("  Artist  ".into());
    assert_eq!(t.display_name(), "Artist - Song");
    t.artist = Some("   ".into());
    assert_eq!(t.display_name(), "Song");
}

#[test]
fn duration_ms_is_zero_when_unknown() {
    let mut t = Track::from_path("/tmp/a.mp3");
    assert_eq!(t.duration_ms(), 0);
    t.duration = Some(Duration::from_millis(183_250));
    assert_eq!(t.duration_ms(), 183_250);
}

#[test]
fn is_audio_file_matches_configured_extensions_case_insensitive() {
    let settings = LibrarySettings::default();
    assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
    assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
    assert!(is_audio_file(Path::new("/tmp/a.flac"), &settings));
    assert!(is_audio_file(Path::new("/tmp/a.ogg"), &settings));
    assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
    assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
}

#[test]
fn scan_filters_non_audio_and_orders_by_path() {
    let dir = tempdir().unwrap();

    fs::write(dir.path().join("02 b.mp3"), b"not a real mp3").unwrap();
    fs::write(dir.path().join("01 a.ogg"), b"not a real ogg").unwrap();
    fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

    let tracks = scan(dir.path(), &LibrarySettings::default());
    assert_eq!(tracks.len(), 2);
    // Untagged files fall back to the file stem.
    assert_eq!(tracks[0].title, "01 a");
    assert_eq!(tracks[1].title, "02 b");
    assert!(tracks[0].artist.is_none());
}

#[test]
fn scan_respects_include_hidden_false() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
    fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

    let settings = LibrarySettings {
        include_hidden: false,
        ..LibrarySettings::default()
    };
    let tracks = scan(dir.path(), &settings);

    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "visible");
}

#[test]
fn scan_respects_recursive_false() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("child.mp3"), b"not real").unwrap();

    let settings = LibrarySettings {
        recursive: false,
        ..LibrarySettings::default()
    };
    let tracks = scan(dir.path(), &settings);
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "root");
}

#[test]
fn scan_attaches_folder_artwork() {
    let dir = tempdir().unwrap();
    let album = dir.path().join("album");
    fs::create_dir_all(&album).unwrap();
    fs::write(album.join("track.flac"), b"not real").unwrap();
    fs::write(album.join("cover.jpg"), b"jpeg").unwrap();
    fs::write(dir.path().join("loose.mp3"), b"not real").unwrap();

    let tracks = scan(dir.path(), &LibrarySettings::default());
    let track = tracks.iter().find(|t| t.title == "track").unwrap();
    assert_eq!(track.artwork.as_deref(), Some(album.join("cover.jpg").as_path()));
    let loose = tracks.iter().find(|t| t.title == "loose").unwrap();
    assert!(loose.artwork.is_none());
}

#[test]
fn find_artwork_follows_configured_name_order() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("folder.png"), b"png").unwrap();
    fs::write(dir.path().join("cover.jpg"), b"jpg").unwrap();

    let names = vec!["folder.png".to_string(), "cover.jpg".to_string()];
    let art = find_artwork(&dir.path().join("x.mp3"), &names).unwrap();
    assert_eq!(art, dir.path().join("folder.png"));
}
