//! Filesystem scanner that collects playable songs from a songs folder.

use crate::error::ChartDataError;
use crate::memon::MemonFile;
use std::fs;
use std::path::{Path, PathBuf};

const AUDIO_EXTENSIONS: [&str; 4] = ["ogg", "mp3", "wav", "m4a"];
const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// A memon file found on disk, with its resolved assets.
#[derive(Debug, Clone)]
pub struct SongEntry {
    pub memon_path: PathBuf,
    pub folder: PathBuf,
    pub audio_path: Option<PathBuf>,
    pub jacket_path: Option<PathBuf>,
    /// md5 of the memon file contents.
    pub hash: String,
    pub song: MemonFile,
}

impl SongEntry {
    pub fn title(&self) -> &str {
        &self.song.metadata.title
    }
}

/// Scans `songs_path` recursively for `.memon` files, sorted by title.
///
/// Songs that fail to load are logged and skipped.
pub fn scan_library(songs_path: &Path) -> Vec<SongEntry> {
    if !songs_path.is_dir() {
        log::warn!("LIBRARY: {:?} is not a directory", songs_path);
        return Vec::new();
    }

    let mut files = Vec::new();
    collect_memon_files(songs_path, &mut files);

    let mut songs: Vec<SongEntry> = files
        .into_iter()
        .filter_map(|path| match load_song(&path) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("LIBRARY: Skipping {:?}: {}", path, e);
                None
            }
        })
        .collect();

    songs.sort_by(|a, b| a.title().cmp(b.title()));
    log::info!("LIBRARY: Found {} songs in {:?}", songs.len(), songs_path);
    songs
}

fn collect_memon_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("LIBRARY: Cannot read {:?}: {}", dir, e);
            return;
        }
    };

    let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            collect_memon_files(&path, out);
        } else if has_extension(&path, &["memon"]) {
            out.push(path);
        }
    }
}

/// Parses one memon file and resolves its audio and jacket.
pub fn load_song(memon_path: &Path) -> Result<SongEntry, ChartDataError> {
    let bytes = fs::read(memon_path).map_err(|source| ChartDataError::Io {
        path: memon_path.to_path_buf(),
        source,
    })?;
    let hash = format!("{:x}", md5::compute(&bytes));
    let text = String::from_utf8_lossy(&bytes);
    let song = crate::memon::parse_memon(&text)?;

    let folder = memon_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let audio_path = resolve_asset(&folder, song.metadata.audio.as_deref(), &AUDIO_EXTENSIONS);
    let jacket_path = resolve_asset(&folder, song.metadata.jacket.as_deref(), &IMAGE_EXTENSIONS);
    if audio_path.is_none() {
        log::warn!("LIBRARY: No audio found for {:?}", memon_path);
    }

    Ok(SongEntry {
        memon_path: memon_path.to_path_buf(),
        folder,
        audio_path,
        jacket_path,
        hash,
        song,
    })
}

/// Uses the declared file when it exists, otherwise the first file in the
/// folder with one of `extensions` (only when nothing is declared).
fn resolve_asset(folder: &Path, declared: Option<&str>, extensions: &[&str]) -> Option<PathBuf> {
    if let Some(name) = declared {
        let path = folder.join(name);
        return path.is_file().then_some(path);
    }

    for ext in extensions {
        let mut matches: Vec<PathBuf> = fs::read_dir(folder)
            .ok()?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && has_extension(p, &[*ext]))
            .collect();
        matches.sort();
        if let Some(first) = matches.into_iter().next() {
            return Some(first);
        }
    }
    None
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}
