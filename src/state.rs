use crate::engine::MediaInfo;
use std::path::{Path, PathBuf};

const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "avi", "webm", "mkv", "flv"];

/// Whether loaded media needs the video surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    /// Classifies a file by extension, case-insensitively. Anything that is
    /// not a known video container is treated as audio.
    pub fn from_path(path: &Path) -> Self {
        let is_video = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                VIDEO_EXTENSIONS
                    .iter()
                    .any(|video| ext.eq_ignore_ascii_case(video))
            })
            .unwrap_or(false);

        if is_video {
            MediaKind::Video
        } else {
            MediaKind::Audio
        }
    }

    pub fn is_video(self) -> bool {
        self == MediaKind::Video
    }
}

/// The currently loaded media. Replaced wholesale on every successful open.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    pub path: PathBuf,
    pub kind: MediaKind,
    pub info: Option<MediaInfo>,
}

impl PlaybackSession {
    pub fn new(path: PathBuf, info: Option<MediaInfo>) -> Self {
        let kind = MediaKind::from_path(&path);
        PlaybackSession { path, kind, info }
    }

    /// Base name of the loaded file, for display.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Transport state as last commanded by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlaybackState {
    #[default]
    NoMedia,
    Loaded,
    Playing,
    Paused,
    Stopped,
}

impl PlaybackState {
    pub fn has_media(self) -> bool {
        self != PlaybackState::NoMedia
    }
}
