use std::path::Path;
use std::time::Duration;

/// Metadata gathered when media is parsed on load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediaInfo {
    /// Total length of the media, if the engine could determine it.
    pub duration: Option<Duration>,
    /// Whether the media carries at least one video stream.
    pub has_video: bool,
}

/// Native window handle that an engine can render video into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeHandle {
    /// Win32 `HWND`.
    Hwnd(isize),
    /// X11 window id (also used for other non-Windows hosts).
    XWindow(u64),
}

impl NativeHandle {
    /// The handle as the pointer-sized integer native toolkits expect.
    pub fn as_raw(self) -> usize {
        match self {
            NativeHandle::Hwnd(hwnd) => hwnd as usize,
            NativeHandle::XWindow(xid) => xid as usize,
        }
    }
}

/// Transport control surface of a media playback engine.
///
/// Positions are normalized to `[0, 1]` and volumes are percentages. None of
/// the transport calls report failure: an engine is expected to log and
/// absorb its own decoding or state errors.
pub trait PlaybackEngine {
    /// Replaces the current media with the file at `path` and parses its
    /// metadata synchronously.
    fn load(&mut self, path: &Path) -> Option<MediaInfo>;

    /// Whether media has been set on the engine. A load the engine could not
    /// apply leaves this false, and play requests are then skipped.
    fn has_media(&self) -> bool;

    fn play(&mut self);

    fn pause(&mut self);

    fn stop(&mut self);

    fn is_playing(&self) -> bool;

    /// Current playback position in `[0, 1]`.
    fn position(&self) -> f64;

    /// Seeks to a normalized position in `[0, 1]`.
    fn set_position(&mut self, position: f64);

    /// Sets the output volume, `0..=100`.
    fn set_volume(&mut self, volume: u8);

    /// Renders video into the given native window.
    fn set_video_output(&mut self, handle: NativeHandle);

    /// Processes pending asynchronous notifications (errors, end of stream).
    /// Called periodically for as long as media is loaded.
    fn drain_events(&mut self) {}
}
