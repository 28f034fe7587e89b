use crate::engine::{MediaInfo, NativeHandle, PlaybackEngine};
use crate::Error;
use gstreamer as gst;
use gstreamer::prelude::*;
use gstreamer_pbutils as gst_pbutils;
use gstreamer_video as gst_video;
use gstreamer_video::prelude::*;
use log::{debug, error, warn};
use std::path::Path;
use std::time::Duration;

/// How long the synchronous metadata parse may block on load.
const DISCOVER_TIMEOUT_SECS: u64 = 5;

/// [`PlaybackEngine`] backed by a single GStreamer `playbin`.
///
/// The pipeline is created once in [`GstEngine::new`] and torn down when the
/// engine is dropped.
pub struct GstEngine {
    bus: gst::Bus,
    source: gst::Pipeline,
    uri: Option<url::Url>,
    is_eos: bool,
}

impl Drop for GstEngine {
    fn drop(&mut self) {
        if let Err(err) = self.source.set_state(gst::State::Null) {
            error!("failed to shut down playback pipeline: {err}");
        }
    }
}

impl GstEngine {
    pub fn new() -> Result<Self, Error> {
        gst::init()?;

        let source = gst::ElementFactory::make("playbin")
            .name("nexus_player")
            .build()?
            .downcast::<gst::Pipeline>()
            .map_err(|_| Error::Cast)?;
        let bus = source.bus().ok_or(Error::Bus)?;

        Ok(GstEngine {
            bus,
            source,
            uri: None,
            is_eos: false,
        })
    }

    /// Confines overlay rendering to a region of the bound window, in
    /// physical pixels.
    pub fn set_render_rectangle(&self, x: i32, y: i32, width: i32, height: i32) {
        let Some(overlay) = self.source.dynamic_cast_ref::<gst_video::VideoOverlay>() else {
            return;
        };
        if let Err(err) = overlay.set_render_rectangle(x, y, width.max(1), height.max(1)) {
            debug!("render rectangle rejected: {err}");
        }
        overlay.expose();
    }

    fn set_uri(&mut self, path: &Path) -> Result<url::Url, Error> {
        let uri = url::Url::from_file_path(path).map_err(|_| Error::Uri)?;
        self.source.set_state(gst::State::Null)?;
        self.source.set_property("uri", uri.as_str());
        self.source.set_state(gst::State::Ready)?;
        self.is_eos = false;
        Ok(uri)
    }

    fn discover(uri: &url::Url) -> Result<MediaInfo, Error> {
        let discoverer =
            gst_pbutils::Discoverer::new(gst::ClockTime::from_seconds(DISCOVER_TIMEOUT_SECS))?;
        let info = discoverer.discover_uri(uri.as_str())?;
        Ok(MediaInfo {
            duration: info
                .duration()
                .map(|duration| Duration::from_nanos(duration.nseconds())),
            has_video: !info.video_streams().is_empty(),
        })
    }

    fn set_state(&mut self, state: gst::State) {
        if let Err(err) = self.source.set_state(state) {
            error!("failed to change pipeline state to {state:?}: {err}");
        }
    }

    fn normalized_position(&self) -> Result<f64, Error> {
        let position = self
            .source
            .query_position::<gst::ClockTime>()
            .ok_or(Error::Duration)?;
        let duration = self
            .source
            .query_duration::<gst::ClockTime>()
            .filter(|duration| duration.nseconds() > 0)
            .ok_or(Error::Duration)?;
        Ok((position.nseconds() as f64 / duration.nseconds() as f64).clamp(0.0, 1.0))
    }

    fn seek(&self, position: f64) -> Result<(), Error> {
        let duration = self
            .source
            .query_duration::<gst::ClockTime>()
            .ok_or(Error::Duration)?;
        let target =
            gst::ClockTime::from_nseconds((duration.nseconds() as f64 * position) as u64);
        self.source
            .seek_simple(gst::SeekFlags::FLUSH | gst::SeekFlags::KEY_UNIT, target)?;
        Ok(())
    }
}

impl PlaybackEngine for GstEngine {
    fn load(&mut self, path: &Path) -> Option<MediaInfo> {
        self.uri = None;
        let uri = match self.set_uri(path) {
            Ok(uri) => uri,
            Err(err) => {
                error!("failed to set media {}: {err}", path.display());
                return None;
            }
        };
        self.uri = Some(uri.clone());

        match Self::discover(&uri) {
            Ok(info) => Some(info),
            Err(err) => {
                warn!("could not parse metadata of {uri}: {err}");
                None
            }
        }
    }

    fn has_media(&self) -> bool {
        self.uri.is_some()
    }

    fn play(&mut self) {
        if self.is_eos {
            // the stream ended on its own; start over like a fresh play
            self.is_eos = false;
            self.set_state(gst::State::Ready);
        }
        self.set_state(gst::State::Playing);
    }

    fn pause(&mut self) {
        self.set_state(gst::State::Paused);
    }

    fn stop(&mut self) {
        self.set_state(gst::State::Ready);
    }

    fn is_playing(&self) -> bool {
        !self.is_eos && self.source.current_state() == gst::State::Playing
    }

    fn position(&self) -> f64 {
        self.normalized_position().unwrap_or(0.0)
    }

    fn set_position(&mut self, position: f64) {
        if let Err(err) = self.seek(position.clamp(0.0, 1.0)) {
            debug!("cannot seek: {err}");
        }
    }

    /// `0` = silent, `100` = full volume, on a linear scale.
    fn set_volume(&mut self, volume: u8) {
        let volume = f64::from(volume.min(100)) / 100.0;
        self.source.set_property("volume", volume);
    }

    fn set_video_output(&mut self, handle: NativeHandle) {
        let Some(overlay) = self.source.dynamic_cast_ref::<gst_video::VideoOverlay>() else {
            warn!("pipeline does not support embedding video");
            return;
        };
        // SAFETY: callers only pass handles of live windows they own.
        unsafe { overlay.set_window_handle(handle.as_raw()) };
    }

    fn drain_events(&mut self) {
        let mut eos = false;
        for msg in self.bus.iter() {
            match msg.view() {
                gst::MessageView::Error(err) => {
                    error!("bus returned an error: {}", err.error());
                    if let Some(details) = err.debug() {
                        debug!("{details}");
                    }
                }
                gst::MessageView::Warning(warning) => {
                    warn!("bus returned a warning: {}", warning.error());
                }
                gst::MessageView::Eos(_) => eos = true,
                _ => {}
            }
        }

        if eos {
            debug!("end of stream");
            self.is_eos = true;
            self.set_state(gst::State::Paused);
        }
    }
}
