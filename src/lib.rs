mod config;
mod dispatcher;
mod engine;
mod media;
mod output;
mod state;
mod sync;

use gstreamer as gst;
use thiserror::Error;

pub use config::Config;
pub use dispatcher::Player;
pub use engine::{MediaInfo, NativeHandle, PlaybackEngine};
pub use media::GstEngine;
pub use output::{platform_output, VideoOutput};
pub use state::{MediaKind, PlaybackSession, PlaybackState};
pub use sync::PositionSync;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Glib(#[from] glib::Error),
    #[error("{0}")]
    Bool(#[from] glib::BoolError),
    #[error("failed to get the gstreamer bus")]
    Bus,
    #[error("{0}")]
    StateChange(#[from] gst::StateChangeError),
    #[error("failed to cast gstreamer element")]
    Cast,
    #[error("invalid URI")]
    Uri,
    #[error("failed to query media duration or position")]
    Duration,
}
