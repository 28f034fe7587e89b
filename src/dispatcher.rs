use crate::config::Config;
use crate::engine::PlaybackEngine;
use crate::output::VideoOutput;
use crate::state::{PlaybackSession, PlaybackState};
use crate::sync::PositionSync;
use log::{debug, info};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Forwards user commands to a [`PlaybackEngine`] and owns everything the UI
/// reads back: the loaded session, the transport state, the position
/// synchronizer and the video surface flag.
pub struct Player<E: PlaybackEngine> {
    engine: E,
    config: Config,
    session: Option<PlaybackSession>,
    state: PlaybackState,
    sync: PositionSync,
    output: Option<Arc<dyn VideoOutput>>,
    video_visible: bool,
}

impl<E: PlaybackEngine> Player<E> {
    pub fn new(engine: E, config: Config) -> Self {
        let sync = PositionSync::new(config.position_max);
        Player {
            engine,
            config,
            session: None,
            state: PlaybackState::NoMedia,
            sync,
            output: None,
            video_visible: false,
        }
    }

    /// Sets the native surface video is rendered into. If video is already
    /// loaded it is rebound immediately.
    pub fn set_video_output(&mut self, output: Arc<dyn VideoOutput>) {
        if self.video_visible {
            output.attach(&mut self.engine);
        }
        self.output = Some(output);
    }

    /// Loads the file at `path`.
    ///
    /// Paths that are not existing, readable regular files are ignored and
    /// `false` is returned; nothing else changes in that case.
    pub fn open(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        if !path.is_file() || File::open(path).is_err() {
            debug!("ignoring unreadable media path {}", path.display());
            return false;
        }

        let info = self.engine.load(path);
        let session = PlaybackSession::new(path.to_path_buf(), info);
        info!(
            "loaded {} as {:?} ({:?})",
            session.file_name(),
            session.kind,
            session.info
        );

        self.video_visible = session.kind.is_video();
        if self.video_visible {
            if let Some(output) = &self.output {
                output.attach(&mut self.engine);
            }
        }

        self.session = Some(session);
        self.state = PlaybackState::Loaded;
        self.sync.start();
        true
    }

    pub fn play(&mut self) {
        if !self.state.has_media() || !self.engine.has_media() {
            debug!("play requested with no media loaded");
            return;
        }
        self.engine.play();
        self.state = PlaybackState::Playing;
    }

    pub fn pause(&mut self) {
        if !self.engine.is_playing() {
            return;
        }
        self.engine.pause();
        self.state = PlaybackState::Paused;
    }

    /// Stops playback and halts position synchronization, whatever the
    /// current state.
    pub fn stop(&mut self) {
        self.engine.stop();
        self.sync.stop();
        if self.state.has_media() {
            self.state = PlaybackState::Stopped;
        }
    }

    /// Forwards a volume percentage. The range is enforced by the control.
    pub fn set_volume(&mut self, volume: u8) {
        self.engine.set_volume(volume);
    }

    /// Seeks to a position given in slider units.
    pub fn seek(&mut self, value: u32) {
        let position = self.sync.normalize(value);
        debug!("seeking to {position:.3}");
        self.engine.set_position(position);
        self.sync.set_value(value);
    }

    /// Whether the engine's asynchronous notifications need reading. Stays
    /// true after `stop()`, since a later `play()` runs without the
    /// synchronizer.
    pub fn wants_engine_events(&self) -> bool {
        self.state.has_media()
    }

    /// Lets the engine process pending errors and end-of-stream.
    pub fn poll_engine(&mut self) {
        self.engine.drain_events();
    }

    /// One synchronizer poll. Returns the new slider value, if any.
    pub fn tick(&mut self) -> Option<u32> {
        self.sync.tick(&self.engine)
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    /// Play is only offered once media has been loaded.
    pub fn can_play(&self) -> bool {
        self.state.has_media()
    }

    pub fn title(&self) -> String {
        let name = self.session.as_ref().map(PlaybackSession::file_name);
        self.config.window_title(name.as_deref())
    }

    pub fn video_visible(&self) -> bool {
        self.video_visible
    }

    pub fn position_value(&self) -> u32 {
        self.sync.value()
    }

    pub fn position_max(&self) -> u32 {
        self.sync.max()
    }

    pub fn is_synchronizing(&self) -> bool {
        self.sync.is_running()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MediaInfo, NativeHandle};
    use crate::state::MediaKind;
    use std::path::PathBuf;

    #[derive(Default)]
    struct StubEngine {
        loaded: Option<PathBuf>,
        playing: bool,
        position: f64,
        plays: usize,
        pauses: usize,
        stops: usize,
        seeks: Vec<f64>,
        volumes: Vec<u8>,
        outputs: Vec<NativeHandle>,
        drains: usize,
        reject_loads: bool,
    }

    impl PlaybackEngine for StubEngine {
        fn load(&mut self, path: &Path) -> Option<MediaInfo> {
            self.playing = false;
            if self.reject_loads {
                return None;
            }
            self.loaded = Some(path.to_path_buf());
            Some(MediaInfo::default())
        }
        fn has_media(&self) -> bool {
            self.loaded.is_some()
        }
        fn play(&mut self) {
            self.plays += 1;
            self.playing = true;
        }
        fn pause(&mut self) {
            self.pauses += 1;
            self.playing = false;
        }
        fn stop(&mut self) {
            self.stops += 1;
            self.playing = false;
        }
        fn is_playing(&self) -> bool {
            self.playing
        }
        fn position(&self) -> f64 {
            self.position
        }
        fn set_position(&mut self, position: f64) {
            self.seeks.push(position);
        }
        fn set_volume(&mut self, volume: u8) {
            self.volumes.push(volume);
        }
        fn set_video_output(&mut self, handle: NativeHandle) {
            self.outputs.push(handle);
        }
        fn drain_events(&mut self) {
            self.drains += 1;
        }
    }

    #[derive(Debug)]
    struct FixedOutput(NativeHandle);

    impl VideoOutput for FixedOutput {
        fn handle(&self) -> NativeHandle {
            self.0
        }
    }

    fn player() -> Player<StubEngine> {
        Player::new(StubEngine::default(), Config::default())
    }

    fn media_file(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"not really media").expect("write media file");
        path
    }

    #[test]
    fn invalid_paths_leave_player_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut player = player();

        assert!(!player.open(dir.path().join("missing.mp3")));
        assert!(!player.open(dir.path()));

        assert!(player.session().is_none());
        assert_eq!(player.state(), PlaybackState::NoMedia);
        assert!(!player.is_synchronizing());
        assert!(player.engine().loaded.is_none());
        assert_eq!(player.title(), "NexusPlayer");
    }

    #[test]
    fn invalid_path_keeps_previous_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        let song = media_file(&dir, "song.mp3");
        let mut player = player();
        assert!(player.open(&song));
        player.stop();

        assert!(!player.open(dir.path().join("gone.mkv")));
        assert_eq!(player.session().map(|s| s.path.clone()), Some(song));
        assert_eq!(player.state(), PlaybackState::Stopped);
        assert!(!player.is_synchronizing());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_is_ignored() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let locked = media_file(&dir, "locked.mp3");
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000))
            .expect("chmod media file");
        if File::open(&locked).is_ok() {
            // privileged users can read it anyway
            return;
        }

        let mut player = player();
        assert!(!player.open(&locked));
        assert!(player.session().is_none());
        assert!(player.engine().loaded.is_none());
        assert!(!player.is_synchronizing());
    }

    #[test]
    fn open_classifies_and_starts_sync() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut player = player();

        assert!(player.open(media_file(&dir, "song.FLAC")));
        assert!(!player.video_visible());
        assert!(player.is_synchronizing());
        assert_eq!(player.state(), PlaybackState::Loaded);
        assert_eq!(player.title(), "NexusPlayer - song.FLAC");

        assert!(player.open(media_file(&dir, "clip.webm")));
        assert!(player.video_visible());
        assert_eq!(player.session().map(|s| s.kind), Some(MediaKind::Video));
        assert_eq!(player.title(), "NexusPlayer - clip.webm");
    }

    #[test]
    fn video_output_bound_only_for_video() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut player = player();
        player.set_video_output(Arc::new(FixedOutput(NativeHandle::XWindow(9))));

        player.open(media_file(&dir, "song.ogg"));
        assert!(player.engine().outputs.is_empty());

        player.open(media_file(&dir, "clip.avi"));
        assert_eq!(player.engine().outputs, vec![NativeHandle::XWindow(9)]);
    }

    #[test]
    fn late_video_output_binds_loaded_video() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut player = player();
        player.open(media_file(&dir, "clip.mp4"));

        player.set_video_output(Arc::new(FixedOutput(NativeHandle::Hwnd(3))));
        assert_eq!(player.engine().outputs, vec![NativeHandle::Hwnd(3)]);
    }

    #[test]
    fn play_without_media_is_noop() {
        let mut player = player();
        player.play();
        assert_eq!(player.engine().plays, 0);
        assert_eq!(player.state(), PlaybackState::NoMedia);
        assert!(!player.can_play());
    }

    #[test]
    fn play_skipped_when_engine_has_no_media() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut player = Player::new(
            StubEngine {
                reject_loads: true,
                ..StubEngine::default()
            },
            Config::default(),
        );
        assert!(player.open(media_file(&dir, "broken.mp3")));

        player.play();
        assert_eq!(player.engine().plays, 0);
        assert_eq!(player.state(), PlaybackState::Loaded);
    }

    #[test]
    fn engine_events_still_read_after_stop_then_play() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut player = player();
        assert!(!player.wants_engine_events());

        player.open(media_file(&dir, "song.mp3"));
        player.play();
        player.stop();
        player.play();

        assert!(!player.is_synchronizing());
        assert!(player.wants_engine_events());
        player.poll_engine();
        player.poll_engine();
        assert_eq!(player.engine().drains, 2);
    }

    #[test]
    fn pause_requires_engine_playing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut player = player();
        player.pause();
        player.open(media_file(&dir, "song.wav"));
        player.pause();
        assert_eq!(player.engine().pauses, 0);
        assert_eq!(player.state(), PlaybackState::Loaded);

        player.play();
        player.pause();
        assert_eq!(player.engine().pauses, 1);
        assert_eq!(player.state(), PlaybackState::Paused);
    }

    #[test]
    fn transport_follows_state_machine() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut player = player();
        player.open(media_file(&dir, "song.mp3"));

        player.play();
        assert_eq!(player.state(), PlaybackState::Playing);
        player.play();
        assert_eq!(player.state(), PlaybackState::Playing);
        player.pause();
        assert_eq!(player.state(), PlaybackState::Paused);
        assert!(player.is_synchronizing());
        player.play();
        assert_eq!(player.state(), PlaybackState::Playing);
        player.stop();
        assert_eq!(player.state(), PlaybackState::Stopped);
        player.play();
        assert_eq!(player.state(), PlaybackState::Playing);

        player.open(media_file(&dir, "other.mp3"));
        assert_eq!(player.state(), PlaybackState::Loaded);
    }

    #[test]
    fn stop_always_halts_sync() {
        let dir = tempfile::tempdir().expect("tempdir");

        let mut idle = player();
        idle.stop();
        assert_eq!(idle.engine().stops, 1);
        assert_eq!(idle.state(), PlaybackState::NoMedia);

        for setup in [0, 1, 2] {
            let mut player = player();
            player.open(media_file(&dir, "song.mp3"));
            if setup >= 1 {
                player.play();
            }
            if setup == 2 {
                player.pause();
            }
            player.stop();
            player.engine_mut().playing = true;
            player.engine_mut().position = 0.6;
            assert_eq!(player.tick(), None);
            assert_eq!(player.position_value(), 0);
        }
    }

    #[test]
    fn ticks_while_paused_leave_value() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut player = player();
        player.open(media_file(&dir, "song.mp3"));
        player.play();
        player.engine_mut().position = 0.4;
        assert_eq!(player.tick(), Some(400));

        player.pause();
        player.engine_mut().position = 0.8;
        assert_eq!(player.tick(), None);
        assert_eq!(player.position_value(), 400);
    }

    #[test]
    fn seek_normalizes_slider_value() {
        let mut player = player();
        for value in [0, 1, 250, 999, 1000] {
            player.seek(value);
            let sent = *player.engine().seeks.last().expect("seek forwarded");
            assert!((sent - value as f64 / 1000.0).abs() < 1e-6);
            assert_eq!(player.position_value(), value);
        }
    }

    #[test]
    fn volume_forwarded_verbatim() {
        let mut player = player();
        player.set_volume(0);
        player.set_volume(50);
        player.set_volume(100);
        assert_eq!(player.engine().volumes, vec![0, 50, 100]);
    }
}
