use std::time::Duration;

/// Player settings. There is no config file; everything has a fixed default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base window title, suffixed with the loaded file name.
    pub title: String,
    /// Initial window size as `(width, height)`.
    pub window_size: (f32, f32),
    /// Period of the position synchronizer.
    pub poll_interval: Duration,
    /// How often engine notifications are read while media is loaded.
    pub event_interval: Duration,
    /// Resolution of the position slider.
    pub position_max: u32,
    /// Volume the slider starts at, `0..=100`.
    pub default_volume: u8,
    /// Extensions offered by the "Media Files" filter of the file chooser.
    pub media_extensions: Vec<&'static str>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            title: "NexusPlayer".to_owned(),
            window_size: (800.0, 450.0),
            poll_interval: Duration::from_millis(1000),
            event_interval: Duration::from_millis(250),
            position_max: 1000,
            default_volume: 50,
            media_extensions: vec![
                "mp4", "avi", "webm", "mkv", "flv", "mp3", "wav", "ogg", "flac",
            ],
        }
    }
}

impl Config {
    /// Window title for a loaded file, or the bare title when nothing is loaded.
    pub fn window_title(&self, file_name: Option<&str>) -> String {
        match file_name {
            Some(name) => format!("{} - {}", self.title, name),
            None => self.title.clone(),
        }
    }
}
