use iced::{
    widget::{button, column, container, row, slider, text, Space},
    window, Color, Element, Length, Size, Subscription, Task, Theme,
};
use log::{debug, info};
use nexus_player::{platform_output, Config, GstEngine, Player, VideoOutput};
use rfd::FileDialog;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Height reserved below the video surface for the controls, in logical pixels.
const CONTROLS_HEIGHT: f32 = 160.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("nexus_player=info")),
        )
        .init();

    let config = Config::default();
    let (width, height) = config.window_size;
    let engine = GstEngine::new()?;
    info!("playback engine ready");

    iced::application(App::title, App::update, App::view)
        .subscription(App::subscription)
        .theme(App::theme)
        .window_size(Size::new(width, height))
        .run_with(move || App::new(engine, config))?;
    Ok(())
}

#[derive(Clone, Debug)]
enum Message {
    Open,
    Play,
    Pause,
    Stop,
    Volume(u8),
    Seek(u32),
    SeekRelease,
    Tick,
    EngineEvents,
    OutputReady(Option<Arc<dyn VideoOutput>>),
    ScaleFactor(f64),
    Resized(Size),
}

struct App {
    player: Player<GstEngine>,
    volume: u8,
    dragging: Option<u32>,
    window_size: Size,
    scale_factor: f64,
}

impl App {
    fn new(engine: GstEngine, config: Config) -> (Self, Task<Message>) {
        let volume = config.default_volume;
        let (width, height) = config.window_size;

        let mut player = Player::new(engine, config);
        player.set_volume(volume);

        let bind_window = window::get_oldest().and_then(|id| {
            Task::batch([
                window::run_with_handle(id, |handle| platform_output(handle.as_raw()))
                    .map(Message::OutputReady),
                window::get_scale_factor(id).map(|scale| Message::ScaleFactor(scale as f64)),
            ])
        });

        (
            App {
                player,
                volume,
                dragging: None,
                window_size: Size::new(width, height),
                scale_factor: 1.0,
            },
            bind_window,
        )
    }

    fn title(&self) -> String {
        self.player.title()
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Open => {
                let extensions = &self.player.config().media_extensions;
                let picked = FileDialog::new()
                    .set_title("Open Media File")
                    .add_filter("Media Files", extensions.as_slice())
                    .add_filter("All Files", &["*"])
                    .pick_file();

                if let Some(path) = picked {
                    if self.player.open(&path) {
                        self.place_video();
                    }
                }
            }
            Message::Play => self.player.play(),
            Message::Pause => self.player.pause(),
            Message::Stop => self.player.stop(),
            Message::Volume(volume) => {
                self.volume = volume;
                self.player.set_volume(volume);
            }
            Message::Seek(value) => {
                self.dragging = Some(value);
            }
            Message::SeekRelease => {
                if let Some(value) = self.dragging.take() {
                    self.player.seek(value);
                }
            }
            Message::Tick => {
                if let Some(value) = self.player.tick() {
                    debug!("position {value}/{}", self.player.position_max());
                }
            }
            Message::EngineEvents => self.player.poll_engine(),
            Message::OutputReady(output) => match output {
                Some(output) => {
                    self.player.set_video_output(output);
                    self.place_video();
                }
                None => info!("video will play in a separate window"),
            },
            Message::ScaleFactor(scale_factor) => {
                self.scale_factor = scale_factor;
                self.place_video();
            }
            Message::Resized(size) => {
                self.window_size = size;
                self.place_video();
            }
        }
        Task::none()
    }

    /// Keeps the embedded video inside the surface area above the controls.
    fn place_video(&self) {
        if !self.player.video_visible() {
            return;
        }
        let width = self.window_size.width as f64 * self.scale_factor;
        let height =
            (self.window_size.height - CONTROLS_HEIGHT).max(0.0) as f64 * self.scale_factor;
        self.player
            .engine()
            .set_render_rectangle(0, 0, width as i32, height as i32);
    }

    fn subscription(&self) -> Subscription<Message> {
        let config = self.player.config();
        let mut subscriptions =
            vec![window::resize_events().map(|(_id, size)| Message::Resized(size))];

        if self.player.wants_engine_events() {
            subscriptions
                .push(iced::time::every(config.event_interval).map(|_| Message::EngineEvents));
        }
        if self.player.is_synchronizing() {
            subscriptions.push(iced::time::every(config.poll_interval).map(|_| Message::Tick));
        }

        Subscription::batch(subscriptions)
    }

    fn view(&self) -> Element<Message> {
        let surface: Element<Message> = if self.player.video_visible() {
            container(Space::new(Length::Fill, Length::Fill))
                .width(Length::Fill)
                .height(Length::Fill)
                .style(|_theme| container::Style {
                    background: Some(Color::BLACK.into()),
                    ..container::Style::default()
                })
                .into()
        } else {
            Space::new(Length::Fill, Length::Fill).into()
        };

        let transport = row![
            button(text("|>| (Play)"))
                .width(Length::Fill)
                .on_press_maybe(self.player.can_play().then_some(Message::Play)),
            button(text("|| (Pause)"))
                .width(Length::Fill)
                .on_press(Message::Pause),
            button(text("[] (Stop)"))
                .width(Length::Fill)
                .on_press(Message::Stop),
        ]
        .spacing(5);

        let volume = row![
            text("Volume:"),
            slider(0..=100, self.volume, Message::Volume),
        ]
        .spacing(10)
        .align_y(iced::alignment::Vertical::Center);

        let position = slider(
            0..=self.player.position_max(),
            self.dragging.unwrap_or(self.player.position_value()),
            Message::Seek,
        )
        .on_release(Message::SeekRelease);

        column![
            surface,
            transport,
            button(text("Open File"))
                .width(Length::Fill)
                .on_press(Message::Open),
            volume,
            position,
        ]
        .spacing(10)
        .padding(10)
        .into()
    }
}
