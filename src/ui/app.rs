use std::sync::Arc;

use flume::Receiver;
use ratatui::Frame;
use tracing::info;

use crate::{
    audio::{config::AudioConfig, playback::PlaybackEngine},
    config::ClientConfig,
    controller::{Controller, autoplay::ListenerRegistry},
    event::events::Event,
    http::ApiService,
};

use super::{message::AppMessage, tui, util::handler::EventHandler};

pub struct App {
    pub controller: Controller,
    pub event_rx: Receiver<Event>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: ClientConfig) -> color_eyre::Result<Self> {
        let (event_tx, event_rx) = flume::unbounded();
        let api = Arc::new(ApiService::new(&config)?);
        let audio = PlaybackEngine::new(AudioConfig::with_volume(config.volume));
        let controller = Controller::new(
            api,
            Box::new(audio),
            Box::new(ListenerRegistry::new()),
            event_tx,
            config.gallery_limit,
        );
        info!(
            api_url = config.api_url.as_str(),
            volume = config.volume,
            "client_loaded"
        );

        Ok(Self {
            controller,
            event_rx,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = tui::Tui::new()?;
        tui.enter()?;

        self.controller.start_flow();
        while !self.should_quit {
            tui.draw(|f| {
                self.ui(f);
            })?;

            EventHandler::handle_events(self, &mut tui).await?;
        }

        tui.exit()?;
        Ok(())
    }

    fn ui(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }

    pub fn update(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Quit => self.should_quit = true,
            AppMessage::TogglePlayPause => self.controller.toggle_play_pause(),
            AppMessage::NextTrack => self.controller.next_track(),
            AppMessage::LoadMore => self.controller.refresh_gallery(false),
            AppMessage::Generate => self.controller.submit_current_prompt(),
            AppMessage::InsertChar(c) => self.controller.edit_prompt(|text| text.push(c)),
            AppMessage::DeleteChar => self.controller.edit_prompt(|text| {
                text.pop();
            }),
            AppMessage::ClearPrompt => self.controller.edit_prompt(String::clear),
        }
    }
}
