pub mod autoplay;
pub mod error;
pub mod gallery;
pub mod page;
pub mod session;
pub mod traits;

use std::sync::Arc;

use flume::Sender;
use tracing::{debug, info, warn};

use crate::{
    audio::state::PlaybackState,
    controller::{
        autoplay::AutoplayRetry,
        page::{Element, Page},
        session::Session,
        traits::{Api, AudioOutput, InteractionHub, InteractionKind},
    },
    event::events::{Event, TrackIntent},
    http::model::{GenerateRequest, GenerationPage, GenerationResult, Track},
    util::task::TaskManager,
};

use self::error::ClientError;

pub const VALIDATION_MESSAGE: &str = "Please enter a prompt.";
pub const GENERATING_MESSAGE: &str = "Generating...";
pub const DONE_MESSAGE: &str = "Done!";
pub const PLAYING_LABEL: &str = "⏸";
pub const PAUSED_LABEL: &str = "▶";

/// Player/prompt/gallery state machine. Every method runs on the host event
/// loop; network work is spawned and comes back through [`Controller::handle`].
pub struct Controller {
    api: Arc<dyn Api>,
    audio: Box<dyn AudioOutput>,
    hub: Box<dyn InteractionHub>,
    event_tx: Sender<Event>,
    page: Page,
    session: Session,
    autoplay: AutoplayRetry,
    tasks: TaskManager,
    gallery_limit: usize,
    next_request: u64,
    track_request: Option<u64>,
    image_request: Option<u64>,
}

impl Controller {
    pub fn new(
        api: Arc<dyn Api>,
        audio: Box<dyn AudioOutput>,
        hub: Box<dyn InteractionHub>,
        event_tx: Sender<Event>,
        gallery_limit: usize,
    ) -> Self {
        Self::with_page(api, audio, hub, event_tx, gallery_limit, Page::default())
    }

    pub fn with_page(
        api: Arc<dyn Api>,
        audio: Box<dyn AudioOutput>,
        hub: Box<dyn InteractionHub>,
        event_tx: Sender<Event>,
        gallery_limit: usize,
        mut page: Page,
    ) -> Self {
        page.set_text(Element::PlayPauseButton, PAUSED_LABEL);

        Self {
            api,
            audio,
            hub,
            event_tx,
            page,
            session: Session::default(),
            autoplay: AutoplayRetry::default(),
            tasks: TaskManager::new(),
            gallery_limit: gallery_limit.max(1),
            next_request: 0,
            track_request: None,
            image_request: None,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.session.current_track()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.session.playback
    }

    pub fn first_generation_done(&self) -> bool {
        self.session.first_generation_done()
    }

    pub fn gallery_offset(&self) -> usize {
        self.session.gallery.offset()
    }

    pub fn is_generating(&self) -> bool {
        self.session.generation_in_flight().is_some()
    }

    pub fn is_autoplay_armed(&self) -> bool {
        self.autoplay.is_armed()
    }

    fn next_request_id(&mut self) -> u64 {
        self.next_request += 1;
        self.next_request
    }

    pub fn edit_prompt(&mut self, f: impl FnOnce(&mut String)) {
        self.page.edit_text(Element::PromptInput, f);
    }

    pub fn start_flow(&mut self) {
        self.page.set_error(None);
        self.load_random_track(TrackIntent::Start);
    }

    pub fn next_track(&mut self) {
        self.page.set_error(None);
        self.load_random_track(TrackIntent::Next);
    }

    pub fn load_random_track(&mut self, intent: TrackIntent) {
        let request = self.next_request_id();
        self.track_request = Some(request);

        let api = self.api.clone();
        let tx = self.event_tx.clone();
        self.tasks.spawn(
            "track",
            tokio::spawn(async move {
                let result = api.random_track().await;
                let _ = tx.send(Event::TrackFetched {
                    request,
                    intent,
                    result,
                });
            }),
        );
    }

    /// Applies a background result. Results from a replaced session or a
    /// superseded request are dropped.
    pub fn handle(&mut self, event: Event) {
        match event {
            Event::TrackFetched {
                request,
                intent,
                result,
            } => self.on_track_fetched(request, intent, result),
            Event::AudioFetched { epoch, result } => self.on_audio_fetched(epoch, result),
            Event::GenerationFinished {
                epoch,
                request,
                result,
            } => self.on_generation_finished(epoch, request, result),
            Event::ResultImageChecked {
                epoch,
                request,
                result,
            } => self.on_result_image_checked(epoch, request, result),
            Event::GalleryFetched {
                epoch,
                request,
                reset,
                result,
            } => self.on_gallery_fetched(epoch, request, reset, result),
        }
    }

    fn on_track_fetched(
        &mut self,
        request: u64,
        intent: TrackIntent,
        result: Result<Track, ClientError>,
    ) {
        if self.track_request != Some(request) {
            debug!(request, "track_response_superseded");
            return;
        }
        self.track_request = None;

        match result {
            Ok(track) => {
                self.set_track(track);
                if intent == TrackIntent::Start {
                    self.page.show(Element::PlayerSection);
                    self.page.show(Element::PromptSection);
                }
            }
            Err(e) => {
                warn!(error = %e, "random_track_failed");
                self.page.set_error(Some(&e.to_string()));
            }
        }
    }

    pub fn set_track(&mut self, track: Track) {
        info!(
            track_id = track.id.as_str(),
            title = track.display_title(),
            "track_set"
        );

        self.autoplay.disarm(self.hub.as_mut());
        self.audio.stop();
        self.tasks.abort("image_probe");
        self.image_request = None;

        let epoch = self.session.replace(track.clone());

        self.page.hide(Element::TrackInfo);
        self.page.hide(Element::GallerySection);
        self.page.hide(Element::PlayingIndicator);
        self.page.hide(Element::PlayingIndicatorStandalone);
        self.page.hide(Element::AutoplayHint);
        self.page.hide(Element::ResultWrapper);

        self.page.set_source(Element::ResultImage, None);
        self.page.hide(Element::ResultImage);
        self.page.set_text(Element::ResultCaption, "");
        self.page.set_text(Element::PromptInput, "");
        self.page.set_text(Element::GenerateStatus, "");
        self.page.set_disabled(Element::GenerateButton, false);

        self.page.set_text(Element::TrackTitle, track.display_title());
        self.page.set_text(Element::TrackArtist, track.display_artist());
        self.page.set_text(Element::PlayPauseButton, PAUSED_LABEL);
        self.page.set_active(Element::PlayPauseButton, false);

        let api = self.api.clone();
        let tx = self.event_tx.clone();
        let audio_url = track.audio_url;
        self.tasks.spawn(
            "audio",
            tokio::spawn(async move {
                let result = api.fetch_audio(&audio_url).await;
                let _ = tx.send(Event::AudioFetched { epoch, result });
            }),
        );

        self.refresh_gallery(true);
    }

    fn on_audio_fetched(&mut self, epoch: u64, result: Result<Vec<u8>, ClientError>) {
        if !self.session.is_current(epoch) {
            debug!(epoch, "audio_response_discarded");
            return;
        }

        let loaded = result.and_then(|bytes| {
            self.audio
                .load(bytes)
                .map_err(|e| ClientError::Playback(e.to_string()))
        });

        match loaded {
            Ok(()) => {
                self.session.playback = PlaybackState::Ready;
                self.attempt_autoplay();
            }
            Err(e) => {
                warn!(error = %e, "audio_load_failed");
                self.session.playback = PlaybackState::Idle;
                self.page.set_error(Some(&e.to_string()));
            }
        }
    }

    fn attempt_autoplay(&mut self) {
        match self.audio.play() {
            Ok(()) => self.update_play_state(true),
            Err(e) => {
                info!(error = %e, "autoplay_blocked");
                self.update_play_state(false);
                self.page.show(Element::AutoplayHint);
                self.autoplay.arm(self.hub.as_mut());
            }
        }
    }

    /// Delivers a document-level click or key press. Only an armed autoplay
    /// retry listens for these.
    pub fn handle_interaction(&mut self, kind: InteractionKind) {
        if !self.autoplay.fire(self.hub.as_mut(), kind) {
            return;
        }

        match self.audio.play() {
            Ok(()) => {
                self.update_play_state(true);
                self.page.hide(Element::AutoplayHint);
            }
            Err(e) => warn!(error = %e, "autoplay_retry_failed"),
        }
    }

    pub fn toggle_play_pause(&mut self) {
        if self.audio.is_paused() {
            match self.audio.play() {
                Ok(()) => {
                    self.autoplay.disarm(self.hub.as_mut());
                    self.update_play_state(true);
                }
                Err(e) => {
                    debug!(error = %e, "play_failed");
                    self.update_play_state(false);
                }
            }
        } else {
            self.audio.pause();
            self.update_play_state(false);
        }
    }

    /// Checks for the end of the current source. Called on every host tick.
    pub fn poll_playback(&mut self) {
        if self.session.playback == PlaybackState::Playing && self.audio.is_finished() {
            debug!("playback_ended");
            self.update_play_state(false);
            self.session.playback = PlaybackState::Ready;
        }
    }

    fn update_play_state(&mut self, is_playing: bool) {
        if is_playing {
            self.session.playback = PlaybackState::Playing;
            self.page.set_text(Element::PlayPauseButton, PLAYING_LABEL);
            self.page.set_active(Element::PlayPauseButton, true);
            if self.session.first_generation_done() {
                self.page.show(Element::PlayingIndicator);
                self.page.hide(Element::PlayingIndicatorStandalone);
            } else {
                self.page.show(Element::PlayingIndicatorStandalone);
            }
            self.page.hide(Element::AutoplayHint);
        } else {
            if self.session.playback == PlaybackState::Playing {
                self.session.playback = PlaybackState::Paused;
            }
            self.page.set_text(Element::PlayPauseButton, PAUSED_LABEL);
            self.page.set_active(Element::PlayPauseButton, false);
            self.page.hide(Element::PlayingIndicator);
            self.page.hide(Element::PlayingIndicatorStandalone);
        }
    }

    pub fn submit_current_prompt(&mut self) {
        let text = self.page.text(Element::PromptInput).to_string();
        self.submit_prompt(&text);
    }

    pub fn submit_prompt(&mut self, text: &str) {
        let Some(track_id) = self.session.current_track().map(|t| t.id.clone()) else {
            return;
        };

        let prompt = text.trim();
        if prompt.is_empty() {
            let err = ClientError::Validation(VALIDATION_MESSAGE.to_string());
            debug!(error = %err, "prompt_rejected");
            self.page.set_text(Element::GenerateStatus, err.to_string());
            return;
        }
        if self.session.generation_in_flight().is_some() {
            debug!("generation_already_in_flight");
            return;
        }

        let request = self.next_request_id();
        let epoch = self.session.epoch();
        self.session.begin_generation(request);
        self.page.set_text(Element::GenerateStatus, GENERATING_MESSAGE);
        self.page.set_disabled(Element::GenerateButton, true);
        info!(request, track_id = track_id.as_str(), "generation_submitted");

        let body = GenerateRequest {
            prompt: prompt.to_string(),
            track_id,
        };
        let api = self.api.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api.generate(&body).await;
            let _ = tx.send(Event::GenerationFinished {
                epoch,
                request,
                result,
            });
        });
    }

    fn on_generation_finished(
        &mut self,
        epoch: u64,
        request: u64,
        result: Result<GenerationResult, ClientError>,
    ) {
        if self.session.finish_generation(request) {
            self.page.set_disabled(Element::GenerateButton, false);
        }
        if !self.session.is_current(epoch) {
            debug!(epoch, request, "generation_response_discarded");
            return;
        }

        let generation = match result {
            Ok(generation) => generation,
            Err(e) => {
                warn!(error = %e, request, "generation_failed");
                self.page.set_text(Element::GenerateStatus, e.to_string());
                return;
            }
        };

        info!(
            request,
            generation_id = generation.generation_id.as_deref().unwrap_or(""),
            "generation_completed"
        );
        self.page.set_text(Element::GenerateStatus, DONE_MESSAGE);
        self.page.set_text(Element::PromptInput, "");

        self.session.mark_first_generation();
        self.page.show(Element::TrackInfo);
        self.page.show(Element::GallerySection);
        if !self.audio.is_paused() {
            self.page.show(Element::PlayingIndicator);
            self.page.hide(Element::PlayingIndicatorStandalone);
        }

        if let Some(url) = generation.image_url {
            self.page
                .set_text(Element::ResultCaption, generation.prompt_text);
            self.page.set_source(Element::ResultImage, Some(url.clone()));
            self.image_request = Some(request);

            let api = self.api.clone();
            let tx = self.event_tx.clone();
            self.tasks.spawn(
                "image_probe",
                tokio::spawn(async move {
                    let result = api.probe_image(&url).await;
                    let _ = tx.send(Event::ResultImageChecked {
                        epoch,
                        request,
                        result,
                    });
                }),
            );
        }
    }

    fn on_result_image_checked(
        &mut self,
        epoch: u64,
        request: u64,
        result: Result<(), ClientError>,
    ) {
        if !self.session.is_current(epoch) || self.image_request != Some(request) {
            return;
        }
        self.image_request = None;

        match result {
            Ok(()) => {
                self.page.show(Element::ResultImage);
                self.page.show(Element::ResultWrapper);
            }
            Err(e) => {
                warn!(error = %e, "result_image_failed");
                self.page.hide(Element::ResultImage);
                self.page.hide(Element::ResultWrapper);
            }
        }
    }

    pub fn refresh_gallery(&mut self, reset: bool) {
        let Some(track_id) = self.session.current_track().map(|t| t.id.clone()) else {
            return;
        };

        if reset {
            self.page.clear_gallery();
        }

        let request = self.next_request_id();
        let page = self.session.gallery.begin(request, reset);
        let epoch = self.session.epoch();
        let limit = self.gallery_limit;

        let api = self.api.clone();
        let tx = self.event_tx.clone();
        self.tasks.spawn(
            "gallery",
            tokio::spawn(async move {
                let result = api.generations(&track_id, limit, page.offset).await;
                let _ = tx.send(Event::GalleryFetched {
                    epoch,
                    request,
                    reset,
                    result,
                });
            }),
        );
    }

    fn on_gallery_fetched(
        &mut self,
        epoch: u64,
        request: u64,
        reset: bool,
        result: Result<GenerationPage, ClientError>,
    ) {
        if !self.session.is_current(epoch) || !self.session.gallery.accept(request) {
            debug!(epoch, request, "gallery_response_discarded");
            return;
        }

        match result {
            Ok(page) => {
                let received = page.items.len();
                if reset {
                    self.page.clear_gallery();
                }
                self.page.append_gallery(page.items);
                self.session.gallery.advance(received);
                debug!(
                    received,
                    offset = self.session.gallery.offset(),
                    "gallery_page_applied"
                );
                if self.session.first_generation_done() {
                    self.page.show(Element::GallerySection);
                }
            }
            Err(e) => {
                warn!(error = %e, "gallery_fetch_failed");
                self.page.set_error(Some(&e.to_string()));
            }
        }
    }
}
