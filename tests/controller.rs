//! End-to-end behaviour of the controller against in-memory collaborators.

use std::collections::VecDeque;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;
use flume::Receiver;
use serde_json::json;

use synesthesia::{
    audio::{error::AudioError, state::PlaybackState},
    controller::{
        Controller, DONE_MESSAGE, GENERATING_MESSAGE, PAUSED_LABEL, PLAYING_LABEL,
        VALIDATION_MESSAGE,
        autoplay::ListenerRegistry,
        error::ClientError,
        page::{Element, Page},
        traits::{Api, AudioOutput, InteractionHub, InteractionKind, SubscriptionId},
    },
    event::events::Event,
    http::model::{
        GalleryItem, GenerateRequest, GenerateResponse, GenerationPage, GenerationResult, Track,
    },
};

fn track(id: &str) -> Track {
    Track {
        id: id.into(),
        title: Some(format!("Song {id}")),
        artist: Some("The Testers".into()),
        audio_url: format!("/audio/{id}.mp3"),
    }
}

fn page_of(start: usize, len: usize) -> GenerationPage {
    GenerationPage {
        items: (start..start + len)
            .map(|i| GalleryItem {
                id: Some(format!("gen-{i}")),
                image_url: format!("/img/{i}.png"),
                prompt_text: Some(format!("prompt {i}")),
            })
            .collect(),
    }
}

#[derive(Default)]
struct StubApi {
    tracks: Mutex<VecDeque<Result<Track, ClientError>>>,
    pages: Mutex<VecDeque<GenerationPage>>,
    generate_result: Mutex<Option<Result<GenerateResponse, ClientError>>>,
    image_result: Mutex<Option<ClientError>>,
    audio_error: Mutex<Option<ClientError>>,
    generate_calls: AtomicUsize,
    gallery_offsets: Mutex<Vec<usize>>,
}

impl StubApi {
    fn respond_with(&self, result: Result<GenerateResponse, ClientError>) {
        *self.generate_result.lock().unwrap() = Some(result);
    }
}

#[async_trait]
impl Api for StubApi {
    async fn random_track(&self) -> Result<Track, ClientError> {
        self.tracks
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(track("t1")))
    }

    async fn generations(
        &self,
        _track_id: &str,
        _limit: usize,
        offset: usize,
    ) -> Result<GenerationPage, ClientError> {
        self.gallery_offsets.lock().unwrap().push(offset);
        Ok(self.pages.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerationResult, ClientError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        let response = self.generate_result.lock().unwrap().clone().unwrap_or_else(|| {
            Ok(GenerateResponse {
                generation_id: Some("g0".into()),
                image_url: Some("/img/g0.png".into()),
            })
        })?;
        Ok(GenerationResult::new(response, request.prompt.clone()))
    }

    async fn fetch_audio(&self, _url: &str) -> Result<Vec<u8>, ClientError> {
        match self.audio_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(vec![0; 16]),
        }
    }

    async fn probe_image(&self, _url: &str) -> Result<(), ClientError> {
        match self.image_result.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
struct AudioState {
    loaded: bool,
    playing: bool,
    finished: bool,
    refuse_plays: usize,
    play_calls: usize,
}

#[derive(Clone, Default)]
struct FakeAudio(Arc<Mutex<AudioState>>);

impl AudioOutput for FakeAudio {
    fn load(&mut self, _audio: Vec<u8>) -> Result<(), AudioError> {
        let mut state = self.0.lock().unwrap();
        state.loaded = true;
        state.playing = false;
        state.finished = false;
        Ok(())
    }

    fn play(&mut self) -> Result<(), AudioError> {
        let mut state = self.0.lock().unwrap();
        state.play_calls += 1;
        if state.refuse_plays > 0 {
            state.refuse_plays -= 1;
            return Err(AudioError::DeviceError("busy".into()));
        }
        if !state.loaded {
            return Err(AudioError::NothingLoaded);
        }
        state.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.0.lock().unwrap().playing = false;
    }

    fn stop(&mut self) {
        let mut state = self.0.lock().unwrap();
        state.playing = false;
        state.loaded = false;
    }

    fn is_paused(&self) -> bool {
        !self.0.lock().unwrap().playing
    }

    fn is_finished(&self) -> bool {
        self.0.lock().unwrap().finished
    }
}

#[derive(Clone, Default)]
struct SharedHub(Arc<Mutex<ListenerRegistry>>);

impl InteractionHub for SharedHub {
    fn subscribe(&mut self, kinds: &[InteractionKind]) -> SubscriptionId {
        self.0.lock().unwrap().subscribe(kinds)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.0.lock().unwrap().unsubscribe(id);
    }

    fn listeners(&self, kind: InteractionKind) -> Vec<SubscriptionId> {
        self.0.lock().unwrap().listeners(kind)
    }
}

struct Harness {
    controller: Controller,
    rx: Receiver<Event>,
    api: Arc<StubApi>,
    audio: FakeAudio,
    hub: SharedHub,
}

impl Harness {
    fn new() -> Self {
        Self::with_page(Page::default())
    }

    fn with_page(page: Page) -> Self {
        let (tx, rx) = flume::unbounded();
        let api = Arc::new(StubApi::default());
        let audio = FakeAudio::default();
        let hub = SharedHub::default();
        let controller = Controller::with_page(
            api.clone(),
            Box::new(audio.clone()),
            Box::new(hub.clone()),
            tx,
            12,
            page,
        );
        Self {
            controller,
            rx,
            api,
            audio,
            hub,
        }
    }

    /// Applies background results until nothing arrives for a short while.
    async fn settle(&mut self) {
        while let Ok(Ok(event)) =
            tokio::time::timeout(Duration::from_millis(100), self.rx.recv_async()).await
        {
            self.controller.handle(event);
        }
    }

    async fn started(mut self) -> Self {
        self.controller.start_flow();
        self.settle().await;
        self
    }

    fn page(&self) -> &Page {
        self.controller.page()
    }

    fn listeners(&self) -> usize {
        self.hub.0.lock().unwrap().len()
    }
}

#[tokio::test]
async fn start_flow_reveals_player_but_keeps_track_hidden() {
    let h = Harness::new().started().await;
    let page = h.page();

    assert!(page.is_visible(Element::PlayerSection));
    assert!(page.is_visible(Element::PromptSection));
    assert!(!page.is_visible(Element::TrackInfo));
    assert!(!page.is_visible(Element::GallerySection));
    assert!(!page.is_visible(Element::ResultWrapper));
    assert_eq!(page.text(Element::TrackTitle), "Song t1");

    assert_eq!(h.controller.playback_state(), PlaybackState::Playing);
    assert_eq!(page.text(Element::PlayPauseButton), PLAYING_LABEL);
    assert!(page.is_visible(Element::PlayingIndicatorStandalone));
    assert!(!page.is_visible(Element::PlayingIndicator));
    assert!(!h.controller.first_generation_done());
}

#[tokio::test]
async fn whitespace_prompt_never_reaches_the_network() {
    let mut h = Harness::new().started().await;

    for text in ["", "   ", "\t\n"] {
        h.controller.submit_prompt(text);
        h.settle().await;
        assert_eq!(h.page().text(Element::GenerateStatus), VALIDATION_MESSAGE);
        assert!(!h.page().is_disabled(Element::GenerateButton));
    }
    assert_eq!(h.api.generate_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn successful_generation_shows_result_and_sets_latch() {
    let mut h = Harness::new().started().await;
    let response: GenerateResponse =
        serde_json::from_value(json!({"generationId": "g1", "imageUrl": "/img/g1.png"})).unwrap();
    h.api.respond_with(Ok(response));

    h.controller.submit_prompt("sunset over mountains");
    assert!(h.page().is_disabled(Element::GenerateButton));
    assert_eq!(h.page().text(Element::GenerateStatus), GENERATING_MESSAGE);

    h.settle().await;
    let page = h.page();
    assert!(h.controller.first_generation_done());
    assert!(page.is_visible(Element::ResultWrapper));
    assert!(page.is_visible(Element::ResultImage));
    assert_eq!(page.source(Element::ResultImage), Some("/img/g1.png"));
    assert_eq!(page.text(Element::ResultCaption), "sunset over mountains");
    assert_eq!(page.text(Element::GenerateStatus), DONE_MESSAGE);
    assert_eq!(page.text(Element::PromptInput), "");
    assert!(!page.is_disabled(Element::GenerateButton));

    assert!(page.is_visible(Element::TrackInfo));
    assert!(page.is_visible(Element::GallerySection));
    assert!(page.is_visible(Element::PlayingIndicator));
    assert!(!page.is_visible(Element::PlayingIndicatorStandalone));
}

#[tokio::test]
async fn not_implemented_leaves_latch_untouched() {
    let mut h = Harness::new().started().await;
    h.api.respond_with(Err(ClientError::NotImplemented));

    h.controller.submit_prompt("rain on glass");
    h.settle().await;

    assert_eq!(
        h.page().text(Element::GenerateStatus),
        "Image generation is not implemented yet."
    );
    assert!(!h.controller.first_generation_done());
    assert!(!h.page().is_disabled(Element::GenerateButton));
    assert!(!h.page().is_visible(Element::ResultWrapper));
    assert!(!h.page().is_visible(Element::TrackInfo));
}

#[tokio::test]
async fn server_detail_is_shown_on_failure() {
    let mut h = Harness::new().started().await;
    h.api.respond_with(Err(ClientError::Server {
        status: 422,
        detail: "Prompt rejected".into(),
    }));

    h.controller.submit_prompt("forbidden thing");
    h.settle().await;

    assert_eq!(h.page().text(Element::GenerateStatus), "Prompt rejected");
    assert!(!h.controller.first_generation_done());
}

#[tokio::test]
async fn latch_survives_failures_until_track_changes() {
    let mut h = Harness::new().started().await;

    h.controller.submit_prompt("first light");
    h.settle().await;
    assert!(h.controller.first_generation_done());

    h.api.respond_with(Err(ClientError::Network("Generation failed".into())));
    h.controller.submit_prompt("second light");
    h.settle().await;
    assert!(h.controller.first_generation_done());

    h.controller.set_track(track("t2"));
    let page = h.page();
    assert!(!h.controller.first_generation_done());
    assert!(!page.is_visible(Element::GallerySection));
    assert!(!page.is_visible(Element::PlayingIndicator));
    assert!(!page.is_visible(Element::PlayingIndicatorStandalone));
    assert!(!page.is_visible(Element::ResultWrapper));
    assert!(!page.is_visible(Element::TrackInfo));
    assert_eq!(page.text(Element::ResultCaption), "");
    assert_eq!(page.source(Element::ResultImage), None);
    assert_eq!(h.controller.gallery_offset(), 0);
    assert!(page.gallery().is_empty());
}

#[tokio::test]
async fn generation_resolving_after_track_switch_is_discarded() {
    let mut h = Harness::new().started().await;

    h.controller.submit_prompt("old track prompt");
    h.controller.set_track(track("t2"));
    assert!(!h.page().is_disabled(Element::GenerateButton));

    h.settle().await;
    let page = h.page();
    assert_eq!(h.api.generate_calls.load(Ordering::SeqCst), 1);
    assert!(!h.controller.first_generation_done());
    assert!(!page.is_visible(Element::ResultWrapper));
    assert!(!page.is_visible(Element::TrackInfo));
    assert_eq!(page.text(Element::ResultCaption), "");
    assert_eq!(page.text(Element::GenerateStatus), "");
    assert!(!page.is_disabled(Element::GenerateButton));
    assert_eq!(page.text(Element::TrackTitle), "Song t2");
}

#[tokio::test]
async fn second_submission_while_in_flight_is_ignored() {
    let mut h = Harness::new().started().await;

    h.controller.submit_prompt("one");
    h.controller.submit_prompt("two");
    h.settle().await;

    assert_eq!(h.api.generate_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.page().text(Element::ResultCaption), "one");
}

#[tokio::test]
async fn gallery_pages_advance_offset_without_duplicates() {
    let mut h = Harness::new();
    {
        let mut pages = h.api.pages.lock().unwrap();
        pages.push_back(GenerationPage::default());
        pages.push_back(page_of(0, 12));
        pages.push_back(page_of(12, 12));
        pages.push_back(page_of(24, 5));
    }
    h.controller.start_flow();
    h.settle().await;
    assert_eq!(h.controller.gallery_offset(), 0);

    let mut offsets = Vec::new();
    for _ in 0..3 {
        h.controller.refresh_gallery(false);
        h.settle().await;
        offsets.push(h.controller.gallery_offset());
    }

    assert_eq!(offsets, vec![12, 24, 29]);
    assert_eq!(*h.api.gallery_offsets.lock().unwrap(), vec![0, 0, 12, 24]);

    let gallery = h.page().gallery();
    assert_eq!(gallery.len(), 29);
    let mut urls: Vec<_> = gallery.iter().map(|card| card.image_url.clone()).collect();
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), 29);

    // Hidden until the first generation for this track.
    assert!(!h.page().is_visible(Element::GallerySection));
}

#[tokio::test]
async fn gallery_reveals_after_first_generation() {
    let mut h = Harness::new().started().await;
    h.controller.submit_prompt("neon city");
    h.settle().await;

    h.api.pages.lock().unwrap().push_back(page_of(0, 3));
    h.controller.refresh_gallery(true);
    assert!(h.page().gallery().is_empty());
    h.settle().await;

    assert!(h.page().is_visible(Element::GallerySection));
    assert_eq!(h.page().gallery().len(), 3);
    assert_eq!(h.controller.gallery_offset(), 3);
}

#[tokio::test]
async fn gallery_is_noop_without_track() {
    let mut h = Harness::new();
    h.controller.refresh_gallery(false);
    h.settle().await;
    assert!(h.api.gallery_offsets.lock().unwrap().is_empty());
}

#[tokio::test]
async fn blocked_autoplay_retries_once_on_interaction() {
    let mut h = Harness::new();
    h.audio.0.lock().unwrap().refuse_plays = 1;
    h.controller.start_flow();
    h.settle().await;

    assert!(h.page().is_visible(Element::AutoplayHint));
    assert_eq!(h.page().text(Element::PlayPauseButton), PAUSED_LABEL);
    assert_eq!(h.controller.playback_state(), PlaybackState::Ready);
    assert_eq!(h.listeners(), 1);

    h.controller.handle_interaction(InteractionKind::Key);
    assert_eq!(h.listeners(), 0);
    assert_eq!(h.controller.playback_state(), PlaybackState::Playing);
    assert!(!h.page().is_visible(Element::AutoplayHint));

    let calls = h.audio.0.lock().unwrap().play_calls;
    h.controller.handle_interaction(InteractionKind::Click);
    assert_eq!(h.audio.0.lock().unwrap().play_calls, calls);
}

#[tokio::test]
async fn failed_retry_still_disarms() {
    let mut h = Harness::new();
    h.audio.0.lock().unwrap().refuse_plays = 2;
    h.controller.start_flow();
    h.settle().await;

    h.controller.handle_interaction(InteractionKind::Click);
    assert_eq!(h.listeners(), 0);
    assert!(h.page().is_visible(Element::AutoplayHint));
    assert_ne!(h.controller.playback_state(), PlaybackState::Playing);

    let calls = h.audio.0.lock().unwrap().play_calls;
    h.controller.handle_interaction(InteractionKind::Key);
    assert_eq!(h.audio.0.lock().unwrap().play_calls, calls);
}

#[tokio::test]
async fn track_switch_disarms_pending_retry() {
    let mut h = Harness::new();
    h.audio.0.lock().unwrap().refuse_plays = 1;
    h.controller.start_flow();
    h.settle().await;
    assert_eq!(h.listeners(), 1);

    h.controller.set_track(track("t2"));
    assert_eq!(h.listeners(), 0);
    assert!(!h.page().is_visible(Element::AutoplayHint));
    h.settle().await;
    assert_eq!(h.controller.playback_state(), PlaybackState::Playing);
}

#[tokio::test]
async fn random_track_failure_shows_banner() {
    let mut h = Harness::new();
    h.api
        .tracks
        .lock()
        .unwrap()
        .push_back(Err(ClientError::Network("Failed to get random track".into())));
    h.controller.start_flow();
    h.settle().await;

    assert!(h.page().is_visible(Element::ErrorSection));
    assert_eq!(h.page().text(Element::ErrorSection), "Failed to get random track");
    assert!(!h.page().is_visible(Element::PlayerSection));
    assert!(h.controller.current_track().is_none());

    h.controller.next_track();
    assert!(!h.page().is_visible(Element::ErrorSection));
    h.settle().await;
    assert_eq!(h.controller.current_track().map(|t| t.id.as_str()), Some("t1"));
}

#[tokio::test]
async fn broken_result_image_hides_panel() {
    let mut h = Harness::new().started().await;
    *h.api.image_result.lock().unwrap() = Some(ClientError::Network("404".into()));

    h.controller.submit_prompt("lost image");
    h.settle().await;

    assert!(h.controller.first_generation_done());
    assert!(!h.page().is_visible(Element::ResultWrapper));
    assert!(!h.page().is_visible(Element::ResultImage));
}

#[tokio::test]
async fn toggle_and_end_of_track() {
    let mut h = Harness::new().started().await;

    h.controller.toggle_play_pause();
    assert_eq!(h.controller.playback_state(), PlaybackState::Paused);
    assert_eq!(h.page().text(Element::PlayPauseButton), PAUSED_LABEL);
    assert!(!h.page().is_active(Element::PlayPauseButton));

    h.controller.toggle_play_pause();
    assert_eq!(h.controller.playback_state(), PlaybackState::Playing);
    assert!(h.page().is_active(Element::PlayPauseButton));

    {
        let mut state = h.audio.0.lock().unwrap();
        state.finished = true;
        state.playing = false;
    }
    h.controller.poll_playback();
    assert_eq!(h.controller.playback_state(), PlaybackState::Ready);
    assert!(!h.page().is_visible(Element::PlayingIndicatorStandalone));
    h.settle().await;
}

#[tokio::test]
async fn sparse_page_tolerates_missing_elements() {
    let mut h = Harness::with_page(Page::with_elements(&[Element::PromptInput]));
    h.controller.start_flow();
    h.settle().await;

    h.controller.edit_prompt(|text| text.push_str("quiet forest"));
    h.controller.submit_current_prompt();
    h.settle().await;

    assert!(h.controller.first_generation_done());
    assert!(!h.page().is_visible(Element::ResultWrapper));
    assert_eq!(h.page().text(Element::PromptInput), "");
}

#[tokio::test]
async fn previous_track_is_not_resumed_while_next_one_loads() {
    let mut h = Harness::new().started().await;
    assert_eq!(h.controller.playback_state(), PlaybackState::Playing);

    h.controller.set_track(track("t2"));
    h.controller.toggle_play_pause();
    assert_eq!(h.controller.playback_state(), PlaybackState::Loading);
    assert_eq!(h.page().text(Element::PlayPauseButton), PAUSED_LABEL);
    assert!(!h.audio.0.lock().unwrap().playing);

    h.settle().await;
    assert_eq!(h.controller.playback_state(), PlaybackState::Playing);
}

#[tokio::test]
async fn failed_audio_download_leaves_nothing_to_play() {
    let mut h = Harness::new().started().await;
    *h.api.audio_error.lock().unwrap() = Some(ClientError::Network("Failed to load audio".into()));

    h.controller.set_track(track("t2"));
    h.settle().await;
    assert_eq!(h.controller.playback_state(), PlaybackState::Idle);
    assert!(h.page().is_visible(Element::ErrorSection));

    h.controller.toggle_play_pause();
    assert_eq!(h.controller.playback_state(), PlaybackState::Idle);
    assert!(!h.audio.0.lock().unwrap().playing);
    assert!(!h.page().is_active(Element::PlayPauseButton));
}
