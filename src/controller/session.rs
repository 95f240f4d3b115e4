use crate::{
    audio::state::PlaybackState, controller::gallery::GalleryPager, http::model::Track,
};

/// Per-track state. Replaced as a whole on every track switch; `epoch`
/// identifies which switch a pending response belongs to.
#[derive(Debug, Default)]
pub struct Session {
    epoch: u64,
    current_track: Option<Track>,
    first_generation_done: bool,
    generation_in_flight: Option<u64>,
    pub gallery: GalleryPager,
    pub playback: PlaybackState,
}

impl Session {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.current_track.is_some() && self.epoch == epoch
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    pub fn first_generation_done(&self) -> bool {
        self.first_generation_done
    }

    /// Starts a new session for `track` and returns its epoch.
    pub fn replace(&mut self, track: Track) -> u64 {
        self.epoch += 1;
        self.current_track = Some(track);
        self.first_generation_done = false;
        self.generation_in_flight = None;
        self.gallery.reset();
        self.playback = PlaybackState::Loading;
        self.epoch
    }

    pub fn mark_first_generation(&mut self) {
        self.first_generation_done = true;
    }

    pub fn generation_in_flight(&self) -> Option<u64> {
        self.generation_in_flight
    }

    pub fn begin_generation(&mut self, request: u64) {
        self.generation_in_flight = Some(request);
    }

    /// Releases the in-flight slot if `request` holds it.
    pub fn finish_generation(&mut self, request: u64) -> bool {
        if self.generation_in_flight == Some(request) {
            self.generation_in_flight = None;
            true
        } else {
            false
        }
    }
}
