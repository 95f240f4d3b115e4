use crate::{
    controller::error::ClientError,
    http::model::{GenerationPage, GenerationResult, Track},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackIntent {
    /// First track of the run; reveals the player and prompt sections.
    Start,
    Next,
}

/// Results of background work, posted back to the event loop. Each carries
/// the session epoch (and request id where only the latest may apply) it was
/// started under.
#[derive(Debug, Clone)]
pub enum Event {
    TrackFetched {
        request: u64,
        intent: TrackIntent,
        result: Result<Track, ClientError>,
    },
    AudioFetched {
        epoch: u64,
        result: Result<Vec<u8>, ClientError>,
    },
    GenerationFinished {
        epoch: u64,
        request: u64,
        result: Result<GenerationResult, ClientError>,
    },
    ResultImageChecked {
        epoch: u64,
        request: u64,
        result: Result<(), ClientError>,
    },
    GalleryFetched {
        epoch: u64,
        request: u64,
        reset: bool,
        result: Result<GenerationPage, ClientError>,
    },
}
