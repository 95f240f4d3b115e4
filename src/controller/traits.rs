use async_trait::async_trait;

use crate::{
    audio::error::AudioError,
    controller::error::ClientError,
    http::model::{GenerateRequest, GenerationPage, GenerationResult, Track},
};

/// The REST surface the controller consumes.
#[async_trait]
pub trait Api: Send + Sync {
    async fn random_track(&self) -> Result<Track, ClientError>;

    async fn generations(
        &self,
        track_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<GenerationPage, ClientError>;

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerationResult, ClientError>;

    async fn fetch_audio(&self, url: &str) -> Result<Vec<u8>, ClientError>;

    /// Succeeds when the image behind `url` can be loaded.
    async fn probe_image(&self, url: &str) -> Result<(), ClientError>;
}

pub trait AudioOutput {
    /// Replaces whatever was loaded before. Does not start playback.
    fn load(&mut self, audio: Vec<u8>) -> Result<(), AudioError>;
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self);
    fn stop(&mut self);
    fn is_paused(&self) -> bool;
    /// True once a started source has played to the end.
    fn is_finished(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Click,
    Key,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Document-level listener wiring handed to the controller.
pub trait InteractionHub {
    fn subscribe(&mut self, kinds: &[InteractionKind]) -> SubscriptionId;
    fn unsubscribe(&mut self, id: SubscriptionId);
    /// Subscriptions listening for `kind`, in subscription order.
    fn listeners(&self, kind: InteractionKind) -> Vec<SubscriptionId>;
}
