use std::{io::Cursor, sync::Arc};

use rodio::{Decoder, OutputStream, Sink};
use tracing::{debug, info};

use crate::{
    audio::{config::AudioConfig, error::AudioError, util::open_output_stream},
    controller::traits::AudioOutput,
};

/// rodio-backed output. The device is opened on the first `play`, so a
/// missing or busy device shows up as a refused start rather than a
/// construction failure.
pub struct PlaybackEngine {
    config: AudioConfig,
    stream: Option<OutputStream>,
    sink: Option<Sink>,
    audio: Option<Arc<[u8]>>,
}

impl PlaybackEngine {
    pub fn new(config: AudioConfig) -> Self {
        Self {
            config,
            stream: None,
            sink: None,
            audio: None,
        }
    }

    fn decode(audio: &Arc<[u8]>) -> Result<Decoder<Cursor<Arc<[u8]>>>, AudioError> {
        Decoder::new(Cursor::new(audio.clone()))
            .map_err(|e| AudioError::DecodingError(e.to_string()))
    }
}

impl AudioOutput for PlaybackEngine {
    fn load(&mut self, audio: Vec<u8>) -> Result<(), AudioError> {
        self.stop();
        let audio: Arc<[u8]> = audio.into();
        Self::decode(&audio)?;
        debug!(bytes = audio.len(), "playback_source_loaded");
        self.audio = Some(audio);
        Ok(())
    }

    fn play(&mut self) -> Result<(), AudioError> {
        let audio = self.audio.clone().ok_or(AudioError::NothingLoaded)?;
        let stream = match self.stream.take() {
            Some(stream) => stream,
            None => {
                let stream = open_output_stream(self.config.buffer_frames)?;
                info!("playback_device_opened");
                stream
            }
        };
        let stream = self.stream.insert(stream);

        if self.sink.as_ref().is_none_or(Sink::empty) {
            let sink = Sink::connect_new(stream.mixer());
            sink.set_volume(self.config.gain());
            sink.append(Self::decode(&audio)?);
            self.sink = Some(sink);
        }

        if let Some(sink) = &self.sink {
            sink.play();
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.audio = None;
    }

    fn is_paused(&self) -> bool {
        self.sink
            .as_ref()
            .is_none_or(|sink| sink.is_paused() || sink.empty())
    }

    fn is_finished(&self) -> bool {
        self.sink.as_ref().is_some_and(Sink::empty)
    }
}
