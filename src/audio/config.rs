#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub volume: u8,
    pub buffer_frames: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: 100,
            buffer_frames: 4096,
        }
    }
}

impl AudioConfig {
    pub fn with_volume(volume: u8) -> Self {
        Self {
            volume,
            ..Self::default()
        }
    }

    pub fn gain(&self) -> f32 {
        f32::from(self.volume.min(100)) / 100.0
    }
}
