pub mod config;
pub mod error;
pub mod playback;
pub mod state;
pub mod util;
