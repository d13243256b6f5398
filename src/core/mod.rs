//! Pure timing logic: frame quantization and playback-position resolution.

pub mod frame_clock;
pub mod playback;
