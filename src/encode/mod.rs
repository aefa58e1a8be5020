//! Handoff to the external encoder.
//!
//! The manifest pairs each frame asset with its duration; the encoder muxes it with the audio
//! track into the final file.

/// `ffmpeg`-based encoder (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Concat edit list construction and serialization.
pub mod manifest;
/// Encoder trait and job description.
pub mod sink;
