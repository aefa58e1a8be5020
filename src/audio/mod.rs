//! Sonification: value-to-pitch tones and their concatenation into one track.

pub mod tone;
pub mod track;
