//! Frame selection and per-frame timing.

pub mod sampler;
pub mod schedule;
