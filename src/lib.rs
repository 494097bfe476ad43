//! Sigweave - Signal-Synthesis Composition Engine
//!
//! Sigweave builds acoustic test signals from tracks: each track chains one
//! source generator, an optional digital filter, and a scalar gain, and a
//! composer sums the tracks into one output signal.
//!
//! # Architecture
//!
//! - `signal`: the mono sample buffer and WAV I/O
//! - `dsp`: the filter model (coefficients ↔ frequency response) and the
//!   minimum-phase design primitives behind it
//! - `source`: the six generator variants (spectrum, noise, harmonics,
//!   audio clip, and their profile-controlled forms)
//! - `track` / `composer`: the generation chain and its aggregate
//! - `project`: the JSON persistence schema

pub mod cli;
pub mod composer;
pub mod dsp;
pub mod error;
pub mod project;
pub mod signal;
pub mod source;
pub mod track;

// Re-export commonly used types
pub use composer::Composer;
pub use dsp::{FilterDesign, FilterModel, FrequencyPoint};
pub use error::{Result, SigweaveError};
pub use signal::Signal;
pub use source::Source;
pub use track::Track;
