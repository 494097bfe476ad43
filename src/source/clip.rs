//! Audio clip source
//!
//! Replays a WAV file as a track source. The clip's sampling rate must
//! match the rate requested of the track; the engine does not resample.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, SigweaveError};
use crate::signal::buffer::rates_match;
use crate::signal::{io, Signal};

/// WAV clip replay. Multi-channel clips are averaged to mono on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioClipSource {
    pub path: PathBuf,
}

impl AudioClipSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let source = Self { path: path.into() };
        source.validate()?;
        Ok(source)
    }

    /// Path checks happen at generation time; a record may legitimately
    /// reference a clip that is not present while the project is edited.
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(SigweaveError::InvalidParameter {
                param: "path".to_string(),
                value: String::new(),
                expected: "non-empty clip path".to_string(),
            });
        }
        Ok(())
    }

    pub fn generate(&self, sample_rate: f64) -> Result<Signal> {
        self.validate()?;

        let signal = io::load_wav(&self.path)?;
        if !rates_match(signal.sample_rate(), sample_rate) {
            return Err(SigweaveError::SampleRateMismatch {
                expected_hz: sample_rate,
                actual_hz: signal.sample_rate(),
            });
        }
        Ok(signal)
    }
}
