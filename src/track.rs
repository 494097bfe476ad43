//! Track
//!
//! One signal-generation chain: a source, an optional filter, and a scalar
//! gain. Processing generates the source at the requested rate, filters,
//! applies gain, and caches the result until a setter invalidates it.

use log::warn;

use crate::dsp::FilterModel;
use crate::error::{Result, SigweaveError};
use crate::project::{FilterRecord, TrackRecord};
use crate::signal::buffer::rates_match;
use crate::signal::Signal;
use crate::source::Source;

/// Source → filter → gain chain.
///
/// # Example
/// ```
/// use sigweave::source::{HarmonicsSource, Source};
/// use sigweave::track::Track;
///
/// let mut track = Track::new("order 2");
/// track.set_source(Source::Harmonics(
///     HarmonicsSource::new(120.0, vec![0.0, -6.0], 1.0).unwrap(),
/// ));
/// track.set_gain_db(-3.0);
/// track.process(48000.0).unwrap();
/// assert!(track.output().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Track {
    name: String,
    gain_db: f64,
    source: Option<Source>,
    filter: Option<FilterModel>,
    output: Option<Signal>,
}

impl Track {
    /// Create an empty track.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gain_db: 0.0,
            source: None,
            filter: None,
            output: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn gain_db(&self) -> f64 {
        self.gain_db
    }

    /// Set the gain in dB. Invalidates any cached output.
    pub fn set_gain_db(&mut self, gain_db: f64) {
        self.gain_db = gain_db;
        self.output = None;
    }

    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    /// Assign the source. Invalidates any cached output.
    pub fn set_source(&mut self, source: Source) {
        self.source = Some(source);
        self.output = None;
    }

    pub fn clear_source(&mut self) {
        self.source = None;
        self.output = None;
    }

    pub fn filter(&self) -> Option<&FilterModel> {
        self.filter.as_ref()
    }

    /// Assign the filter. Invalidates any cached output.
    pub fn set_filter(&mut self, filter: FilterModel) {
        self.filter = Some(filter);
        self.output = None;
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
        self.output = None;
    }

    /// Generate the track's signal at `sample_rate`.
    ///
    /// The filter's design rate is checked against `sample_rate` (one
    /// decimal place) before anything is generated, so a misconfigured
    /// track fails without doing work.
    pub fn process(&mut self, sample_rate: f64) -> Result<()> {
        let source = self.source.as_ref().ok_or_else(|| SigweaveError::MissingSource {
            track: self.name.clone(),
        })?;
        if let Some(filter) = &self.filter {
            if !rates_match(filter.sample_rate(), sample_rate) {
                return Err(SigweaveError::SampleRateMismatch {
                    expected_hz: filter.sample_rate(),
                    actual_hz: sample_rate,
                });
            }
        }

        let mut signal = source.generate(sample_rate)?;
        if let Some(filter) = &self.filter {
            signal = filter.filter(&signal)?;
        }
        if self.gain_db != 0.0 {
            signal.apply_gain_db(self.gain_db);
        }
        self.output = Some(signal);
        Ok(())
    }

    /// The generated signal, `None` (with a warning) before `process`.
    pub fn output(&self) -> Option<&Signal> {
        if self.output.is_none() {
            warn!("track '{}' has not been processed yet", self.name);
        }
        self.output.as_ref()
    }

    /// The generated samples, `None` (with a warning) before `process`.
    pub fn output_samples(&self) -> Option<&[f64]> {
        self.output().map(|signal| signal.samples())
    }

    /// Map the track to its persistence record.
    pub fn to_record(&self) -> Result<TrackRecord> {
        let (source_type, source_parameters, source_control) = match &self.source {
            Some(source) => {
                let (tag, params, control) = source.to_parts()?;
                (Some(tag), params, control)
            }
            None => (None, serde_json::Value::Null, serde_json::Value::Null),
        };
        let filter = self.filter.as_ref().map(|filter| FilterRecord {
            sampling_frequency: filter.sample_rate(),
            response: filter
                .frequency_response()
                .map(|curve| curve.to_vec())
                .unwrap_or_default(),
        });

        Ok(TrackRecord {
            name: self.name.clone(),
            gain_db: self.gain_db,
            source_type,
            source_parameters,
            source_control,
            filter,
        })
    }

    /// Rebuild a track from its persistence record.
    ///
    /// A filter is reconstructed from its stored magnitude curve; the
    /// coefficients are re-derived by the minimum-phase design.
    pub fn from_record(record: &TrackRecord) -> Result<Self> {
        let mut track = Track::new(record.name.clone());
        track.gain_db = record.gain_db;
        if let Some(tag) = record.source_type {
            track.source = Some(Source::from_parts(
                tag,
                &record.source_parameters,
                &record.source_control,
            )?);
        }
        if let Some(filter_record) = &record.filter {
            track.filter = Some(FilterModel::from_frequency_response(
                filter_record.response.clone(),
                filter_record.sampling_frequency,
            )?);
        }
        Ok(track)
    }
}

// ============================================================================
// Tests
// ============================================================================
