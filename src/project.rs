//! Project persistence schema
//!
//! Defines the project JSON document: a named, timestamped list of track
//! records. The source of each record is an integer tag plus two opaque
//! parameter/control blobs; the filter block stores the magnitude curve and
//! the rate it was designed for (coefficients are re-derived on load).

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dsp::filter::FrequencyPoint;
use crate::error::{Result, SigweaveError};

/// Schema version written to new project files.
pub const CURRENT_SCHEMA_VERSION: &str = "1.0";

/// Top-level project document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Schema version for migration support.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Project name.
    pub name: String,

    /// Timestamp when the project was created.
    pub created_at: DateTime<Utc>,

    /// Timestamp of last save.
    pub modified_at: DateTime<Utc>,

    /// Ordered list of track records.
    #[serde(default)]
    pub tracks: Vec<TrackRecord>,
}

fn default_schema_version() -> String {
    CURRENT_SCHEMA_VERSION.to_string()
}

/// One track in the project document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Display name.
    pub name: String,

    /// Gain in dB.
    pub gain_db: f64,

    /// Integer tag selecting the source variant; `None` when the track has
    /// no source assigned yet.
    pub source_type: Option<u32>,

    /// Variant-specific parameters (opaque to the schema).
    #[serde(default)]
    pub source_parameters: Value,

    /// Variant-specific control profiles; `Null` for stationary variants.
    #[serde(default)]
    pub source_control: Value,

    /// Filter block, absent when the track has no filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterRecord>,
}

/// Persisted filter state: the magnitude curve plus its design rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRecord {
    /// Sampling frequency the filter was designed for.
    pub sampling_frequency: f64,

    /// Frequency-response magnitude curve (empty for a cleared filter).
    #[serde(default)]
    pub response: Vec<FrequencyPoint>,
}

impl ProjectFile {
    /// Load a project document from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SigweaveError::ProjectNotFound {
                path: path.display().to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save the project document to disk as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
