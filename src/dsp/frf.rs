//! Legacy FRF text format
//!
//! A fixed header tag followed by one `frequency_Hz magnitude_dB` pair per
//! line. Blank lines and `#` comments are allowed after the header.
//!
//! ```text
//! FRF_DB_V1
//! # frequency_hz  magnitude_db
//! 50.0   -12.0
//! 1000.0   0.0
//! 8000.0  -3.5
//! ```

use std::fs;
use std::path::Path;

use crate::dsp::filter::FrequencyPoint;
use crate::error::{Result, SigweaveError};

/// Header tag on the first non-blank line of an FRF file.
pub const FRF_HEADER_TAG: &str = "FRF_DB_V1";

/// Load a frequency-response curve from a legacy FRF text file.
pub fn load_frf<P: AsRef<Path>>(path: P) -> Result<Vec<FrequencyPoint>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let display = path.display().to_string();

    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    match lines.next() {
        Some((_, header)) if header == FRF_HEADER_TAG => {}
        Some((line_no, header)) => {
            return Err(SigweaveError::FrfFormat {
                path: display,
                reason: format!("line {}: expected header '{}', got '{}'", line_no, FRF_HEADER_TAG, header),
            });
        }
        None => {
            return Err(SigweaveError::FrfFormat {
                path: display,
                reason: "file is empty".to_string(),
            });
        }
    }

    let mut curve = Vec::new();
    for (line_no, line) in lines {
        if line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let frequency = parse_field(fields.next(), &display, line_no, "frequency")?;
        let magnitude_db = parse_field(fields.next(), &display, line_no, "magnitude")?;
        if fields.next().is_some() {
            return Err(SigweaveError::FrfFormat {
                path: display,
                reason: format!("line {}: expected exactly 2 fields", line_no),
            });
        }
        curve.push(FrequencyPoint::new(frequency, magnitude_db));
    }

    Ok(curve)
}

/// Write a frequency-response curve in the legacy FRF text format.
pub fn save_frf<P: AsRef<Path>>(path: P, curve: &[FrequencyPoint]) -> Result<()> {
    let mut content = String::from(FRF_HEADER_TAG);
    content.push('\n');
    for point in curve {
        content.push_str(&format!("{} {}\n", point.frequency, point.magnitude_db));
    }
    fs::write(path, content)?;
    Ok(())
}

fn parse_field(
    field: Option<&str>,
    path: &str,
    line_no: usize,
    name: &str,
) -> Result<f64> {
    let raw = field.ok_or_else(|| SigweaveError::FrfFormat {
        path: path.to_string(),
        reason: format!("line {}: missing {} field", line_no, name),
    })?;
    raw.parse::<f64>().map_err(|_| SigweaveError::FrfFormat {
        path: path.to_string(),
        reason: format!("line {}: invalid {} '{}'", line_no, name, raw),
    })
}
