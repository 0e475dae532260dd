//! JSON cue sheets.
//!
//! A cue sheet is a JSON array of marker definitions, the on-disk input
//! format used by the CLI simulator and by hosts that configure markers
//! from files rather than code:
//!
//! ```json
//! [
//!     { "time": 5.0, "label": "preroll" },
//!     { "time": 300.0, "label": "midroll", "adId": "br-0042" }
//! ]
//! ```
//!
//! Only `time` is required. `label` and `loader` are recognized; any other
//! fields are kept verbatim in [`CueMarker::extra`] and travel through the
//! engine opaquely, so collaborator callbacks see everything the sheet
//! author wrote.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// One marker definition from a cue sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueMarker {
    /// Timeline offset in seconds.
    pub time: f64,
    /// Optional human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Visual-subtype flag, passed through to the rendering collaborator.
    #[serde(default)]
    pub loader: bool,
    /// Everything else from the sheet, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CueMarker {
    /// Create a cue at the given offset.
    pub fn new(time: f64) -> Self {
        Self {
            time,
            label: None,
            loader: false,
            extra: serde_json::Map::new(),
        }
    }

    /// Create a labelled cue.
    pub fn with_label(time: f64, label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::new(time)
        }
    }
}

/// Errors from reading or validating a cue sheet.
#[derive(Debug, Error)]
pub enum CueSheetError {
    /// The file could not be read.
    #[error("failed to read cue sheet: {0}")]
    Io(#[from] std::io::Error),

    /// The contents are not a JSON array of cue definitions.
    #[error("failed to parse cue sheet: {0}")]
    Parse(#[from] serde_json::Error),

    /// A cue's time is negative or not finite.
    #[error("cue {index} has invalid time {time}")]
    InvalidTime { index: usize, time: f64 },
}

/// Parse and validate a cue sheet from JSON text.
pub fn parse(input: &str) -> Result<Vec<CueMarker>, CueSheetError> {
    let cues: Vec<CueMarker> = serde_json::from_str(input)?;
    for (index, cue) in cues.iter().enumerate() {
        if !cue.time.is_finite() || cue.time < 0.0 {
            return Err(CueSheetError::InvalidTime {
                index,
                time: cue.time,
            });
        }
    }
    debug!(cues = cues.len(), "cue sheet parsed");
    Ok(cues)
}

/// Read, parse, and validate a cue sheet file.
pub fn load(path: &Path) -> Result<Vec<CueMarker>, CueSheetError> {
    let contents = fs::read_to_string(path)?;
    parse(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_minimal_sheet() {
        let cues = parse(r#"[{ "time": 5 }, { "time": 30.5 }]"#).unwrap();
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].time, 5.0);
        assert_eq!(cues[1].time, 30.5);
        assert!(!cues[0].loader);
        assert!(cues[0].label.is_none());
    }

    #[test]
    fn test_parse_keeps_unknown_fields() {
        let cues = parse(
            r#"[{ "time": 300, "label": "midroll", "adId": "br-0042", "priority": 2 }]"#,
        )
        .unwrap();
        assert_eq!(cues[0].label.as_deref(), Some("midroll"));
        assert_eq!(cues[0].extra["adId"], "br-0042");
        assert_eq!(cues[0].extra["priority"], 2);
    }

    #[test]
    fn test_parse_rejects_negative_time() {
        let err = parse(r#"[{ "time": 5 }, { "time": -1 }]"#).unwrap_err();
        match err {
            CueSheetError::InvalidTime { index, time } => {
                assert_eq!(index, 1);
                assert_eq!(time, -1.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = parse(r#"{ "time": 5 }"#).unwrap_err();
        assert!(matches!(err, CueSheetError::Parse(_)));
    }

    #[test]
    fn test_load_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{ "time": 12, "loader": true }}]"#).unwrap();
        let cues = load(file.path()).unwrap();
        assert_eq!(cues.len(), 1);
        assert!(cues[0].loader);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, CueSheetError::Io(_)));
    }

    #[test]
    fn test_serialize_omits_empty_label() {
        let json = serde_json::to_string(&CueMarker::new(5.0)).unwrap();
        assert!(!json.contains("label"));
    }
}
