//! ExifTool-based probing.

use super::{Dimensions, ProbeError, ProbeResult, Prober, run_tool};
use crate::media::MediaFile;
use serde::Deserialize;
use serde_json::Value;

const EXIFTOOL_ARGS: &[&str] = &[
    "-json",
    "-ImageWidth",
    "-ImageHeight",
    "-Rotation",
    "-Orientation",
];

/// One element of exiftool's JSON array. Values are kept loose because
/// exiftool prints numbers or strings depending on the tag and file format.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ExifRecord {
    image_width: Option<Value>,
    image_height: Option<Value>,
    rotation: Option<Value>,
    orientation: Option<Value>,
}

/// Primary prober: asks exiftool for width, height, rotation and orientation.
pub struct ExifToolProber {
    program: String,
}

impl ExifToolProber {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ExifToolProber {
    fn default() -> Self {
        Self::new("exiftool")
    }
}

impl Prober for ExifToolProber {
    fn name(&self) -> &str {
        "exiftool"
    }

    fn probe(&self, file: &MediaFile) -> ProbeResult<Dimensions> {
        let stdout = run_tool(&self.program, EXIFTOOL_ARGS, &file.path)?;
        parse_exiftool_output(&stdout)
    }
}

/// Parses `exiftool -json` output into dimensions.
///
/// Width and height must both be positive. Rotation and orientation are
/// passed through when present.
///
/// # Examples
///
/// ```
/// use mediatidy::probe::parse_exiftool_output;
///
/// let json = br#"[{"SourceFile": "a.mov", "ImageWidth": 1920, "ImageHeight": 1080, "Rotation": 90}]"#;
/// let dims = parse_exiftool_output(json).unwrap();
/// assert_eq!((dims.width, dims.height, dims.rotation), (1920, 1080, Some(90)));
/// ```
pub fn parse_exiftool_output(stdout: &[u8]) -> ProbeResult<Dimensions> {
    let records: Vec<ExifRecord> =
        serde_json::from_slice(stdout).map_err(|e| ProbeError::Malformed {
            tool: "exiftool".to_string(),
            reason: e.to_string(),
        })?;

    let record = records
        .into_iter()
        .next()
        .ok_or_else(|| ProbeError::Malformed {
            tool: "exiftool".to_string(),
            reason: "empty result array".to_string(),
        })?;

    let width = record.image_width.as_ref().and_then(positive_dimension);
    let height = record.image_height.as_ref().and_then(positive_dimension);

    match (width, height) {
        (Some(width), Some(height)) => Ok(Dimensions {
            width,
            height,
            rotation: record.rotation.as_ref().and_then(rotation_degrees),
            orientation: record.orientation.as_ref().and_then(orientation_tag),
        }),
        _ => Err(ProbeError::NoDimensions {
            tool: "exiftool".to_string(),
        }),
    }
}

fn positive_dimension(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f > 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    u32::try_from(n).ok().filter(|n| *n > 0)
}

fn rotation_degrees(value: &Value) -> Option<i32> {
    let degrees = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    if !degrees.is_finite() {
        return None;
    }
    // A small non-zero rotation must not collapse to zero.
    let rounded = match degrees.round() {
        r if r == 0.0 && degrees != 0.0 => degrees.signum(),
        r => r,
    };
    Some(rounded as i32)
}

fn orientation_tag(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
