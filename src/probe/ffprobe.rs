//! FFprobe-based fallback probing.

use super::{Dimensions, ProbeError, ProbeResult, Prober, run_tool};
use crate::media::{MediaFile, MediaKind};

const VIDEO_ARGS: &[&str] = &[
    "-v",
    "error",
    "-select_streams",
    "v:0",
    "-show_entries",
    "stream=width,height",
    "-of",
    "csv=p=0",
];

const IMAGE_ARGS: &[&str] = &[
    "-v",
    "error",
    "-show_entries",
    "stream=width,height",
    "-of",
    "csv=p=0",
];

/// Fallback prober: reads stream width and height from ffprobe.
///
/// Videos select the first video stream; images read whatever stream
/// ffprobe lists first.
pub struct FfprobeProber {
    program: String,
}

impl FfprobeProber {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args_for(kind: MediaKind) -> &'static [&'static str] {
        match kind {
            MediaKind::Video => VIDEO_ARGS,
            MediaKind::Image => IMAGE_ARGS,
        }
    }
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl Prober for FfprobeProber {
    fn name(&self) -> &str {
        "ffprobe"
    }

    fn probe(&self, file: &MediaFile) -> ProbeResult<Dimensions> {
        let stdout = run_tool(&self.program, Self::args_for(file.kind), &file.path)?;
        parse_stream_dimensions(&stdout)
    }
}

/// Parses a `width,height` CSV line as printed by ffprobe.
///
/// Only the first non-empty line is considered and only its two leading
/// fields are read; both must be positive integers.
///
/// # Examples
///
/// ```
/// use mediatidy::probe::parse_stream_dimensions;
///
/// let dims = parse_stream_dimensions(b"800,600\n").unwrap();
/// assert_eq!((dims.width, dims.height), (800, 600));
/// ```
pub fn parse_stream_dimensions(stdout: &[u8]) -> ProbeResult<Dimensions> {
    let text = String::from_utf8_lossy(stdout);
    let line = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| ProbeError::NoDimensions {
            tool: "ffprobe".to_string(),
        })?;

    let mut fields = line.split(',').map(str::trim);
    let width = fields.next().and_then(parse_positive);
    let height = fields.next().and_then(parse_positive);

    match (width, height) {
        (Some(width), Some(height)) => Ok(Dimensions::new(width, height)),
        _ => Err(ProbeError::Malformed {
            tool: "ffprobe".to_string(),
            reason: format!("expected 'width,height', got '{}'", line),
        }),
    }
}

fn parse_positive(field: &str) -> Option<u32> {
    field.parse::<u32>().ok().filter(|n| *n > 0)
}
