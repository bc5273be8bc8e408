//! Media dimension probing.
//!
//! Probing is delegated to external tools. Each tool is wrapped in a
//! [`Prober`]; a [`ProbeChain`] tries its probers in order and returns the
//! first usable result:
//!
//! - [`ExifToolProber`]: `exiftool -json`, reports rotation and orientation tags
//! - [`FfprobeProber`]: `ffprobe` CSV output, width and height only

mod exiftool;
mod ffprobe;
pub mod tools;

pub use exiftool::{ExifToolProber, parse_exiftool_output};
pub use ffprobe::{FfprobeProber, parse_stream_dimensions};
pub use tools::{DependencyError, ToolInfo, Toolchain, check_tool_with_arg};

use crate::media::MediaFile;
use std::path::Path;
use std::process::Command;

/// Geometry reported by a probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
    /// Rotation in signed degrees, as reported by the tool.
    pub rotation: Option<i32>,
    /// Orientation tag text, e.g. `"Horizontal (normal)"`.
    pub orientation: Option<String>,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rotation: None,
            orientation: None,
        }
    }

    pub fn with_rotation(mut self, rotation: i32) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_orientation(mut self, orientation: &str) -> Self {
        self.orientation = Some(orientation.to_string());
        self
    }
}

/// Errors produced while probing a file.
#[derive(Debug)]
pub enum ProbeError {
    /// The tool could not be started.
    Spawn {
        tool: String,
        source: std::io::Error,
    },
    /// The tool ran but exited unsuccessfully.
    ToolFailed { tool: String, reason: String },
    /// The tool output could not be parsed.
    Malformed { tool: String, reason: String },
    /// The output parsed but held no positive width and height.
    NoDimensions { tool: String },
    /// Every prober in a chain failed.
    NotAvailable { attempts: Vec<(String, String)> },
}

impl std::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spawn { tool, source } => write!(f, "could not run {}: {}", tool, source),
            Self::ToolFailed { tool, reason } => write!(f, "{} failed: {}", tool, reason),
            Self::Malformed { tool, reason } => {
                write!(f, "unreadable {} output: {}", tool, reason)
            }
            Self::NoDimensions { tool } => write!(f, "{} reported no usable dimensions", tool),
            Self::NotAvailable { attempts } => {
                if attempts.is_empty() {
                    return write!(f, "no probe available");
                }
                let details: Vec<String> = attempts
                    .iter()
                    .map(|(name, reason)| format!("{}: {}", name, reason))
                    .collect();
                write!(f, "{}", details.join("; "))
            }
        }
    }
}

impl std::error::Error for ProbeError {}

/// Result type for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// A strategy that extracts dimensions from a media file.
pub trait Prober {
    /// Short name used in skip reasons.
    fn name(&self) -> &str;

    /// Probes a media file for its dimensions.
    fn probe(&self, file: &MediaFile) -> ProbeResult<Dimensions>;
}

/// Tries each prober in order and returns the first successful result.
///
/// Failures are collected and reported together as
/// [`ProbeError::NotAvailable`] when no prober succeeds. Nothing is retried.
pub struct ProbeChain {
    probers: Vec<Box<dyn Prober>>,
}

impl ProbeChain {
    pub fn new(probers: Vec<Box<dyn Prober>>) -> Self {
        Self { probers }
    }
}

impl Prober for ProbeChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn probe(&self, file: &MediaFile) -> ProbeResult<Dimensions> {
        let mut attempts = Vec::new();

        for prober in &self.probers {
            match prober.probe(file) {
                Ok(dimensions) => return Ok(dimensions),
                Err(e) => attempts.push((prober.name().to_string(), e.to_string())),
            }
        }

        Err(ProbeError::NotAvailable { attempts })
    }
}

/// Runs an external tool on a file and returns its stdout.
fn run_tool(program: &str, args: &[&str], path: &Path) -> ProbeResult<Vec<u8>> {
    let output = Command::new(program)
        .args(args)
        .arg(path)
        .output()
        .map_err(|source| ProbeError::Spawn {
            tool: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = stderr
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| output.status.to_string());
        return Err(ProbeError::ToolFailed {
            tool: program.to_string(),
            reason,
        });
    }

    Ok(output.stdout)
}
