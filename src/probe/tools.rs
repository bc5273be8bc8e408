//! External tool detection and the dependency preflight.

use super::{ExifToolProber, FfprobeProber, ProbeChain};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Command;

/// Information about an external tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Program name as invoked.
    pub name: String,
    /// Whether the version query succeeded.
    pub available: bool,
    /// First line of the version output.
    pub version: Option<String>,
    /// Resolved executable path, when found on `PATH`.
    pub path: Option<PathBuf>,
}

/// Checks a tool by running it with a version argument.
///
/// # Example
///
/// ```no_run
/// use mediatidy::probe::check_tool_with_arg;
///
/// let info = check_tool_with_arg("exiftool", "-ver");
/// if info.available {
///     println!("exiftool version: {:?}", info.version);
/// }
/// ```
pub fn check_tool_with_arg(name: &str, version_arg: &str) -> ToolInfo {
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => ToolInfo {
            name: name.to_string(),
            available: true,
            version: String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|s| s.trim().to_string()),
            path: which::which(name).ok(),
        },
        _ => ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        },
    }
}

/// Raised when the preflight finds a required tool missing or broken.
#[derive(Debug, Clone)]
pub enum DependencyError {
    Missing { tools: Vec<String> },
}

impl std::fmt::Display for DependencyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing { tools } => write!(
                f,
                "Required dependencies not found ({}). Please install ffmpeg, ffprobe, and exiftool.",
                tools.join(", ")
            ),
        }
    }
}

impl std::error::Error for DependencyError {}

/// The external programs used for probing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Toolchain {
    pub exiftool: String,
    pub ffprobe: String,
    pub ffmpeg: String,
}

impl Toolchain {
    /// Verifies every tool answers its version query.
    ///
    /// All tools are checked so the error names each missing one.
    pub fn preflight(&self) -> Result<Vec<ToolInfo>, DependencyError> {
        let infos = vec![
            check_tool_with_arg(&self.ffmpeg, "-version"),
            check_tool_with_arg(&self.ffprobe, "-version"),
            check_tool_with_arg(&self.exiftool, "-ver"),
        ];

        let missing: Vec<String> = infos
            .iter()
            .filter(|info| !info.available)
            .map(|info| info.name.clone())
            .collect();

        if missing.is_empty() {
            Ok(infos)
        } else {
            Err(DependencyError::Missing { tools: missing })
        }
    }

    /// Builds the exiftool-then-ffprobe probe chain.
    pub fn prober(&self) -> ProbeChain {
        ProbeChain::new(vec![
            Box::new(ExifToolProber::new(self.exiftool.clone())),
            Box::new(FfprobeProber::new(self.ffprobe.clone())),
        ])
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            exiftool: "exiftool".to_string(),
            ffprobe: "ffprobe".to_string(),
            ffmpeg: "ffmpeg".to_string(),
        }
    }
}
