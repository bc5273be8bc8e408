//! mediatidy - sort photos and videos by orientation
//!
//! This library probes image and video files with exiftool (falling back to
//! ffprobe), classifies them as vertical or horizontal, and moves them into
//! one of four folders under the organized directory. Subtitle files can
//! then follow the media file whose name they share.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod media;
pub mod organizer;
pub mod orientation;
pub mod output;
pub mod probe;
pub mod prompt;
pub mod subtitles;

pub use catalog::{CatalogError, FileCatalog};
pub use config::{CompiledConfig, ConfigError, MediaTidyConfig};
pub use media::{MediaFile, MediaKind, MediaMapper, Orientation, TargetFolders};
pub use organizer::{MediaOrganizer, OrganizeError, OrganizeReport};
pub use orientation::classify;
pub use probe::{Dimensions, ProbeChain, ProbeError, Prober, Toolchain};
pub use prompt::{ConsolePrompter, Prompter, ScriptedPrompter};
pub use subtitles::{RelocateReport, SubtitleMatcher};

pub use cli::{RunSummary, run_cli, run_with_prober};
