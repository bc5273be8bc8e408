//! Configuration for folder names, extensions, tools and file filtering.
//!
//! Every section is optional; missing values fall back to the built-in
//! defaults, so an empty file behaves exactly like no file at all.
//!
//! # Configuration File Format
//!
//! ```toml
//! [folders]
//! image_vertical = "img_v"
//! image_horizontal = "img_h"
//! video_vertical = "vid_v"
//! video_horizontal = "vid_h"
//!
//! [extensions]
//! images = ["jpg", "jpeg", "png", "dng"]
//! videos = ["mp4", "mov"]
//! subtitles = ["srt"]
//!
//! [tools]
//! exiftool = "exiftool"
//! ffprobe = "ffprobe"
//! ffmpeg = "ffmpeg"
//!
//! [filters]
//! enable_hidden_files = true
//!
//! [filters.exclude]
//! filenames = []
//! patterns = ["Trash/**"]
//! extensions = []
//! regex = []
//!
//! [filters.include]
//! patterns = []
//! ```

use crate::media::{
    DEFAULT_IMAGE_EXTENSIONS, DEFAULT_SUBTITLE_EXTENSIONS, DEFAULT_VIDEO_EXTENSIONS, MediaMapper,
    TargetFolders, normalize_extension,
};
use crate::probe::Toolchain;
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".mediatidyrc.toml";

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    InvalidRegexPattern { pattern: String, reason: String },
    /// A destination folder name is empty, nested or duplicated.
    InvalidFolderName { name: String, reason: String },
    /// An extension is listed under more than one file kind.
    ConflictingExtension(String),
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::InvalidFolderName { name, reason } => {
                write!(f, "Invalid folder name '{}': {}", name, reason)
            }
            ConfigError::ConflictingExtension(ext) => {
                write!(f, "Extension '{}' is listed under more than one kind", ext)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaTidyConfig {
    #[serde(default)]
    pub folders: TargetFolders,
    #[serde(default)]
    pub extensions: ExtensionRules,
    #[serde(default)]
    pub tools: Toolchain,
    #[serde(default)]
    pub filters: FilterRules,
}

/// Extension lists per file kind. Matching is case-insensitive and a
/// leading dot is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionRules {
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub subtitles: Vec<String>,
}

impl Default for ExtensionRules {
    fn default() -> Self {
        let owned = |list: &[&str]| -> Vec<String> { list.iter().map(|s| s.to_string()).collect() };
        Self {
            images: owned(DEFAULT_IMAGE_EXTENSIONS),
            videos: owned(DEFAULT_VIDEO_EXTENSIONS),
            subtitles: owned(DEFAULT_SUBTITLE_EXTENSIONS),
        }
    }
}

/// Rules deciding which discovered files are considered at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether files whose name starts with "." are considered. Defaults to true.
    #[serde(default = "default_enable_hidden_files")]
    pub enable_hidden_files: bool,

    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Whitelist that overrides every exclude rule.
    #[serde(default)]
    pub include: IncludeRules,
}

fn default_enable_hidden_files() -> bool {
    true
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            enable_hidden_files: default_enable_hidden_files(),
            exclude: ExcludeRules::default(),
            include: IncludeRules::default(),
        }
    }
}

/// Rules for excluding files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact file names, e.g. "cover.jpg".
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the path relative to the root, e.g. "Trash/**".
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Extensions, e.g. "dng".
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regexes matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Rules for including files, overriding exclude rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Validated configuration ready for a run.
#[derive(Debug)]
pub struct CompiledConfig {
    pub folders: TargetFolders,
    pub mapper: MediaMapper,
    pub toolchain: Toolchain,
    pub filters: CompiledFilters,
}

impl MediaTidyConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.mediatidyrc.toml` in the current directory
    /// 3. Look for `~/.config/mediatidy/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot be read,
    /// or if any discovered file is not valid TOML.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("mediatidy")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Validate the configuration and compile its filters.
    ///
    /// # Errors
    ///
    /// Returns an error for bad folder names, extensions claimed by more than
    /// one kind, an empty media extension list, or invalid patterns.
    pub fn compile(self) -> Result<CompiledConfig, ConfigError> {
        validate_folders(&self.folders)?;
        let mapper = build_mapper(&self.extensions)?;
        let filters = CompiledFilters::new(self.filters)?;

        Ok(CompiledConfig {
            folders: self.folders,
            mapper,
            toolchain: self.tools,
            filters,
        })
    }
}

fn validate_folders(folders: &TargetFolders) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for name in folders.all() {
        let invalid = |reason: &str| ConfigError::InvalidFolderName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if name.trim().is_empty() {
            return Err(invalid("must not be empty"));
        }
        if name == "." || name == ".." || name.contains('/') || name.contains('\\') {
            return Err(invalid("must be a single directory name"));
        }
        if !seen.insert(name) {
            return Err(invalid("used for more than one orientation"));
        }
    }

    Ok(())
}

fn build_mapper(rules: &ExtensionRules) -> Result<MediaMapper, ConfigError> {
    let mut seen = HashSet::new();

    for ext in rules
        .images
        .iter()
        .chain(&rules.videos)
        .chain(&rules.subtitles)
    {
        let normalized = normalize_extension(ext);
        if normalized.is_empty() {
            return Err(ConfigError::ConfigInvalid(
                "extensions must not be empty".to_string(),
            ));
        }
        if !seen.insert(normalized.clone()) {
            return Err(ConfigError::ConflictingExtension(normalized));
        }
    }

    if rules.images.is_empty() && rules.videos.is_empty() {
        return Err(ConfigError::ConfigInvalid(
            "at least one image or video extension is required".to_string(),
        ));
    }

    Ok(MediaMapper::from_lists(
        &rules.images,
        &rules.videos,
        &rules.subtitles,
    ))
}

/// Compiled filter structures for file matching.
///
/// Paths given to [`CompiledFilters::should_include`] are relative to the
/// directory being organized.
#[derive(Debug)]
pub struct CompiledFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl CompiledFilters {
    fn new(rules: FilterRules) -> Result<Self, ConfigError> {
        let compile_globs = |patterns: &[String]| {
            patterns
                .iter()
                .map(|pattern| {
                    Pattern::new(pattern)
                        .map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
                })
                .collect::<Result<Vec<_>, _>>()
        };

        let exclude_patterns = compile_globs(&rules.exclude.patterns[..])?;
        let include_patterns = compile_globs(&rules.include.patterns[..])?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            exclude_filenames: rules.exclude.filenames.into_iter().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| normalize_extension(ext))
                .collect(),
            exclude_patterns,
            exclude_regexes,
            include_patterns,
        })
    }

    /// A filter set that lets every file through.
    pub fn allow_all() -> Self {
        Self {
            enable_hidden_files: true,
            exclude_filenames: HashSet::new(),
            exclude_extensions: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
            include_patterns: Vec::new(),
        }
    }

    /// Check if a file should be considered.
    ///
    /// Checks are performed in this order, with early termination:
    /// 1. Include patterns - if matched, always include
    /// 2. Hidden file filter - if hidden and disabled, exclude
    /// 3. Exact filename match - if matched, exclude
    /// 4. File extension match - if matched, exclude
    /// 5. Glob pattern match - if matched, exclude
    /// 6. Regex pattern match - if matched, exclude
    /// 7. Default: include
    pub fn should_include(&self, relative_path: &Path) -> bool {
        let file_name = relative_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self
            .include_patterns
            .iter()
            .any(|pattern| pattern.matches_path(relative_path))
        {
            return true;
        }

        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = relative_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches_path(relative_path))
        {
            return false;
        }

        !self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&file_name))
    }
}

impl Default for CompiledFilters {
    fn default() -> Self {
        Self::allow_all()
    }
}
