//! Media model: file kinds, orientations and the destination folder table.
//!
//! This module maps file extensions to media kinds (image or video) and maps
//! a (kind, orientation) pair to one of four destination folder names.
//!
//! # Examples
//!
//! ```
//! use mediatidy::media::{MediaKind, MediaMapper};
//!
//! let mapper = MediaMapper::default();
//! assert_eq!(mapper.extension_to_kind("JPG"), Some(MediaKind::Image));
//! assert_eq!(mapper.extension_to_kind("mov"), Some(MediaKind::Video));
//! assert!(mapper.is_subtitle("srt"));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Default image extensions.
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "dng"];
/// Default video extensions.
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov"];
/// Default subtitle extensions.
pub const DEFAULT_SUBTITLE_EXTENSIONS: &[&str] = &["srt"];

/// The broad kind of a media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// Still images (JPG, PNG, DNG, ...)
    Image,
    /// Video clips (MP4, MOV, ...)
    Video,
}

impl MediaKind {
    /// Returns a lowercase label used in console output.
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

/// Visual layout of a media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

impl Orientation {
    pub fn label(&self) -> &'static str {
        match self {
            Orientation::Vertical => "vertical",
            Orientation::Horizontal => "horizontal",
        }
    }
}

/// A media file found during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// Absolute path of the file at discovery time.
    pub path: PathBuf,
    /// Lowercased extension without the leading dot.
    pub extension: String,
    /// Whether the file is an image or a video.
    pub kind: MediaKind,
}

impl MediaFile {
    /// Returns the file name for console output.
    pub fn name(&self) -> String {
        display_name(&self.path)
    }
}

/// Returns the final path component as a lossy string.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Returns the lowercased extension of a path, if any.
pub fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Maps file extensions to media kinds and recognizes subtitle files.
///
/// Lookups are case-insensitive. The default mapper covers the standard
/// image, video and subtitle extensions; configuration may replace them.
#[derive(Debug, Clone)]
pub struct MediaMapper {
    extension_map: HashMap<String, MediaKind>,
    subtitle_extensions: HashSet<String>,
}

impl MediaMapper {
    /// Creates an empty mapper.
    pub fn empty() -> Self {
        Self {
            extension_map: HashMap::new(),
            subtitle_extensions: HashSet::new(),
        }
    }

    /// Creates a mapper from explicit extension lists.
    pub fn from_lists<S: AsRef<str>>(images: &[S], videos: &[S], subtitles: &[S]) -> Self {
        let mut mapper = Self::empty();
        for ext in images {
            mapper.add_extension_mapping(ext.as_ref(), MediaKind::Image);
        }
        for ext in videos {
            mapper.add_extension_mapping(ext.as_ref(), MediaKind::Video);
        }
        for ext in subtitles {
            mapper.add_subtitle_extension(ext.as_ref());
        }
        mapper
    }

    /// Adds a file extension to kind mapping.
    pub fn add_extension_mapping(&mut self, ext: &str, kind: MediaKind) {
        self.extension_map.insert(normalize_extension(ext), kind);
    }

    /// Registers a subtitle extension.
    pub fn add_subtitle_extension(&mut self, ext: &str) {
        self.subtitle_extensions.insert(normalize_extension(ext));
    }

    /// Maps a file extension to a media kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use mediatidy::media::{MediaKind, MediaMapper};
    ///
    /// let mapper = MediaMapper::default();
    /// assert_eq!(mapper.extension_to_kind(".Mp4"), Some(MediaKind::Video));
    /// assert_eq!(mapper.extension_to_kind("gif"), None);
    /// ```
    pub fn extension_to_kind(&self, ext: &str) -> Option<MediaKind> {
        self.extension_map.get(&normalize_extension(ext)).copied()
    }

    /// Returns true if the extension belongs to a subtitle format.
    pub fn is_subtitle(&self, ext: &str) -> bool {
        self.subtitle_extensions.contains(&normalize_extension(ext))
    }

    /// Builds a `MediaFile` for a path, or `None` when its extension is not a media type.
    pub fn media_file(&self, path: &Path) -> Option<MediaFile> {
        let extension = lowercase_extension(path)?;
        let kind = self.extension_to_kind(&extension)?;
        Some(MediaFile {
            path: path.to_path_buf(),
            extension,
            kind,
        })
    }

    /// All image and video extensions.
    pub fn media_extensions(&self) -> HashSet<String> {
        self.extension_map.keys().cloned().collect()
    }

    /// All subtitle extensions.
    pub fn subtitle_extensions(&self) -> HashSet<String> {
        self.subtitle_extensions.clone()
    }
}

impl Default for MediaMapper {
    fn default() -> Self {
        Self::from_lists(
            DEFAULT_IMAGE_EXTENSIONS,
            DEFAULT_VIDEO_EXTENSIONS,
            DEFAULT_SUBTITLE_EXTENSIONS,
        )
    }
}

/// Lowercases an extension and strips a leading dot.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// The fixed (kind, orientation) to folder name table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetFolders {
    pub image_vertical: String,
    pub image_horizontal: String,
    pub video_vertical: String,
    pub video_horizontal: String,
}

impl TargetFolders {
    /// Returns the folder name for a kind and orientation.
    ///
    /// # Examples
    ///
    /// ```
    /// use mediatidy::media::{MediaKind, Orientation, TargetFolders};
    ///
    /// let folders = TargetFolders::default();
    /// assert_eq!(folders.dir_name(MediaKind::Image, Orientation::Horizontal), "img_h");
    /// assert_eq!(folders.dir_name(MediaKind::Video, Orientation::Vertical), "vid_v");
    /// ```
    pub fn dir_name(&self, kind: MediaKind, orientation: Orientation) -> &str {
        match (kind, orientation) {
            (MediaKind::Image, Orientation::Vertical) => &self.image_vertical,
            (MediaKind::Image, Orientation::Horizontal) => &self.image_horizontal,
            (MediaKind::Video, Orientation::Vertical) => &self.video_vertical,
            (MediaKind::Video, Orientation::Horizontal) => &self.video_horizontal,
        }
    }

    /// All four folder names in table order.
    pub fn all(&self) -> [&str; 4] {
        [
            &self.image_vertical,
            &self.image_horizontal,
            &self.video_vertical,
            &self.video_horizontal,
        ]
    }
}

impl Default for TargetFolders {
    fn default() -> Self {
        Self {
            image_vertical: "img_v".to_string(),
            image_horizontal: "img_h".to_string(),
            video_vertical: "vid_v".to_string(),
            video_horizontal: "vid_h".to_string(),
        }
    }
}
