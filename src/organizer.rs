//! Moving media files into orientation folders.
//!
//! [`MediaOrganizer`] walks the root, probes each media file, classifies its
//! orientation and moves it into one of the four target folders directly
//! under the root. Per-file problems are reported and counted as skips; only
//! an unreadable root or subtree stops the run.

use crate::catalog::{CatalogError, FileCatalog};
use crate::config::CompiledConfig;
use crate::media::display_name;
use crate::orientation::classify;
use crate::output::OutputFormatter;
use crate::probe::Prober;
use crate::prompt::Prompter;
use std::fs;
use std::path::{Path, PathBuf};

/// Record of a single file placed into a folder.
#[derive(Debug, Clone)]
pub struct MoveRecord {
    pub original_path: PathBuf,
    pub new_path: PathBuf,
    /// Name of the folder the file now lives in.
    pub folder: String,
    /// True when the file was already at its destination and nothing moved.
    pub already_in_place: bool,
}

/// Errors that can occur while organizing.
#[derive(Debug)]
pub enum OrganizeError {
    /// The root directory is missing or unusable.
    InvalidBasePath {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create a target folder.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move a file to its destination.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
    /// Enumeration failed.
    Catalog(CatalogError),
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBasePath { path, source } => {
                write!(f, "Invalid base path {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::Catalog(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for OrganizeError {}

impl From<CatalogError> for OrganizeError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

/// Result type for organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Counts from one organize pass.
#[derive(Debug, Default)]
pub struct OrganizeReport {
    /// Files moved, or found already in their target folder.
    pub processed: usize,
    /// Files left where they were, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
}

impl OrganizeReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    fn skip(&mut self, path: &Path, reason: impl Into<String>) {
        self.skipped.push((path.to_path_buf(), reason.into()));
    }
}

/// Moves a file into `folder_name` under `base_path`, keeping its file name.
///
/// The folder is created if needed. Moving a file onto its own current
/// location is a no-op reported through [`MoveRecord::already_in_place`].
///
/// # Examples
///
/// ```no_run
/// use mediatidy::organizer::move_into_folder;
/// use std::path::Path;
///
/// let record = move_into_folder(
///     Path::new("/photos"),
///     Path::new("/photos/trip/IMG_0001.JPG"),
///     "img_h",
/// );
/// match record {
///     Ok(r) => println!("Now at {}", r.new_path.display()),
///     Err(e) => eprintln!("{}", e),
/// }
/// ```
pub fn move_into_folder(
    base_path: &Path,
    file_path: &Path,
    folder_name: &str,
) -> OrganizeResult<MoveRecord> {
    if !base_path.is_dir() {
        return Err(OrganizeError::InvalidBasePath {
            path: base_path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "base path does not exist or is not a directory",
            ),
        });
    }

    let folder_path = base_path.join(folder_name);
    fs::create_dir_all(&folder_path).map_err(|e| OrganizeError::DirectoryCreationFailed {
        path: folder_path.clone(),
        source: e,
    })?;

    let file_name = file_path
        .file_name()
        .ok_or_else(|| OrganizeError::FileMoveFailure {
            source: file_path.to_path_buf(),
            destination: folder_path.clone(),
            source_error: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "file has no name component",
            ),
        })?;
    let destination = folder_path.join(file_name);

    let already_in_place = same_location(file_path, &destination);
    if !already_in_place {
        rename_file(file_path, &destination)?;
    }

    Ok(MoveRecord {
        original_path: file_path.to_path_buf(),
        new_path: destination,
        folder: folder_name.to_string(),
        already_in_place,
    })
}

/// Renames `source` to `destination`. An existing destination file is
/// replaced as `fs::rename` does on the platform.
pub fn rename_file(source: &Path, destination: &Path) -> OrganizeResult<()> {
    fs::rename(source, destination).map_err(|e| OrganizeError::FileMoveFailure {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
        source_error: e,
    })
}

/// True when both paths name the same existing file.
pub(crate) fn same_location(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Sorts the media files under one root into orientation folders.
pub struct MediaOrganizer<'a> {
    root: &'a Path,
    config: &'a CompiledConfig,
    prober: &'a dyn Prober,
}

impl<'a> MediaOrganizer<'a> {
    pub fn new(root: &'a Path, config: &'a CompiledConfig, prober: &'a dyn Prober) -> Self {
        Self {
            root,
            config,
            prober,
        }
    }

    /// Runs one organize pass over every media file under the root.
    ///
    /// Batch mode is asked once before the first file. Without it each file
    /// is confirmed individually; a declined file is never probed.
    ///
    /// # Errors
    ///
    /// Returns an error only when the tree cannot be enumerated.
    pub fn organize(&self, prompter: &mut dyn Prompter) -> OrganizeResult<OrganizeReport> {
        let files = FileCatalog::new(&self.config.filters)
            .enumerate(self.root, &self.config.mapper.media_extensions())?;

        OutputFormatter::info(&format!("Found {} media files.", files.len()));

        let mut report = OrganizeReport::default();
        let batch = prompter.confirm_batch_mode();

        if batch {
            let pb = OutputFormatter::create_progress_bar(files.len() as u64);
            for path in &files {
                pb.suspend(|| self.process_file(path, true, &mut *prompter, &mut report));
                pb.inc(1);
            }
            pb.finish_and_clear();
        } else {
            for path in &files {
                self.process_file(path, false, prompter, &mut report);
            }
        }

        Ok(report)
    }

    fn process_file(
        &self,
        path: &Path,
        batch: bool,
        prompter: &mut dyn Prompter,
        report: &mut OrganizeReport,
    ) {
        let name = display_name(path);

        let Some(file) = self.config.mapper.media_file(path) else {
            OutputFormatter::warning(&format!("Skipping unsupported file: {}", name));
            return;
        };

        if !batch && !prompter.confirm(&format!("Process {}? (y/n): ", name)) {
            OutputFormatter::plain(&format!("Skipped: {}", name));
            report.skip(path, "declined");
            return;
        }

        let dimensions = match self.prober.probe(&file) {
            Ok(dimensions) => dimensions,
            Err(e) => {
                OutputFormatter::warning(&format!(
                    "Could not process {} - failed to get dimensions ({})",
                    name, e
                ));
                report.skip(path, format!("failed to get dimensions: {}", e));
                return;
            }
        };

        let orientation = classify(&dimensions);
        let folder = self.config.folders.dir_name(file.kind, orientation);

        match move_into_folder(self.root, &file.path, folder) {
            Ok(record) if record.already_in_place => {
                OutputFormatter::plain(&format!("{} is already in {}", name, folder));
                report.processed += 1;
            }
            Ok(_) => {
                OutputFormatter::success(&format!(
                    "Moved {} to {} ({} {}, {}x{})",
                    name,
                    folder,
                    orientation.label(),
                    file.kind.label(),
                    dimensions.width,
                    dimensions.height
                ));
                report.processed += 1;
            }
            Err(e) => {
                OutputFormatter::error(&format!("Error moving {}: {}", name, e));
                report.skip(path, e.to_string());
            }
        }
    }
}
