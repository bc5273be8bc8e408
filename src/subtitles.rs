//! Moving subtitle files next to the media they belong to.
//!
//! A subtitle belongs to a media file when both have the same file stem,
//! compared exactly (`trip.srt` matches `trip.mp4`, not `Trip.mp4`). When
//! several media files share that stem, the first one in catalog order wins.

use crate::catalog::FileCatalog;
use crate::config::CompiledConfig;
use crate::media::display_name;
use crate::organizer::{OrganizeResult, rename_file, same_location};
use crate::output::OutputFormatter;
use crate::prompt::Prompter;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Counts from one subtitle pass.
#[derive(Debug, Default)]
pub struct RelocateReport {
    pub moved: usize,
    /// Subtitles left where they were, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
}

impl RelocateReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    fn skip(&mut self, path: &Path, reason: impl Into<String>) {
        self.skipped.push((path.to_path_buf(), reason.into()));
    }
}

/// Returns the first media file whose stem equals the subtitle's stem.
pub fn find_matching_media<'m>(subtitle: &Path, media: &'m [PathBuf]) -> Option<&'m PathBuf> {
    let stem = subtitle.file_stem()?;
    media
        .iter()
        .find(|candidate| candidate.file_stem() == Some(stem))
}

fn destination_beside(media: &Path, subtitle: &Path) -> Option<PathBuf> {
    let name: &OsStr = subtitle.file_name()?;
    Some(media.parent()?.join(name))
}

/// Relocates subtitle files under a root.
pub struct SubtitleMatcher<'a> {
    root: &'a Path,
    config: &'a CompiledConfig,
}

impl<'a> SubtitleMatcher<'a> {
    pub fn new(root: &'a Path, config: &'a CompiledConfig) -> Self {
        Self { root, config }
    }

    /// Moves each subtitle into the directory of its matching media file.
    ///
    /// Media is enumerated afresh, so files moved by an earlier organize
    /// pass are found at their new location. Batch mode is asked separately
    /// from the organize pass, and only when there is a subtitle to handle.
    ///
    /// # Errors
    ///
    /// Returns an error only when the tree cannot be enumerated.
    pub fn relocate(&self, prompter: &mut dyn Prompter) -> OrganizeResult<RelocateReport> {
        let catalog = FileCatalog::new(&self.config.filters);
        let media = catalog.enumerate(self.root, &self.config.mapper.media_extensions())?;
        let subtitles = catalog.enumerate(self.root, &self.config.mapper.subtitle_extensions())?;

        OutputFormatter::info(&format!(
            "Found {} media files and {} subtitle files",
            media.len(),
            subtitles.len()
        ));

        let mut report = RelocateReport::default();
        if subtitles.is_empty() {
            OutputFormatter::plain("No subtitle files found to process.");
            return Ok(report);
        }

        let batch = prompter.confirm_batch_mode();

        for subtitle in &subtitles {
            let name = display_name(subtitle);

            let Some(matching) = find_matching_media(subtitle, &media) else {
                OutputFormatter::warning(&format!("No matching media file found for: {}", name));
                report.skip(subtitle, "no matching media file");
                continue;
            };

            let Some(destination) = destination_beside(matching, subtitle) else {
                report.skip(subtitle, "media file has no parent directory");
                continue;
            };

            if same_location(subtitle, &destination) {
                OutputFormatter::plain(&format!(
                    "{} is already next to {}",
                    name,
                    display_name(matching)
                ));
                report.skip(subtitle, "already next to its media");
                continue;
            }

            let question = format!(
                "Move \"{}\" to \"{}\"? (y/n): ",
                subtitle.display(),
                destination.display()
            );
            if !batch && !prompter.confirm(&question) {
                OutputFormatter::plain(&format!("Skipped: {}", name));
                report.skip(subtitle, "declined");
                continue;
            }

            match rename_file(subtitle, &destination) {
                Ok(()) => {
                    OutputFormatter::success(&format!(
                        "Moved: {} -> {}",
                        name,
                        display_name(matching)
                    ));
                    report.moved += 1;
                }
                Err(e) => {
                    OutputFormatter::error(&format!("Error moving {}: {}", name, e));
                    report.skip(subtitle, e.to_string());
                }
            }
        }

        Ok(report)
    }
}
