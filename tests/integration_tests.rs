//! Integration tests for mediatidy
//!
//! These tests drive complete runs over temporary directory trees. Probing
//! is replaced by stub probers so no external tools are needed, except in
//! the preflight test, which points the toolchain at programs that do not
//! exist.
//!
//! Test categories:
//! 1. Batch organization and subtitle relocation
//! 2. Probe fallback
//! 3. Dependency preflight
//! 4. Interactive confirmation
//! 5. Repeated runs and edge cases

use mediatidy::cli::{SUBTITLE_QUESTION, load_config, run_cli, run_with_prober};
use mediatidy::config::{CompiledConfig, MediaTidyConfig};
use mediatidy::media::MediaFile;
use mediatidy::probe::{
    Dimensions, ProbeChain, ProbeError, ProbeResult, Prober, parse_exiftool_output,
    parse_stream_dimensions,
};
use mediatidy::prompt::{BATCH_MODE_QUESTION, ScriptedPrompter};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A temporary directory tree to organize.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a file (and its parent directories) at a relative path.
    fn create_file(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, rel_path).expect("Failed to write file content");
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }

    /// Count directories directly under the root.
    fn count_dirs(&self) -> usize {
        fs::read_dir(self.path())
            .expect("Failed to read directory")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .count()
    }

    /// All files under the root, relative and sorted.
    fn list_files_recursive(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        Self::walk_dir(self.path(), &mut files);
        let mut relative: Vec<PathBuf> = files
            .into_iter()
            .map(|p| p.strip_prefix(self.path()).unwrap().to_path_buf())
            .collect();
        relative.sort();
        relative
    }

    fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) {
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_file() {
                    files.push(path);
                } else if path.is_dir() {
                    Self::walk_dir(&path, files);
                }
            }
        }
    }
}

/// Built-in defaults, independent of any config file on the machine.
fn default_config() -> CompiledConfig {
    MediaTidyConfig::default()
        .compile()
        .expect("Default configuration should compile")
}

/// Reports fixed dimensions per file name.
#[derive(Default)]
struct StubProber {
    dimensions: HashMap<String, Dimensions>,
}

impl StubProber {
    fn with(mut self, name: &str, dims: Dimensions) -> Self {
        self.dimensions.insert(name.to_string(), dims);
        self
    }
}

impl Prober for StubProber {
    fn name(&self) -> &str {
        "stub"
    }

    fn probe(&self, file: &MediaFile) -> ProbeResult<Dimensions> {
        self.dimensions
            .get(&file.name())
            .cloned()
            .ok_or(ProbeError::NoDimensions {
                tool: "stub".to_string(),
            })
    }
}

/// Behaves like exiftool printing something that is not JSON.
struct GarbledExifProber;

impl Prober for GarbledExifProber {
    fn name(&self) -> &str {
        "exiftool"
    }

    fn probe(&self, _file: &MediaFile) -> ProbeResult<Dimensions> {
        parse_exiftool_output(b"Warning: [minor] Unrecognized MakerNotes\n{{{")
    }
}

/// Behaves like ffprobe printing a fixed CSV line.
struct CsvProber(&'static [u8]);

impl Prober for CsvProber {
    fn name(&self) -> &str {
        "ffprobe"
    }

    fn probe(&self, _file: &MediaFile) -> ProbeResult<Dimensions> {
        parse_stream_dimensions(self.0)
    }
}

// ============================================================================
// Test Suite 1: Batch organization
// ============================================================================

#[test]
fn test_full_batch_run_with_subtitles() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg");
    fixture.create_file("b.mp4");
    fixture.create_file("a.srt");

    let config = default_config();
    let prober = StubProber::default()
        .with("a.jpg", Dimensions::new(1920, 1080))
        .with("b.mp4", Dimensions::new(1080, 1920));
    // media batch mode, move subtitles, subtitle batch mode
    let mut prompter = ScriptedPrompter::new([true, true, true]);

    let summary = run_with_prober(fixture.path(), &config, &prober, &mut prompter).unwrap();

    assert_eq!(summary.organized.processed, 2);
    assert_eq!(summary.organized.skipped_count(), 0);
    fixture.assert_file_exists("img_h/a.jpg");
    fixture.assert_file_exists("vid_v/b.mp4");

    let subtitles = summary.subtitles.expect("subtitle pass should run");
    assert_eq!(subtitles.moved, 1);
    fixture.assert_file_exists("img_h/a.srt");
    fixture.assert_file_not_exists("a.srt");

    assert_eq!(
        prompter.asked(),
        &[BATCH_MODE_QUESTION, SUBTITLE_QUESTION, BATCH_MODE_QUESTION]
    );
}

#[test]
fn test_nested_files_land_in_top_level_folders() {
    let fixture = TestFixture::new();
    fixture.create_file("2023/summer/beach.JPG");
    fixture.create_file("2023/summer/dive.mov");
    fixture.create_file("2024/portrait.png");

    let config = default_config();
    let prober = StubProber::default()
        .with("beach.JPG", Dimensions::new(4000, 3000))
        .with("dive.mov", Dimensions::new(1920, 1080).with_rotation(90))
        .with("portrait.png", Dimensions::new(3000, 4000));
    let mut prompter = ScriptedPrompter::new([true, false]);

    let summary = run_with_prober(fixture.path(), &config, &prober, &mut prompter).unwrap();

    assert_eq!(summary.organized.processed, 3);
    assert!(summary.subtitles.is_none());
    fixture.assert_file_exists("img_h/beach.JPG");
    fixture.assert_file_exists("vid_v/dive.mov");
    fixture.assert_file_exists("img_v/portrait.png");
    fixture.assert_file_not_exists("vid_h");
}

#[test]
fn test_unsupported_files_are_left_alone() {
    let fixture = TestFixture::new();
    fixture.create_file("notes.txt");
    fixture.create_file("song.mp3");
    fixture.create_file("clip.mkv");
    fixture.create_file("photo.jpeg");

    let config = default_config();
    let prober = StubProber::default().with("photo.jpeg", Dimensions::new(10, 5));
    let mut prompter = ScriptedPrompter::new([true, false]);

    let summary = run_with_prober(fixture.path(), &config, &prober, &mut prompter).unwrap();

    assert_eq!(summary.organized.processed, 1);
    assert_eq!(summary.organized.skipped_count(), 0);
    fixture.assert_file_exists("notes.txt");
    fixture.assert_file_exists("song.mp3");
    fixture.assert_file_exists("clip.mkv");
    fixture.assert_file_exists("img_h/photo.jpeg");
}

#[test]
fn test_orientation_tag_decides_before_shape() {
    let fixture = TestFixture::new();
    fixture.create_file("rotated.jpg");
    fixture.create_file("normal.jpg");

    let config = default_config();
    let prober = StubProber::default()
        .with(
            "rotated.jpg",
            Dimensions::new(4032, 3024).with_orientation("Rotate 90 CW"),
        )
        .with(
            "normal.jpg",
            Dimensions::new(3024, 4032).with_orientation("Horizontal (normal)"),
        );
    let mut prompter = ScriptedPrompter::new([true, false]);

    run_with_prober(fixture.path(), &config, &prober, &mut prompter).unwrap();

    fixture.assert_file_exists("img_v/rotated.jpg");
    fixture.assert_file_exists("img_h/normal.jpg");
}

// ============================================================================
// Test Suite 2: Probe fallback
// ============================================================================

#[test]
fn test_garbled_exiftool_output_falls_back_to_ffprobe() {
    let fixture = TestFixture::new();
    fixture.create_file("scan.png");

    let config = default_config();
    let prober = ProbeChain::new(vec![
        Box::new(GarbledExifProber),
        Box::new(CsvProber(b"800,600\n")),
    ]);
    let mut prompter = ScriptedPrompter::new([true, false]);

    let summary = run_with_prober(fixture.path(), &config, &prober, &mut prompter).unwrap();

    assert_eq!(summary.organized.processed, 1);
    assert_eq!(summary.organized.skipped_count(), 0);
    fixture.assert_file_exists("img_h/scan.png");
}

#[test]
fn test_both_probes_failing_skips_file() {
    let fixture = TestFixture::new();
    fixture.create_file("corrupt.mp4");

    let config = default_config();
    let prober = ProbeChain::new(vec![Box::new(GarbledExifProber), Box::new(CsvProber(b""))]);
    let mut prompter = ScriptedPrompter::new([true, false]);

    let summary = run_with_prober(fixture.path(), &config, &prober, &mut prompter).unwrap();

    assert_eq!(summary.organized.processed, 0);
    assert_eq!(summary.organized.skipped_count(), 1);
    let (path, reason) = &summary.organized.skipped[0];
    assert!(path.ends_with("corrupt.mp4"));
    assert!(reason.contains("exiftool"));
    assert!(reason.contains("ffprobe"));
    fixture.assert_file_exists("corrupt.mp4");
    assert_eq!(fixture.count_dirs(), 0);
}

// ============================================================================
// Test Suite 3: Dependency preflight
// ============================================================================

#[test]
fn test_missing_tools_abort_before_touching_files() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg");
    fixture.create_file("b.mp4");
    fixture.create_file("a.srt");

    let config_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = config_dir.path().join("mediatidy.toml");
    fs::write(
        &config_path,
        r#"
        [tools]
        exiftool = "nonexistent_exiftool_12345"
        ffprobe = "nonexistent_ffprobe_12345"
        ffmpeg = "nonexistent_ffmpeg_12345"
        "#,
    )
    .unwrap();

    let mut prompter = ScriptedPrompter::new([true, true, true]);
    let result = run_cli(fixture.path(), Some(&config_path), &mut prompter);

    let err = result.unwrap_err();
    assert!(err.contains("Required dependencies not found"));
    assert!(prompter.asked().is_empty());
    assert_eq!(fixture.count_dirs(), 0);
    assert_eq!(
        fixture.list_files_recursive(),
        vec![
            PathBuf::from("a.jpg"),
            PathBuf::from("a.srt"),
            PathBuf::from("b.mp4")
        ]
    );
}

// ============================================================================
// Test Suite 4: Interactive confirmation
// ============================================================================

#[test]
fn test_declining_every_file_moves_nothing() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg");
    fixture.create_file("b.jpg");

    let config = default_config();
    let prober = StubProber::default()
        .with("a.jpg", Dimensions::new(2, 1))
        .with("b.jpg", Dimensions::new(1, 2));
    // no batch mode, decline both, no subtitles
    let mut prompter = ScriptedPrompter::new([false, false, false, false]);

    let summary = run_with_prober(fixture.path(), &config, &prober, &mut prompter).unwrap();

    assert_eq!(summary.organized.processed, 0);
    assert_eq!(summary.organized.skipped_count(), 2);
    assert_eq!(fixture.count_dirs(), 0);
    assert_eq!(prompter.asked()[1], "Process a.jpg? (y/n): ");
    assert_eq!(prompter.asked()[2], "Process b.jpg? (y/n): ");
}

#[test]
fn test_subtitle_batch_answer_is_independent() {
    let fixture = TestFixture::new();
    fixture.create_file("ep1.mp4");
    fixture.create_file("ep1.srt");
    fixture.create_file("ep2.mp4");
    fixture.create_file("ep2.srt");

    let config = default_config();
    let prober = StubProber::default()
        .with("ep1.mp4", Dimensions::new(1920, 1080))
        .with("ep2.mp4", Dimensions::new(1920, 1080));
    // media batch yes, move subtitles yes, subtitle batch no, ep1 yes, ep2 no
    let mut prompter = ScriptedPrompter::new([true, true, false, true, false]);

    let summary = run_with_prober(fixture.path(), &config, &prober, &mut prompter).unwrap();

    let subtitles = summary.subtitles.unwrap();
    assert_eq!(subtitles.moved, 1);
    assert_eq!(subtitles.skipped_count(), 1);
    fixture.assert_file_exists("vid_h/ep1.srt");
    fixture.assert_file_exists("ep2.srt");
    assert_eq!(prompter.remaining(), 0);
}

// ============================================================================
// Test Suite 5: Repeated runs and edge cases
// ============================================================================

#[test]
fn test_second_run_is_a_noop() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg");
    fixture.create_file("b.mp4");

    let config = default_config();
    let prober = StubProber::default()
        .with("a.jpg", Dimensions::new(1920, 1080))
        .with("b.mp4", Dimensions::new(1080, 1920));

    let mut first = ScriptedPrompter::new([true, false]);
    run_with_prober(fixture.path(), &config, &prober, &mut first).unwrap();
    let after_first = fixture.list_files_recursive();

    let mut second = ScriptedPrompter::new([true, false]);
    let summary = run_with_prober(fixture.path(), &config, &prober, &mut second).unwrap();

    assert_eq!(summary.organized.processed, 2);
    assert_eq!(summary.organized.skipped_count(), 0);
    assert_eq!(fixture.list_files_recursive(), after_first);
    assert_eq!(
        after_first,
        vec![PathBuf::from("img_h/a.jpg"), PathBuf::from("vid_v/b.mp4")]
    );
}

#[test]
fn test_subtitle_tie_goes_to_first_media_in_walk_order() {
    let fixture = TestFixture::new();
    fixture.create_file("x/talk.jpg");
    fixture.create_file("y/talk.mp4");
    fixture.create_file("talk.srt");

    let config = default_config();
    let prober = StubProber::default()
        .with("talk.jpg", Dimensions::new(1920, 1080))
        .with("talk.mp4", Dimensions::new(1080, 1920));
    let mut prompter = ScriptedPrompter::new([true, true, true]);

    run_with_prober(fixture.path(), &config, &prober, &mut prompter).unwrap();

    // "img_h" sorts before "vid_v", so the image wins
    fixture.assert_file_exists("img_h/talk.srt");
    fixture.assert_file_not_exists("vid_v/talk.srt");
}

#[test]
fn test_custom_folder_names_from_config() {
    let fixture = TestFixture::new();
    fixture.create_file("wide.jpg");

    let config_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = config_dir.path().join("mediatidy.toml");
    fs::write(
        &config_path,
        r#"
        [folders]
        image_horizontal = "Landscape"
        "#,
    )
    .unwrap();

    let config = load_config(Some(&config_path)).unwrap();
    let prober = StubProber::default().with("wide.jpg", Dimensions::new(300, 200));
    let mut prompter = ScriptedPrompter::new([true, false]);

    run_with_prober(fixture.path(), &config, &prober, &mut prompter).unwrap();

    fixture.assert_file_exists("Landscape/wide.jpg");
}

#[test]
fn test_empty_directory_still_asks_both_questions() {
    let fixture = TestFixture::new();

    let config = default_config();
    let prober = StubProber::default();
    let mut prompter = ScriptedPrompter::new([true, true]);

    let summary = run_with_prober(fixture.path(), &config, &prober, &mut prompter).unwrap();

    assert_eq!(summary.organized.processed, 0);
    assert_eq!(summary.subtitles.map(|s| s.moved), Some(0));
    assert_eq!(prompter.asked(), &[BATCH_MODE_QUESTION, SUBTITLE_QUESTION]);
    assert_eq!(fixture.count_dirs(), 0);
}

#[test]
fn test_missing_directory_is_an_error() {
    let config = default_config();
    let prober = StubProber::default();
    let mut prompter = ScriptedPrompter::new([]);

    let result = run_with_prober(
        Path::new("/non/existent/photos"),
        &config,
        &prober,
        &mut prompter,
    );

    assert!(result.is_err());
    assert!(prompter.asked().is_empty());
}

#[cfg(unix)]
#[test]
fn test_same_name_collision_keeps_last_moved() {
    let fixture = TestFixture::new();
    fixture.create_file("a/dup.jpg");
    fixture.create_file("b/dup.jpg");

    let config = default_config();
    let prober = StubProber::default().with("dup.jpg", Dimensions::new(1920, 1080));
    let mut prompter = ScriptedPrompter::new([true, false]);

    let summary = run_with_prober(fixture.path(), &config, &prober, &mut prompter).unwrap();

    assert_eq!(summary.organized.processed, 2);
    fixture.assert_file_not_exists("a/dup.jpg");
    fixture.assert_file_not_exists("b/dup.jpg");
    let content = fs::read_to_string(fixture.path().join("img_h/dup.jpg")).unwrap();
    assert_eq!(content, "b/dup.jpg");
}
