// SPDX-License-Identifier: MPL-2.0

//! Integration tests for capture sessions
//!
//! Each test runs against its own temporary output folder and store.

use camera_capture::backends::camera::TestPatternCamera;
use camera_capture::constants::keys;
use camera_capture::storage::Preferences;
use camera_capture::{
    CaptureConfig, CaptureError, CaptureSession, ImageFormat, LifecyclePolicy, MetadataStore,
    Resolution, StorePaths, WriteMode,
};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

struct Fixture {
    output: TempDir,
    data: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            output: tempfile::tempdir().unwrap(),
            data: tempfile::tempdir().unwrap(),
        }
    }

    fn paths(&self) -> StorePaths {
        StorePaths::in_dir(self.data.path())
    }

    fn config(&self, name: &str) -> CaptureConfig {
        CaptureConfig {
            folder_path: self.output.path().to_string_lossy().into_owned(),
            file_name: name.to_string(),
            ..CaptureConfig::default()
        }
    }

    fn open(&self, config: CaptureConfig) -> CaptureSession {
        let camera = TestPatternCamera::new(Resolution::new(32, 24));
        CaptureSession::open(
            config,
            Some(Box::new(camera)),
            &self.paths(),
            LifecyclePolicy::Standalone,
        )
        .unwrap()
    }

    fn file(&self, name: &str) -> std::path::PathBuf {
        self.output.path().join(name)
    }

    fn output_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.output.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

fn image_size(path: &Path) -> (u32, u32) {
    let img = image::open(path).unwrap();
    (img.width(), img.height())
}

#[test]
fn test_consecutive_captures_are_numbered() {
    let fx = Fixture::new();
    let mut session = fx.open(fx.config("shot"));

    for expected in 0..3 {
        let saved = session.capture_and_save().unwrap();
        assert_eq!(saved.counter, expected);
        assert_eq!(saved.name, "shot");
    }

    assert_eq!(session.store().counter("shot"), Some(3));
    assert_eq!(fx.output_files(), vec!["shot-0.png", "shot-1.png", "shot-2.png"]);
    assert_eq!(image_size(&fx.file("shot-2.png")), (32, 24));
}

#[test]
fn test_counters_survive_reopen() {
    let fx = Fixture::new();

    let mut session = fx.open(fx.config("shot"));
    session.capture_and_save().unwrap();
    session.capture_and_save().unwrap();
    session.close().unwrap();

    let mut session = fx.open(fx.config("shot"));
    let saved = session.capture_and_save().unwrap();
    assert_eq!(saved.counter, 2);
    assert!(fx.file("shot-2.png").is_file());
    session.close().unwrap();

    let store = MetadataStore::open(&fx.paths(), LifecyclePolicy::Standalone);
    let record = store.get("shot").unwrap();
    assert_eq!(record.file_count, 3);
    assert_eq!(record.folder_path, fx.output.path().to_string_lossy());
    assert!(record.last_capture.is_some());
}

#[test]
fn test_close_mirrors_counters_to_preferences() {
    let fx = Fixture::new();
    let mut session = fx.open(fx.config("shot"));
    session.capture_and_save().unwrap();
    session.close().unwrap();

    let prefs = Preferences::load(fx.paths().preferences);
    assert_eq!(prefs.get_int(&keys::file_count("shot")), Some(1));
    assert_eq!(
        prefs.get_string(&keys::file_folder("shot")),
        Some(&*fx.output.path().to_string_lossy())
    );
}

#[test]
fn test_unserialized_name_is_constant() {
    let fx = Fixture::new();
    let mut config = fx.config("shot");
    config.serialize_sequence = false;
    let mut session = fx.open(config);

    let first = session.capture_and_save().unwrap();
    let second = session.capture_and_save().unwrap();

    assert_eq!(first.path(), fx.file("shot.png"));
    assert_eq!(second.path(), fx.file("shot.png"));
    assert_eq!(session.store().counter("shot"), Some(2));
    assert_eq!(fx.output_files(), vec!["shot.png"]);
}

/// Leave behind what an earlier, untracked run would have written
fn seed_legacy_run(fx: &Fixture, name: &str) {
    std::fs::write(fx.file(&format!("{}-0.png", name)), b"old").unwrap();
    let mut prefs = Preferences::load(fx.paths().preferences);
    prefs.set_int(keys::file_count(name), 1);
    prefs.save().unwrap();
}

#[test]
fn test_collision_gets_new_suffix() {
    let fx = Fixture::new();
    seed_legacy_run(&fx, "shot");
    let mut session = fx.open(fx.config("shot"));

    let saved = session.capture_and_save().unwrap();
    assert_eq!(saved.name, "shot-New");
    assert_eq!(saved.counter, 0);
    assert_eq!(saved.path(), fx.file("shot-New-0.png"));
    assert_eq!(session.config().file_name, "shot-New");
    assert!(!session.store().contains("shot"));

    // The legacy file is untouched
    assert_eq!(std::fs::read(fx.file("shot-0.png")).unwrap(), b"old");
}

#[test]
fn test_overwrite_skips_collision_check() {
    let fx = Fixture::new();
    seed_legacy_run(&fx, "shot");
    let mut config = fx.config("shot");
    config.overwrite_on_collision = true;
    let mut session = fx.open(config);

    let saved = session.capture_and_save().unwrap();
    assert_eq!(saved.name, "shot");
    assert_eq!(saved.counter, 0);
    assert_ne!(std::fs::read(fx.file("shot-0.png")).unwrap(), b"old");
}

#[test]
fn test_file_without_legacy_counter_is_not_a_collision() {
    let fx = Fixture::new();
    std::fs::write(fx.file("shot-0.png"), b"old").unwrap();
    let mut session = fx.open(fx.config("shot"));

    let saved = session.capture_and_save().unwrap();
    assert_eq!(saved.name, "shot");
}

#[test]
fn test_missing_camera_changes_nothing() {
    let fx = Fixture::new();
    let mut session = CaptureSession::open(
        fx.config("shot"),
        None,
        &fx.paths(),
        LifecyclePolicy::Standalone,
    )
    .unwrap();

    assert_eq!(
        session.capture_and_save().unwrap_err(),
        CaptureError::InvalidCamera
    );
    assert!(!session.store().contains("shot"));
    assert!(fx.output_files().is_empty());
}

/// Log sink shared with a test subscriber
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_aborted_capture_warns_once() {
    let fx = Fixture::new();
    let logs = LogBuffer::default();
    let sink = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || sink.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut session = CaptureSession::open(
            fx.config("shot"),
            None,
            &fx.paths(),
            LifecyclePolicy::Standalone,
        )
        .unwrap();
        assert!(session.capture_and_save().is_err());
    });

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert_eq!(output.matches("WARN").count(), 1, "{}", output);
}

#[test]
fn test_missing_folder_is_rejected() {
    let fx = Fixture::new();
    let missing = fx.output.path().join("does-not-exist");
    let mut config = fx.config("shot");
    config.folder_path = missing.to_string_lossy().into_owned();
    let mut session = fx.open(config);

    assert!(matches!(
        session.capture_and_save(),
        Err(CaptureError::InvalidFolder(_))
    ));
    assert!(!missing.exists());
    assert!(!session.store().contains("shot"));
}

#[test]
fn test_invalid_file_name_is_rejected() {
    let fx = Fixture::new();
    let mut session = fx.open(fx.config("../escape"));

    assert!(matches!(
        session.capture_and_save(),
        Err(CaptureError::InvalidFileName(_))
    ));
    assert!(session.store().records().is_empty());
}

#[test]
fn test_unwired_format_changes_nothing() {
    let fx = Fixture::new();
    let mut config = fx.config("shot");
    config.image_format = ImageFormat::Exr;
    let mut session = fx.open(config);

    assert_eq!(
        session.capture_and_save().unwrap_err(),
        CaptureError::UnsupportedFormat(ImageFormat::Exr)
    );
    assert!(!session.store().contains("shot"));
    assert!(fx.output_files().is_empty());
}

#[test]
fn test_override_resolution() {
    let fx = Fixture::new();
    let mut config = fx.config("shot");
    config.override_resolution = true;
    config.target_resolution = Resolution::new(16, 8);
    config.image_format = ImageFormat::Jpeg;
    let mut session = fx.open(config);

    let saved = session.capture_and_save().unwrap();
    assert_eq!(saved.resolution, Resolution::new(16, 8));
    assert_eq!(saved.path(), fx.file("shot-0.jpg"));
    assert_eq!(image_size(saved.path()), (16, 8));
}

#[test]
fn test_non_blocking_write_completes() {
    let fx = Fixture::new();
    let mut config = fx.config("shot");
    config.write_mode = WriteMode::NonBlocking;
    let mut session = fx.open(config);

    let saved = session.capture_and_save().unwrap();
    // The counter is consumed before the write lands
    assert_eq!(session.store().counter("shot"), Some(1));

    let path = saved.write.wait().unwrap();
    assert_eq!(path, fx.file("shot-0.png"));
    assert_eq!(image_size(&path), (32, 24));
}

#[test]
fn test_shared_session_hands_out_distinct_counters() {
    let fx = Fixture::new();
    let session = Arc::new(Mutex::new(fx.open(fx.config("shot"))));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let session = Arc::clone(&session);
            std::thread::spawn(move || {
                (0..3)
                    .map(|_| session.lock().unwrap().capture_and_save().unwrap().counter)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut counters: Vec<u64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    counters.sort();
    assert_eq!(counters, (0..12).collect::<Vec<_>>());
    assert_eq!(fx.output_files().len(), 12);
}

#[test]
fn test_reset_restores_defaults() {
    let fx = Fixture::new();
    let mut config = fx.config("shot");
    config.image_format = ImageFormat::Tga;
    config.serialize_sequence = false;
    config.overwrite_on_collision = true;
    config.write_mode = WriteMode::NonBlocking;
    let mut session = fx.open(config);

    session.reset(None);

    let defaults = CaptureConfig::default();
    let config = session.config();
    assert_eq!(config.file_name, defaults.file_name);
    assert_eq!(config.folder_path, defaults.folder_path);
    assert_eq!(config.image_format, ImageFormat::Png);
    assert!(config.serialize_sequence);
    assert!(!config.overwrite_on_collision);
    assert_eq!(config.write_mode, WriteMode::NonBlocking);
    assert!(!session.has_camera());
}

#[test]
fn test_reset_never_reuses_numbers() {
    let fx = Fixture::new();
    let mut session = fx.open(fx.config("shot"));
    session.capture_and_save().unwrap();
    session.store().flush().unwrap();
    let before_reset = session.capture_and_save().unwrap();
    assert_eq!(before_reset.counter, 1);

    session.reset(None);
    assert_eq!(session.store().counter("shot"), Some(2));

    *session.config_mut() = fx.config("shot");
    session.set_camera(Some(Box::new(TestPatternCamera::new(Resolution::new(8, 8)))));
    let after_reset = session.capture_and_save().unwrap();
    assert_eq!(after_reset.counter, 2);
    assert_ne!(after_reset.path(), before_reset.path());
    assert_eq!(fx.output_files(), vec!["shot-0.png", "shot-1.png", "shot-2.png"]);
}
