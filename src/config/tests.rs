use super::load::resolve_config_path;
use super::schema::*;
use crate::error::Error;
use crate::tag::TagId;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

fn write_config(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn resolve_config_path_prefers_argument_over_env() {
    let _lock = env_lock();
    let _g = EnvGuard::set("TAGPLAY_CONFIG_PATH", "/tmp/from-env.json");
    assert_eq!(
        resolve_config_path(Some("/tmp/from-arg.json".into())),
        PathBuf::from("/tmp/from-arg.json")
    );
    assert_eq!(resolve_config_path(None), PathBuf::from("/tmp/from-env.json"));
}

#[test]
fn resolve_config_path_defaults_to_working_directory() {
    let _lock = env_lock();
    let _g = EnvGuard::remove("TAGPLAY_CONFIG_PATH");
    assert_eq!(resolve_config_path(None), PathBuf::from("config.json"));
    assert_eq!(resolve_config_path(Some("  ".into())), PathBuf::from("config.json"));
}

#[test]
fn load_normalizes_legacy_and_full_mappings() {
    let _lock = env_lock();
    let _g = EnvGuard::remove("TAGPLAY__AUDIO_SETTINGS__VOLUME");
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "config.json",
        r#"{
  "usb_mount_path": "/media/pi/MUSIC",
  "nfc_mappings": {
    "111": {"album": "Jazz", "shuffle": false},
    "222": {"album": "Rock", "shuffle": true},
    "333": "Classical",
    "444": {"album": "Folk"}
  },
  "audio_settings": {"volume": 0.5}
}"#,
    );

    let s = Settings::load(&path).unwrap();
    assert_eq!(s.usb_mount_path, PathBuf::from("/media/pi/MUSIC"));
    assert_eq!(s.audio_settings.volume, 0.5);
    // Unset knobs keep their defaults.
    assert_eq!(s.audio_settings.track_gap_ms, 500);
    assert_eq!(s.reader.poll_interval_ms, 500);
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);

    let m = s.mappings();
    assert_eq!(m.len(), 4);
    let get = |id: &str| m.get(&TagId::new(id)).cloned().unwrap();
    assert_eq!(
        get("111"),
        AlbumMapping {
            album: "Jazz".into(),
            shuffle: false
        }
    );
    assert!(get("222").shuffle);
    assert_eq!(
        get("333"),
        AlbumMapping {
            album: "Classical".into(),
            shuffle: false
        }
    );
    assert!(!get("444").shuffle);
}

#[test]
fn load_accepts_toml_by_extension() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "config.toml",
        r#"
usb_mount_path = "/mnt/MUSIC"
activity_log = "/tmp/activity.log"

[nfc_mappings]
"111" = "Jazz"

[reader]
backend = "file"
tag_file = "/tmp/tag"
poll_interval_ms = 250
"#,
    );

    let s = Settings::load(&path).unwrap();
    assert_eq!(s.reader.backend, ReaderBackend::File);
    assert_eq!(s.reader.tag_file, PathBuf::from("/tmp/tag"));
    assert_eq!(s.reader.poll_interval_ms, 250);
    assert_eq!(s.activity_log, PathBuf::from("/tmp/activity.log"));
}

#[test]
fn load_reports_missing_file() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.json");
    assert!(matches!(Settings::load(&path), Err(Error::ConfigMissing(p)) if p == path));
}

#[test]
fn load_reports_malformed_json() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "config.json", r#"{"usb_mount_path": "/x", "#);
    assert!(matches!(Settings::load(&path), Err(Error::ConfigMalformed(_))));
}

#[test]
fn load_requires_mappings() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "config.json", r#"{"usb_mount_path": "/x"}"#);
    assert!(matches!(Settings::load(&path), Err(Error::ConfigMalformed(_))));
}

#[test]
fn load_rejects_out_of_range_volume() {
    let _lock = env_lock();
    let _g = EnvGuard::remove("TAGPLAY__AUDIO_SETTINGS__VOLUME");
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "config.json",
        r#"{"usb_mount_path": "/x", "nfc_mappings": {"1": "A"}, "audio_settings": {"volume": 1.5}}"#,
    );
    match Settings::load(&path) {
        Err(Error::ConfigMalformed(msg)) => assert!(msg.contains("volume")),
        other => panic!("expected ConfigMalformed, got {other:?}"),
    }
}

#[test]
fn env_overrides_config_file() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "config.json",
        r#"{"usb_mount_path": "/x", "nfc_mappings": {"1": "A"}, "audio_settings": {"volume": 0.9}}"#,
    );
    let _g = EnvGuard::set("TAGPLAY__AUDIO_SETTINGS__VOLUME", "0.25");

    let s = Settings::load(&path).unwrap();
    assert_eq!(s.audio_settings.volume, 0.25);
}
