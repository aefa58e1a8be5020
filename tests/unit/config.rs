use super::*;

#[test]
fn defaults_are_valid() {
    let cfg = AppConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.timing.target_frame_count, 100);
    assert_eq!(cfg.timing.hold_ms, 3000);
    assert_eq!(cfg.encoder.timeout_secs, 120);
    assert!(!cfg.source.has_api_key());
}

#[test]
fn partial_toml_overrides_only_named_fields() {
    let cfg = AppConfig::from_toml_str(
        r#"
        [source]
        api_key = "abcd1234"

        [timing]
        hold_ms = 4000

        [render]
        width = 640
        height = 360
        watermark = "demo"
        "#,
    )
    .unwrap();
    assert!(cfg.source.has_api_key());
    assert_eq!(cfg.source.masked_api_key(), "abcd****");
    assert_eq!(cfg.timing.hold_ms, 4000);
    assert_eq!(cfg.timing.base_budget_ms, 5000);
    assert_eq!(cfg.render.width, 640);
    assert_eq!(cfg.render.watermark.as_deref(), Some("demo"));
    assert_eq!(cfg.source.base_currency, "USD");
}

#[test]
fn unknown_keys_are_rejected() {
    let err = AppConfig::from_toml_str("[timing]\nhold = 1\n").unwrap_err();
    assert!(matches!(err, ReelError::Config(_)));
}

#[test]
fn validation_catches_bad_values() {
    let mut cfg = AppConfig::default();
    cfg.render.width = 999;
    assert!(cfg.validate().is_err());

    let mut cfg = AppConfig::default();
    cfg.timing.hold_ms = 5;
    assert!(cfg.validate().is_err());

    let mut cfg = AppConfig::default();
    cfg.tone.min_freq_hz = 900.0;
    assert!(cfg.validate().is_err());

    let mut cfg = AppConfig::default();
    cfg.tone.sample_rate = 1000;
    assert!(cfg.validate().is_err());

    let mut cfg = AppConfig::default();
    cfg.encoder.timeout_secs = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn invalid_ffmpeg_path_falls_back_to_path_lookup() {
    let enc = EncoderConfig {
        ffmpeg_path: PathBuf::from("/definitely/not/here/ffmpeg"),
        ..EncoderConfig::default()
    };
    assert_eq!(enc.resolve_ffmpeg_path(), PathBuf::from(DEFAULT_FFMPEG));

    let enc = EncoderConfig {
        ffmpeg_path: PathBuf::new(),
        ..EncoderConfig::default()
    };
    assert_eq!(enc.resolve_ffmpeg_path(), PathBuf::from(DEFAULT_FFMPEG));
}

#[cfg(unix)]
#[test]
fn executable_ffmpeg_path_is_kept() {
    use std::os::unix::fs::PermissionsExt as _;

    let dir = tempfile::tempdir().unwrap();
    let exe = dir.path().join("my-ffmpeg");
    std::fs::write(&exe, "#!/bin/sh\nexit 0\n").unwrap();
    std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();

    let enc = EncoderConfig {
        ffmpeg_path: exe.clone(),
        ..EncoderConfig::default()
    };
    assert_eq!(enc.resolve_ffmpeg_path(), exe);
}

#[test]
fn load_reports_missing_file() {
    let err = AppConfig::load(Path::new("/definitely/not/here/seriesreel.toml")).unwrap_err();
    assert!(err.to_string().contains("read config"));
}
