use clap::Parser;
use gradient_field::config::{Config, LogLevel};
use std::path::PathBuf;

#[test]
fn config_defaults() {
    let cfg = Config::try_parse_from(["gradient-field"]).expect("parse should succeed");
    assert_eq!(cfg.preset, None);
    assert_eq!(cfg.preset_file, None);
    assert_eq!(cfg.fps, 30);
    assert_eq!(cfg.speed, None);
    assert_eq!(cfg.seed, None);
    assert!(!cfg.randomize);
    assert_eq!(cfg.scale, 1);
    assert!(cfg.sync_updates);
    assert_eq!(cfg.log_file, None);
    assert_eq!(cfg.log_level, LogLevel::Warn);
}

#[test]
fn config_overrides() {
    let cfg = Config::try_parse_from([
        "gradient-field",
        "--preset",
        "aurora",
        "--preset-file",
        "mine.txt",
        "--fps",
        "60",
        "--speed",
        "0.5",
        "--seed",
        "7",
        "--randomize",
        "--scale",
        "2",
        "--sync-updates",
        "false",
        "--log-file",
        "field.log",
        "--log-level",
        "debug",
    ])
    .expect("parse should succeed");

    assert_eq!(cfg.preset.as_deref(), Some("aurora"));
    assert_eq!(cfg.preset_file, Some(PathBuf::from("mine.txt")));
    assert_eq!(cfg.fps, 60);
    assert_eq!(cfg.speed, Some(0.5));
    assert_eq!(cfg.seed, Some(7));
    assert!(cfg.randomize);
    assert_eq!(cfg.scale, 2);
    assert!(!cfg.sync_updates);
    assert_eq!(cfg.log_file, Some(PathBuf::from("field.log")));
    assert_eq!(cfg.log_level, LogLevel::Debug);
}

#[test]
fn unknown_log_level_is_rejected() {
    assert!(Config::try_parse_from(["gradient-field", "--log-level", "loud"]).is_err());
}

#[test]
fn log_levels_map_to_filter_directives() {
    assert_eq!(LogLevel::Error.as_str(), "error");
    assert_eq!(LogLevel::Trace.as_str(), "trace");
}
