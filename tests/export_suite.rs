#[allow(dead_code)]
#[path = "../src/bin/export_frames.rs"]
mod export_frames;

use clap::Parser;
use gradient_field::preset::PresetLibrary;
use std::path::PathBuf;

#[test]
fn parse_args_defaults_are_stable() {
    let args = export_frames::Cli::try_parse_from(["export_frames"]).expect("parse should succeed");

    assert_eq!(args.width, 1280);
    assert_eq!(args.height, 720);
    assert_eq!(args.fps, 30);
    assert_eq!(args.duration, None);
    assert_eq!(args.time, 0.0);
    assert_eq!(args.preset, None);
    assert!(!args.randomize);
    assert_eq!(args.output_path(), PathBuf::from("frame.ppm"));
    export_frames::validate_args(&args).expect("defaults must validate");
}

#[test]
fn parse_args_overrides_work() {
    let args = export_frames::Cli::try_parse_from([
        "export_frames",
        "--preset",
        "ocean",
        "--width",
        "640",
        "--height",
        "360",
        "--fps",
        "24",
        "--duration",
        "12.5",
        "--time",
        "3",
        "--speed",
        "1.5",
        "--seed",
        "42",
        "--randomize",
        "--out",
        "clips/out.mp4",
    ])
    .expect("parse should succeed");

    assert_eq!(args.preset.as_deref(), Some("ocean"));
    assert_eq!(args.width, 640);
    assert_eq!(args.height, 360);
    assert_eq!(args.fps, 24);
    assert_eq!(args.duration, Some(12.5));
    assert_eq!(args.time, 3.0);
    assert_eq!(args.speed, Some(1.5));
    assert_eq!(args.seed, Some(42));
    assert!(args.randomize);
    assert_eq!(args.output_path(), PathBuf::from("clips/out.mp4"));
}

#[test]
fn duration_switches_default_output_to_video() {
    let args = export_frames::Cli::try_parse_from(["export_frames", "--duration", "2"])
        .expect("parse should succeed");
    assert_eq!(args.output_path(), PathBuf::from("export.mp4"));
}

#[test]
fn validate_rejects_zero_sizes_and_rates() {
    for (flag, needle) in [("--width", "--width"), ("--height", "--height"), ("--fps", "--fps")] {
        let args = export_frames::Cli::try_parse_from(["export_frames", flag, "0"])
            .expect("parse should succeed");
        let err = export_frames::validate_args(&args).expect_err("zero must fail validation");
        assert!(err.to_string().contains(needle), "{err}");
    }
}

#[test]
fn validate_rejects_non_positive_duration() {
    let args = export_frames::Cli::try_parse_from(["export_frames", "--duration", "0"])
        .expect("parse should succeed");
    let err = export_frames::validate_args(&args).expect_err("duration=0 must fail validation");
    assert!(err.to_string().contains("--duration"));
}

#[test]
fn frame_math_is_deterministic() {
    assert_eq!(export_frames::compute_frame_count(2.0, 30), 60);
    assert_eq!(export_frames::compute_frame_count(2.999, 30), 89);
    assert_eq!(export_frames::compute_frame_count(0.01, 30), 1);

    assert_eq!(export_frames::frame_time(1.0, 0, 30, 2.0), 1.0);
    assert!((export_frames::frame_time(1.0, 30, 30, 2.0) - 3.0).abs() < 1e-6);
    assert_eq!(export_frames::frame_time(5.0, 90, 30, 0.0), 5.0);
}

#[test]
fn ppm_is_binary_rgb() {
    let rgba = [255u8, 0, 0, 255, 0, 128, 255, 255];
    let mut out = Vec::new();
    export_frames::write_ppm(&mut out, 2, 1, &rgba).unwrap();
    let header = b"P6\n2 1\n255\n";
    assert_eq!(&out[..header.len()], header);
    assert_eq!(&out[header.len()..], &[255, 0, 0, 0, 128, 255]);
}

#[test]
fn preset_resolution() {
    let lib = PresetLibrary::builtin().unwrap();
    assert_eq!(export_frames::resolve_preset(&lib, None).unwrap().name, "sunset");
    assert_eq!(export_frames::resolve_preset(&lib, Some("1")).unwrap().name, "ocean");
    assert_eq!(
        export_frames::resolve_preset(&lib, Some("noir")).unwrap().name,
        "film-noir"
    );
    let err = export_frames::resolve_preset(&lib, Some("no-such-preset")).unwrap_err();
    assert!(err.to_string().contains("not found"));
    assert!(export_frames::resolve_preset(&PresetLibrary::default(), None).is_err());
}
