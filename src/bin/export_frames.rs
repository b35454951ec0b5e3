use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use fastrand::Rng;
use gradient_field::config::LogLevel;
use gradient_field::field::{FieldEngine, FrameInput};
use gradient_field::logging::{self, LogTarget};
use gradient_field::preset::{Preset, PresetLibrary};
use gradient_field::randomize::{randomize_all, twirl_seed};

const DEFAULT_STILL: &str = "frame.ppm";
const DEFAULT_VIDEO: &str = "export.mp4";
const DEFAULT_SEED: u64 = 0x6F1E_2026;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "export_frames",
    version,
    about = "Offline gradient field export (PPM still, or MP4 via ffmpeg)"
)]
pub(crate) struct Cli {
    #[arg(long, value_name = "INDEX_OR_NAME")]
    pub(crate) preset: Option<String>,

    #[arg(long)]
    pub(crate) preset_file: Option<PathBuf>,

    // Start from a seeded full randomize instead of a preset.
    #[arg(long, default_value_t = false)]
    pub(crate) randomize: bool,

    #[arg(long, default_value_t = 1280)]
    pub(crate) width: usize,

    #[arg(long, default_value_t = 720)]
    pub(crate) height: usize,

    #[arg(long, default_value_t = 30)]
    pub(crate) fps: u32,

    // Without a duration a single still is written.
    #[arg(long, value_name = "SECONDS")]
    pub(crate) duration: Option<f32>,

    #[arg(long, value_name = "SECONDS", default_value_t = 0.0)]
    pub(crate) time: f32,

    #[arg(long)]
    pub(crate) speed: Option<f32>,

    #[arg(long)]
    pub(crate) seed: Option<u64>,

    #[arg(long)]
    pub(crate) out: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub(crate) log_level: LogLevel,
}

impl Cli {
    pub(crate) fn output_path(&self) -> PathBuf {
        self.out.clone().unwrap_or_else(|| {
            PathBuf::from(if self.duration.is_some() {
                DEFAULT_VIDEO
            } else {
                DEFAULT_STILL
            })
        })
    }
}

pub(crate) fn validate_args(args: &Cli) -> Result<()> {
    if args.width == 0 {
        bail!("--width must be >= 1");
    }
    if args.height == 0 {
        bail!("--height must be >= 1");
    }
    if args.fps == 0 {
        bail!("--fps must be >= 1");
    }
    if let Some(d) = args.duration {
        if !(d > 0.0) {
            bail!("--duration must be > 0 seconds");
        }
    }
    if let Some(s) = args.speed {
        if !(s >= 0.0) {
            bail!("--speed must be >= 0");
        }
    }
    Ok(())
}

pub(crate) fn compute_frame_count(duration_s: f32, fps: u32) -> usize {
    ((duration_s.max(0.0) * fps as f32).floor() as usize).max(1)
}

// Animated time of frame `idx`; wall-clock seconds scaled by the speed.
pub(crate) fn frame_time(start: f32, idx: usize, fps: u32, speed: f32) -> f32 {
    start + idx as f32 / fps.max(1) as f32 * speed
}

pub(crate) fn write_ppm(out: &mut dyn Write, w: usize, h: usize, rgba: &[u8]) -> io::Result<()> {
    write!(out, "P6\n{w} {h}\n255\n")?;
    for px in rgba.chunks_exact(4).take(w * h) {
        out.write_all(&px[..3])?;
    }
    out.flush()
}

pub(crate) fn resolve_preset(library: &PresetLibrary, query: Option<&str>) -> Result<Preset> {
    if library.is_empty() {
        bail!("no presets available");
    }
    let idx = match query {
        None => 0,
        Some(q) => library
            .find(q)
            .ok_or_else(|| anyhow!("preset '{q}' not found"))?,
    };
    library
        .get(idx)
        .cloned()
        .ok_or_else(|| anyhow!("preset index {idx} out of range"))
}

fn main() -> Result<()> {
    let args = Cli::parse();
    logging::init(args.log_level, LogTarget::Stderr)?;
    run(args)
}

fn run(args: Cli) -> Result<()> {
    validate_args(&args)?;

    let mut library = PresetLibrary::builtin().context("parse built-in presets")?;
    if let Some(path) = args.preset_file.as_deref() {
        let extra = PresetLibrary::load(path)
            .with_context(|| format!("load presets from {}", path.display()))?;
        library.merge(extra);
    }

    let mut preset = resolve_preset(&library, args.preset.as_deref())?;
    let mut rng = Rng::with_seed(args.seed.unwrap_or(DEFAULT_SEED));
    if args.randomize {
        let r = randomize_all(&mut rng, &preset.params);
        preset = Preset::new("random", r.params, r.colors);
    } else if preset.twirl_seed.is_none() {
        preset.params.twirl_seed = twirl_seed(&mut rng);
    }
    if let Some(speed) = args.speed {
        preset.params.wave_speed = speed;
    }

    let out_path = args.output_path();
    let mut parent = out_path.parent().unwrap_or_else(|| Path::new(""));
    if parent == Path::new("") {
        parent = Path::new(".");
    }
    fs::create_dir_all(parent)
        .with_context(|| format!("create output directory {}", parent.display()))?;

    let palette = preset.palette();
    let mut engine = FieldEngine::new();
    let mut input = FrameInput {
        t: args.time,
        w: args.width,
        h: args.height,
        scale: 1,
    };

    let Some(duration) = args.duration else {
        let pixels = engine.render(&input, &preset.params, &palette);
        let file = fs::File::create(&out_path)
            .with_context(|| format!("create {}", out_path.display()))?;
        write_ppm(&mut BufWriter::new(file), args.width, args.height, pixels)
            .with_context(|| format!("write {}", out_path.display()))?;
        tracing::info!(preset = %preset.name, out = %out_path.display(), "wrote still");
        return Ok(());
    };

    ensure_ffmpeg_available()?;
    let frame_count = compute_frame_count(duration, args.fps);
    let mut ffmpeg = spawn_ffmpeg(&out_path, args.width, args.height, args.fps)?;
    let mut sink = ffmpeg
        .stdin
        .take()
        .context("failed to open ffmpeg stdin for rawvideo input")?;

    let started = Instant::now();
    let speed = preset.params.wave_speed;
    for idx in 0..frame_count {
        input.t = frame_time(args.time, idx, args.fps, speed);
        let pixels = engine.render(&input, &preset.params, &palette);
        sink.write_all(pixels).context("write frame to ffmpeg")?;
        if idx > 0 && idx % args.fps as usize == 0 {
            tracing::info!(
                frame = idx,
                of = frame_count,
                elapsed_s = started.elapsed().as_secs_f32(),
                "export progress"
            );
        }
    }
    drop(sink);

    let status = ffmpeg.wait().context("wait for ffmpeg")?;
    if !status.success() {
        bail!("ffmpeg exited with status {status}");
    }
    tracing::info!(
        frames = frame_count,
        fps = args.fps,
        preset = %preset.name,
        out = %out_path.display(),
        "export finished"
    );
    Ok(())
}

fn ensure_ffmpeg_available() -> Result<()> {
    match Command::new("ffmpeg")
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            bail!("ffmpeg not found in PATH (install ffmpeg or drop --duration for a still)")
        }
        Err(err) => Err(anyhow!("failed to run ffmpeg: {err}")),
    }
}

fn spawn_ffmpeg(
    out_path: &Path,
    width: usize,
    height: usize,
    fps: u32,
) -> Result<std::process::Child> {
    Command::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error", "-y"])
        .args(["-f", "rawvideo", "-pix_fmt", "rgba"])
        .arg("-video_size")
        .arg(format!("{width}x{height}"))
        .arg("-framerate")
        .arg(fps.to_string())
        .args(["-i", "-"])
        .args(["-c:v", "libx264", "-pix_fmt", "yuv420p"])
        .args(["-movflags", "+faststart"])
        .arg(out_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .with_context(|| format!("spawn ffmpeg for output {}", out_path.display()))
}
