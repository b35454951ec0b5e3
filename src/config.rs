use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "gradient-field",
    version,
    about = "Animated procedural gradient fields, rendered in the terminal"
)]
pub struct Config {
    // Built-in or file preset, by index or (partial) name.
    #[arg(long)]
    pub preset: Option<String>,

    #[arg(long)]
    pub preset_file: Option<PathBuf>,

    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    // Overrides the animation speed stored in each preset.
    #[arg(long)]
    pub speed: Option<f32>,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = false)]
    pub randomize: bool,

    #[arg(long, default_value_t = 1)]
    pub scale: usize,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,

    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}
