use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cfg = gradient_field::config::Config::parse();
    gradient_field::app::run(cfg)
}
