mod config;
mod core;
mod domain;
mod render;
mod schematic;
mod session;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    core::app::run(core::cli::Cli::parse())
}
