// Pianoscore - simplified piano scores from transcribed note streams
// Main library entry point

pub mod config;
pub mod notes;
pub mod transcription;
pub mod simplification;
pub mod midi;
pub mod pipeline;
pub mod commands;

pub use notes::{Difficulty, NoteCollection, NoteEvent};
pub use simplification::simplify;
pub use transcription::preprocess;

/// Parse the command line, set up logging and run the requested command
pub fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = commands::parse_args(&args)?;

    let loaded = config::Config::load(&cli.config_path);

    // Init logging before anything can fail quietly
    let log_level = match (&loaded, cli.verbose) {
        (_, true) => "debug",
        (Ok(config), false) => config.log_level.as_str(),
        (Err(_), false) => "info",
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level)
    ).init();

    let config = match loaded {
        Ok(config) => {
            log::debug!("Using config {}", cli.config_path.display());
            config
        }
        Err(e) => {
            log::warn!("{:#}; using defaults", e);
            config::Config::default()
        }
    };

    commands::execute(&cli, &config)
}
