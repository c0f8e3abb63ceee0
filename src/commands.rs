// Command-line commands

use std::path::{Path, PathBuf};
use anyhow::Context;

use crate::config::{self, Config};
use crate::midi::{parse_midi, write_midi_bytes};
use crate::notes::Difficulty;
use crate::pipeline::TranscriptionMetadata;
use crate::simplification::simplify;
use crate::transcription::preprocess;

pub const USAGE: &str = "\
Usage:
  pianoscore simplify <input.mid> [--level <level>] [--output <file.mid>] [--json]
  pianoscore inspect <input.mid>
  pianoscore levels
  pianoscore config

Options:
  --config <path>    Config file (default: platform config dir)
  --verbose          Debug logging
  --help             Show this message";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Simplify {
        input: PathBuf,
        level: Option<Difficulty>,
        output: Option<PathBuf>,
        json: bool,
    },
    Inspect {
        input: PathBuf,
    },
    Levels,
    ShowConfig,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub command: Command,
    pub config_path: PathBuf,
    pub verbose: bool,
}

/// Flags that take a value
const VALUE_FLAGS: &[&str] = &["--level", "--output", "--config"];

fn flag_value(args: &[String], flag: &str) -> anyhow::Result<Option<String>> {
    match args.iter().position(|a| a == flag) {
        Some(i) => args.get(i + 1)
            .filter(|v| !v.starts_with("--"))
            .cloned()
            .map(Some)
            .ok_or_else(|| anyhow::anyhow!("{} needs a value", flag)),
        None => Ok(None),
    }
}

/// Arguments that are neither flags nor flag values
fn positionals(args: &[String]) -> Vec<&str> {
    let mut result = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
        } else if !arg.starts_with("--") {
            result.push(arg.as_str());
        }
    }
    result
}

/// Parse arguments (without the program name).
pub fn parse_args(args: &[String]) -> anyhow::Result<CliArgs> {
    let verbose = args.iter().any(|a| a == "--verbose");
    let config_path = flag_value(args, "--config")?
        .map(PathBuf::from)
        .unwrap_or_else(config::default_config_path);

    let positional = positionals(args);
    let input = || -> anyhow::Result<PathBuf> {
        positional.get(1)
            .map(PathBuf::from)
            .ok_or_else(|| anyhow::anyhow!("missing input file\n\n{}", USAGE))
    };

    let command = if args.iter().any(|a| a == "--help") {
        Command::Help
    } else {
        match positional.first().copied() {
            Some("simplify") => Command::Simplify {
                input: input()?,
                level: flag_value(args, "--level")?
                    .map(|l| l.parse::<Difficulty>())
                    .transpose()?,
                output: flag_value(args, "--output")?.map(PathBuf::from),
                json: args.iter().any(|a| a == "--json"),
            },
            Some("inspect") => Command::Inspect { input: input()? },
            Some("levels") => Command::Levels,
            Some("config") => Command::ShowConfig,
            Some(other) => anyhow::bail!("unknown command '{}'\n\n{}", other, USAGE),
            None => Command::Help,
        }
    };

    Ok(CliArgs { command, config_path, verbose })
}

/// Run a parsed command.
pub fn execute(args: &CliArgs, config: &Config) -> anyhow::Result<()> {
    match &args.command {
        Command::Simplify { input, level, output, json } => {
            let level = level.unwrap_or(config.default_difficulty);
            let output = output.clone()
                .unwrap_or_else(|| default_output_path(&config.output_dir, input, level));
            let metadata = simplify_file(input, level, &output)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&metadata)?);
            } else {
                println!(
                    "{} -> {} ({}: {} notes, {:.1}s at {:.1} BPM)",
                    input.display(),
                    output.display(),
                    metadata.difficulty,
                    metadata.note_count,
                    metadata.duration_seconds,
                    metadata.tempo,
                );
            }
        }
        Command::Inspect { input } => inspect_file(input)?,
        Command::Levels => {
            for level in Difficulty::ALL {
                println!("{:<14}{}", level.as_str(), level.display_name());
            }
        }
        Command::ShowConfig => {
            println!("# {}", args.config_path.display());
            print!("{}", toml::to_string_pretty(config)?);
        }
        Command::Help => println!("{}", USAGE),
    }

    Ok(())
}

/// `<output_dir>/<input stem>_<level>.mid`
fn default_output_path(output_dir: &Path, input: &Path, level: Difficulty) -> PathBuf {
    let stem = input.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "score".to_string());
    output_dir.join(format!("{}_{}.mid", stem, level))
}

/// Parse, preprocess, simplify and write one MIDI file.
pub fn simplify_file(input: &Path, level: Difficulty, output: &Path) -> anyhow::Result<TranscriptionMetadata> {
    let raw = parse_midi(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    log::info!("Loaded {}: {} notes", input.display(), raw.note_count());

    let preprocessed = preprocess(&raw);
    let simplified = simplify(&preprocessed, level);
    log::info!(
        "Simplified ({}): {} -> {} notes",
        level,
        preprocessed.note_count(),
        simplified.note_count()
    );

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, write_midi_bytes(&simplified)?)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(TranscriptionMetadata::from_collection(&simplified, level))
}

fn inspect_file(input: &Path) -> anyhow::Result<()> {
    let raw = parse_midi(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let preprocessed = preprocess(&raw);

    println!("File:           {}", input.display());
    println!("Tempo:          {:.2} BPM", raw.tempo);
    println!("Time signature: {}/{}", raw.time_signature_numerator, raw.time_signature_denominator);
    println!("Duration:       {:.2}s", raw.duration());
    println!("Raw notes:      {}", raw.note_count());
    println!("Preprocessed:   {}", preprocessed.note_count());
    for level in Difficulty::ALL {
        println!("  {:<14}{}", level.as_str(), simplify(&preprocessed, *level).note_count());
    }

    Ok(())
}
