use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use media_renamer_core::{
    load_config, load_config_from, rename_directory, verify_directory, AppConfig, MediaCategory,
    MediaKind,
};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const USAGE: &str = "Usage: media-renamer -t p|v [-v] <path-to-dir>";

#[derive(Debug, Parser)]
#[command(name = "media-renamer")]
#[command(about = "Renames photos and videos in a directory to timestamp-based names")]
struct Cli {
    /// Media type: p for pictures, v for videos
    #[arg(short = 't', value_enum, overrides_with = "media_type")]
    media_type: MediaArg,
    /// Only report what would be renamed
    #[arg(short = 'v', default_value_t = false, overrides_with = "verify")]
    verify: bool,
    /// Configuration file, instead of the one in the OS config directory
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding the files; must be the last argument
    dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MediaArg {
    #[value(name = "p")]
    Pictures,
    #[value(name = "v")]
    Videos,
}

impl From<MediaArg> for MediaKind {
    fn from(arg: MediaArg) -> Self {
        match arg {
            MediaArg::Pictures => MediaKind::Pictures,
            MediaArg::Videos => MediaKind::Videos,
        }
    }
}

#[derive(Debug)]
enum ParseFailure {
    /// Help or version output requested; clap prints it.
    Display(clap::Error),
    Usage,
}

fn parse_args(args: &[OsString]) -> Result<Cli, ParseFailure> {
    let cli = Cli::try_parse_from(args).map_err(|err| match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ParseFailure::Display(err),
        _ => ParseFailure::Usage,
    })?;

    let last = args.last().map(PathBuf::from);
    if last.as_ref() != Some(&cli.dir) {
        return Err(ParseFailure::Usage);
    }
    Ok(cli)
}

fn main() -> Result<()> {
    let args: Vec<OsString> = std::env::args_os().collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(ParseFailure::Display(err)) => err.exit(),
        Err(ParseFailure::Usage) => {
            println!("{USAGE}");
            std::process::exit(1);
        }
    };

    let config = match &cli.config {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("config file does not exist: {}", path.display());
            }
            load_config_from(path)?
        }
        None => load_config()?,
    };
    setup_logging(&config)?;

    let category = MediaCategory::for_kind(cli.media_type.into())
        .context("invalid media category definition")?;
    let options = config.run_options();
    if cli.verify {
        verify_directory(&cli.dir, &category, &options)?;
    } else {
        rename_directory(&cli.dir, &category, &options)?;
    }
    Ok(())
}

fn setup_logging(config: &AppConfig) -> Result<()> {
    let level: Level = config
        .log_level
        .parse()
        .with_context(|| format!("invalid log_level in config: {}", config.log_level))?;

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(std::io::stdout),
        )
        .init();

    Ok(())
}
