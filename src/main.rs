use clap::{Parser, Subcommand};
use notegraph::Config;
use notegraph::convert::{self, status_message};
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

#[derive(Parser, Debug)]
#[command(name = "notegraph", version)]
#[command(about = "Convert Scapple diagrams into story outlines and back")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a .scap diagram (or every diagram below a directory) into an outline
    Import {
        path: PathBuf,
        /// Overwrite existing outline files
        #[arg(short, long)]
        force: bool,
    },
    /// Export an outline JSON file back into a .scap diagram
    Export {
        path: PathBuf,
        /// Overwrite an existing diagram
        #[arg(short, long)]
        force: bool,
    },
    /// Write a sample config.toml
    InitConfig {
        #[arg(default_value = "config.toml")]
        path: PathBuf,
    },
}

fn init_logger(level: &str) {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", level)
    ).init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    let ok = match args.command {
        Command::InitConfig { path } => {
            init_logger("info");
            write_sample_config(&path)?;
            true
        }
        Command::Import { path, force } => {
            let config = Config::load()?;
            init_logger(&config.notegraph.log_level);
            run_import(&path, &config, force)?
        }
        Command::Export { path, force } => {
            let config = Config::load()?;
            init_logger(&config.notegraph.log_level);
            let result = convert::export_file(&path, &config, force);
            println!("{}", status_message(&result));
            result.is_ok()
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Import one diagram, or every diagram below a directory.
fn run_import(path: &Path, config: &Config, force: bool) -> Result<bool> {
    if !path.is_dir() {
        let result = convert::import_file(path, config, force);
        println!("{}", status_message(&result));
        return Ok(result.is_ok());
    }

    let reports = convert::import_dir(path, config, force)?;
    if reports.is_empty() {
        log::warn!("No diagrams found below {}", path.display());
    }
    for report in &reports {
        println!("{}: {}", report.source.display(), status_message(&report.result));
    }
    Ok(reports.iter().all(|r| r.result.is_ok()))
}

fn write_sample_config(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    std::fs::write(path, Config::SAMPLE)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    log::info!("{} written", path.display());
    Ok(())
}
