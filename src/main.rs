use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use polybundle::core::Bundler;
use polybundle::formatters::{exceeds_size_limit, write_bundle};
use polybundle::project::{EntryManifest, ManifestError, Scaffold, MANIFEST_FILE};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "polybundle",
    version,
    author = "polybundle developers",
    about = "Bundle Lua scripts and their required modules into a single Polytoria script"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Output file, relative to the working directory
    #[arg(long, value_name = "FILE", global = true, default_value = "dist/bundle.lua")]
    out: PathBuf,

    /// Directory that requires and module keys are resolved against
    #[arg(long, value_name = "DIR", global = true)]
    root: Option<PathBuf>,

    /// Print debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Create init_scripts.json and a starter project in the working directory
    Init,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("failed to read the working directory")?;

    if let Some(Command::Init) = cli.command {
        let report = Scaffold::new(&cwd).init()?;
        if report.manifest_created {
            println!("Created {MANIFEST_FILE} with example entries.");
        } else {
            println!("{MANIFEST_FILE} already exists.");
        }
        for path in &report.files_created {
            log::info!("created {}", path.display());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let manifest = match EntryManifest::load(&cwd.join(MANIFEST_FILE)) {
        Ok(manifest) => manifest,
        Err(ManifestError::NotFound) => {
            println!("{}", ManifestError::NotFound);
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => {
            eprintln!("{err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let root = cli.root.map(|root| cwd.join(root)).unwrap_or_else(|| cwd.clone());
    let out_file = cwd.join(&cli.out);

    let start_time = Instant::now();
    let bundled = match Bundler::new(&root).and_then(|bundler| bundler.bundle(&manifest.entries)) {
        Ok(bundled) => bundled,
        Err(err) => {
            eprintln!("Bundling failed: {err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    if exceeds_size_limit(&bundled) {
        eprintln!(
            "Warning: Output exceeds 65,535 characters, which is the limit for LocalScripts in Polytoria.\n\
             Consider splitting your code into multiple bundles or optimizing your code to reduce size."
        );
    }

    if let Err(err) = write_bundle(&bundled, &out_file) {
        eprintln!("Bundling failed: {err:#}");
        return Ok(ExitCode::FAILURE);
    }

    println!(
        "Bundled {} entries into {}",
        manifest.len(),
        out_file.display()
    );
    log::debug!(
        "bundle took {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(ExitCode::SUCCESS)
}
