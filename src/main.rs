use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod cli;

#[derive(Parser)]
#[command(
    name = "pkgsource",
    version,
    about = "Inspect and lock the package sources declared in sources.toml"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Source manifest
    #[arg(long, global = true, default_value = "sources.toml")]
    manifest: PathBuf,
    /// Lockfile read and written by `lock` and `check`
    #[arg(long, global = true, default_value = "sources.lock")]
    lockfile: PathBuf,
    /// Settings file (default: $PKGSOURCE_CONFIG or pkgsource.config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Show declared sources by category and the default source
    List,
    /// Reconcile with the existing lock and write the lock view
    Lock,
    /// Exit 1 when the lockfile no longer matches the manifest
    Check,
}

fn main() {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("error: cannot install logger: {}", e);
        process::exit(1);
    }

    let paths = cli::Paths {
        manifest: cli.manifest,
        lockfile: cli.lockfile,
        config: cli.config,
    };
    match cli.command {
        Command::List => cli::sources::cmd_list(&paths),
        Command::Lock => cli::sources::cmd_lock(&paths),
        Command::Check => cli::sources::cmd_check(&paths),
    }
}
