use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::init::InitOptions;

/// Environment variable holding a tracing filter directive
const LOG_ENV: &str = "WPSTACK_LOG";

/// Scaffold a Docker Compose WordPress deployment (MySQL, PHP-FPM, Nginx)
/// with freshly generated database credentials.
#[derive(Parser, Debug)]
#[command(name = "wpstack")]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Cli {
    /// TOML file overriding the built-in defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to create the project in
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Render and report without writing any files
    #[arg(long)]
    dry_run: bool,

    /// Output the summary as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn options(&self) -> InitOptions {
        InitOptions {
            config: self.config.clone(),
            output: self.output.clone(),
            dry_run: self.dry_run,
            json: self.json,
        }
    }

    fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        // Usage errors share exit status 1 with every other failure
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    // WPSTACK_LOG wins over the flags
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.debug)
        .with_writer(std::io::stderr)
        .init();

    commands::init::execute(&cli.options())
}
