use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::Result;

mod config;
mod commands;
mod error;

use config::Config;
use error::CliError;

#[derive(Parser)]
#[command(name = "zimport")]
#[command(about = "zimport - Import reciprocal BLAST reports into a Zim wiki")]
#[command(version)]
#[command(long_about = "
zimport reads a reciprocal BLAST (BLASTer) report and writes one Zim wiki page
per reciprocal record, named after the organism initials and the gene names.
Records without a mutual best hit are dropped.

Examples:
  zimport blaster blaster_output.txt Notebook/Lineus_ruber.txt
  zimport blaster blaster_output.txt.gz Notebook/Lineus_ruber.txt --flush-trailing
  zimport scan blaster_output.txt --organism 'Lineus ruber'
  zimport config --output zimport.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import a BLASTer report into the wiki tree of an organism page
    #[cfg(feature = "blaster")]
    Blaster {
        /// BLASTer report (plain text or .gz)
        report: PathBuf,

        /// Root page of the organism, e.g. Notebook/Lineus_ruber.txt
        root_page: PathBuf,

        /// Also emit a reciprocal record left open at the end of the report
        #[arg(long)]
        flush_trailing: bool,

        /// Store the first line of the report once instead of twice
        #[arg(long)]
        dedupe_first_line: bool,

        /// Token marking reciprocal hits
        #[arg(long)]
        marker: Option<String>,
    },

    /// Print reciprocal records as JSON lines without writing pages
    #[cfg(feature = "scan")]
    Scan {
        /// BLASTer report (plain text or .gz)
        report: PathBuf,

        /// Organism name ("Lineus ruber") or root page path (Lineus_ruber.txt)
        #[arg(long, required = true)]
        organism: String,

        /// Also emit a reciprocal record left open at the end of the report
        #[arg(long)]
        flush_trailing: bool,

        /// Store the first line of the report once instead of twice
        #[arg(long)]
        dedupe_first_line: bool,

        /// Token marking reciprocal hits
        #[arg(long)]
        marker: Option<String>,
    },

    /// Print or write an example zimport.toml
    Config {
        /// Write the example to this file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn setup_logging(verbose: u8, quiet: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        #[cfg(feature = "blaster")]
        Commands::Blaster { report, root_page, flush_trailing, dedupe_first_line, marker } => {
            let options = config.scan_options(flush_trailing, dedupe_first_line, marker);
            commands::blaster::execute(&config, report, root_page, options)?;
        }

        #[cfg(feature = "scan")]
        Commands::Scan { report, organism, flush_trailing, dedupe_first_line, marker } => {
            let options = config.scan_options(flush_trailing, dedupe_first_line, marker);
            commands::scan::execute(&config, report, organism, options)?;
        }

        Commands::Config { output } => {
            commands::config::execute(output)?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose, cli.quiet)?;

    if let Err(err) = run(cli) {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            error::print_error_and_exit(cli_err);
        }
        return Err(err);
    }

    Ok(())
}
