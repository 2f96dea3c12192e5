//! OxiSpr CLI - sprite archive extractor
//!
//! Decodes run-length packed 32x32 sprite archives into PNG files.

mod commands;
mod export;
mod utils;

use clap::{Args, Parser, Subcommand};
use commands::{cmd_extract, cmd_info, cmd_list, cmd_pack, cmd_test};
use oxispr_core::ArchiveLayout;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oxispr")]
#[command(author, version, about = "Pure Rust sprite archive extractor")]
#[command(long_about = "
OxiSpr decodes legacy sprite archives (address table + run-length encoded
32x32 bitmaps) into PNG images. Transparent pixels are written as the
magenta key color (255, 0, 255).

Examples:
  oxispr extract Tibia.spr
  oxispr extract Tibia.spr -o sprites --threads 4
  oxispr extract Tibia.spr --from 100 --to 200 --strict
  oxispr info Tibia.spr
  oxispr list Tibia.spr --json
  oxispr test Tibia.spr
  oxispr pack sprites/ rebuilt.spr
")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Archive header revision.
#[derive(Args, Debug, Clone, Copy)]
pub struct LayoutArgs {
    /// Archive uses the extended header (32-bit sprite count)
    #[arg(long)]
    extended: bool,
}

impl LayoutArgs {
    pub fn layout(&self) -> ArchiveLayout {
        if self.extended {
            ArchiveLayout::Extended
        } else {
            ArchiveLayout::Classic
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract every sprite as <slot>.png
    #[command(alias = "x")]
    Extract {
        /// Sprite archive to extract
        archive: PathBuf,

        /// Output directory (created if missing)
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Worker threads (default: available parallelism)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Stop at the first failing slot
        #[arg(long)]
        strict: bool,

        /// Reject addresses beyond the end of the archive before decoding
        #[arg(long)]
        validate_addresses: bool,

        /// First slot to extract
        #[arg(long)]
        from: Option<u32>,

        /// Last slot to extract
        #[arg(long)]
        to: Option<u32>,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show information about an archive
    #[command(alias = "i")]
    Info {
        /// Sprite archive to inspect
        archive: PathBuf,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// List present sprites with their block statistics
    #[command(alias = "l")]
    List {
        /// Sprite archive to list
        archive: PathBuf,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Decode every sprite without writing anything
    #[command(alias = "t")]
    Test {
        /// Sprite archive to test
        archive: PathBuf,

        /// Worker threads (default: available parallelism)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Build an archive from a directory of <slot>.png files
    Pack {
        /// Directory holding 32x32 PNG files named by slot id
        input: PathBuf,

        /// Archive file to write
        archive: PathBuf,

        /// Sprite count to record (default: highest slot + 1)
        #[arg(long)]
        count: Option<u32>,

        #[command(flatten)]
        layout: LayoutArgs,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Ignore the error if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let verbose = cli.verbose > 0;

    let result = match cli.command {
        Commands::Extract {
            archive,
            output,
            threads,
            strict,
            validate_addresses,
            from,
            to,
            no_progress,
            layout,
        } => cmd_extract(
            &archive,
            &output,
            commands::ExtractOptions {
                layout: layout.layout(),
                threads,
                strict,
                validate_addresses,
                from,
                to,
                progress: !no_progress,
                verbose,
            },
        ),
        Commands::Info {
            archive,
            json,
            layout,
        } => cmd_info(&archive, layout.layout(), json),
        Commands::List {
            archive,
            json,
            layout,
        } => cmd_list(&archive, layout.layout(), json, verbose),
        Commands::Test {
            archive,
            threads,
            layout,
        } => cmd_test(&archive, layout.layout(), threads, verbose),
        Commands::Pack {
            input,
            archive,
            count,
            layout,
        } => cmd_pack(&input, &archive, layout.layout(), count, verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
