//! Command-line interface for projview.
//!
//! Extracts project archives, prints the browsable tree of an extraction root,
//! reads single files through the containment check, and bundles sources.

use clap::{Parser, Subcommand, ValueEnum};
use projview::{
    BinaryDetection, CollectBuilder, FileReader, ProjviewError, ReaderBuilder, build_tree,
    collect_sources, extract_archive, output,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::exit;

/// projview: browse and bundle extracted project archives
#[derive(Parser)]
#[command(name = "projview", version, about, long_about = None)]
struct Cli {
    /// Verbose logging (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Pretty JSON output
    #[arg(short, long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract a ZIP archive into a destination directory
    Extract {
        archive: PathBuf,
        dest: PathBuf,
    },
    /// Print the directory tree of an extraction root as JSON
    Tree {
        root: PathBuf,
    },
    /// Read one file beneath an extraction root
    Read {
        root: PathBuf,
        /// Path relative to the root
        path: PathBuf,
        /// Maximum file size in bytes
        #[arg(long, default_value_t = projview::DEFAULT_MAX_FILE_SIZE)]
        max_size: u64,
    },
    /// Collect sources into a single document
    Bundle {
        root: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = BundleFormat::Markdown)]
        format: BundleFormat,

        /// Binary detection strategy
        #[arg(long, default_value = "simple", value_parser = parse_binary_detection)]
        binary_detection: BinaryDetection,

        /// Ignore patterns (can be repeated)
        #[arg(short = 'I', long = "ignore")]
        ignore_patterns: Vec<String>,

        /// File size limit in bytes (files larger will have content omitted)
        #[arg(long)]
        file_size_limit: Option<u64>,

        /// Include hidden files
        #[arg(long)]
        hidden: bool,

        /// Disable .gitignore handling
        #[arg(long)]
        no_gitignore: bool,

        /// Drop binary and whitespace-only files
        #[arg(long)]
        text_only: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum BundleFormat {
    Markdown,
    Text,
    Json,
}

impl From<BundleFormat> for output::OutputFormat {
    fn from(format: BundleFormat) -> Self {
        match format {
            BundleFormat::Markdown => output::OutputFormat::Markdown,
            BundleFormat::Text => output::OutputFormat::Text,
            BundleFormat::Json => output::OutputFormat::Json,
        }
    }
}

/// Parse string into BinaryDetection enum.
fn parse_binary_detection(s: &str) -> Result<BinaryDetection, String> {
    match s {
        "simple" => Ok(BinaryDetection::Simple),
        "accurate" => Ok(BinaryDetection::Accurate),
        "none" => Ok(BinaryDetection::None),
        _ => Err(format!("invalid binary detection method: {}", s)),
    }
}

#[cfg(feature = "logging")]
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    #[cfg(feature = "logging")]
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command, cli.pretty) {
        eprintln!("Error: {}", e);
        exit(1);
    }
}

fn run(command: Command, pretty: bool) -> Result<(), ProjviewError> {
    match command {
        Command::Extract { archive, dest } => {
            let summary = extract_archive(&archive, &dest)?;
            print_json(&summary, pretty)
        }
        Command::Tree { root } => print_json(&build_tree(&root), pretty),
        Command::Read {
            root,
            path,
            max_size,
        } => {
            let reader = FileReader::new(ReaderBuilder::new().max_file_size(max_size).build());
            print_json(&reader.read_file(&root, &path)?, pretty)
        }
        Command::Bundle {
            root,
            format,
            binary_detection,
            ignore_patterns,
            file_size_limit,
            hidden,
            no_gitignore,
            text_only,
            output: destination,
        } => {
            let options = CollectBuilder::new(root)
                .respect_gitignore(!no_gitignore)
                .include_hidden(hidden)
                .ignore_patterns(ignore_patterns)
                .file_size_limit(file_size_limit.or(Some(projview::DEFAULT_MAX_FILE_SIZE)))
                .binary_detection(binary_detection)
                .skip_binary(text_only)
                .skip_empty(text_only)
                .build();
            let bundle = collect_sources(options)?;
            match destination {
                Some(path) => output::write_bundle_to_file(&bundle, format.into(), path, pretty),
                None => {
                    print!("{}", output::format_bundle(&bundle, format.into(), pretty)?);
                    Ok(())
                }
            }
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), ProjviewError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
