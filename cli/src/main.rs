use adstream_core::{CopyOptions, StreamError, StreamManager, DEFAULT_CHUNK_SIZE};
use adstream_platform::PlatformStreamManager;
use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "adstream")]
#[command(about = "List, add, extract and remove NTFS alternate data streams", long_about = None)]
struct Cli {
    /// File whose streams are listed or changed
    file: PathBuf,

    /// Bytes per read when copying a stream out
    #[arg(long, global = true, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// More log output (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every stream on the file, ::$DATA included
    #[command(alias = "list")]
    Ls {
        /// Print a JSON array instead of text lines
        #[arg(long)]
        json: bool,
    },
    /// Attach a stream whose content is copied from another file
    Add {
        /// File holding the content for the new stream
        source: PathBuf,
        /// Bare stream name, without colons or $DATA
        name: String,
    },
    /// Copy a stream out into an ordinary file, overwriting it
    #[command(alias = "copy")]
    Cp {
        /// Full stream name as listed, e.g. :name:$DATA
        stream: String,
        /// File to write the stream content to
        dest: PathBuf,
    },
    /// Delete a stream
    #[command(alias = "remove")]
    Rm {
        /// Full stream name as listed, e.g. :name:$DATA
        stream: String,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Wraps a stream error under the user-facing message, naming the path the
/// operation was addressing.
fn failed(err: StreamError, what: &str) -> anyhow::Error {
    let message = match err.path() {
        Some(path) => format!("{} ({})", what, path.display()),
        None => what.to_string(),
    };
    anyhow::Error::new(err).context(message)
}

/// Every command needs a readable host file.
fn ensure_readable(file: &Path) -> anyhow::Result<()> {
    File::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
    Ok(())
}

fn run(
    manager: &dyn StreamManager,
    file: &Path,
    command: Commands,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        Commands::Ls { json } => {
            let streams = manager
                .list_streams(file)
                .map_err(|e| failed(e, "Failed to list streams."))?;
            if json {
                serde_json::to_writer_pretty(&mut *out, &streams)?;
                writeln!(out)?;
            } else {
                for stream in &streams {
                    writeln!(out, "{} - {}", stream.name, stream.size)?;
                }
            }
        }
        Commands::Add { source, name } => {
            manager
                .add_stream(file, &source, &name)
                .map_err(|e| failed(e, "Failed to add a new stream."))?;
        }
        Commands::Cp { stream, dest } => {
            let copied = manager
                .copy_stream(file, &stream, &dest)
                .map_err(|e| failed(e, "Failed to copy stream."))?;
            tracing::info!("copied {} bytes into {}", copied, dest.display());
        }
        Commands::Rm { stream } => {
            manager
                .delete_stream(file, &stream)
                .map_err(|e| failed(e, "Failed to delete stream."))?;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    ensure_readable(&cli.file)?;

    let options = CopyOptions {
        chunk_size: cli.chunk_size,
    };
    options.validate()?;
    tracing::debug!("chunk size {}", options.chunk_size);

    let manager = PlatformStreamManager::new(options);
    let stdout = io::stdout();
    run(&manager, &cli.file, cli.command, &mut stdout.lock())
}
