use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lz4s_core::{Decoded, Decoder, DecoderConfig};

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "lz4s",
    about = "Decompress and inspect chunked LZ4 streams",
    version
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decompress a chunked LZ4 stream back to raw bytes
    Decompress {
        /// Source stream ("-" reads stdin)
        input: PathBuf,
        /// Destination file ("-" writes to stdout)
        output: PathBuf,
        /// Require every compressed block to use exactly its declared compressed length
        #[arg(long)]
        strict: bool,
        /// Refuse streams that declare more than this many decoded bytes
        #[arg(long)]
        max_output: Option<u64>,
    },
    /// Decode a stream and print chunk statistics
    Inspect {
        /// Stream to inspect ("-" reads stdin)
        file: PathBuf,
        /// Print per-chunk details
        #[arg(long)]
        chunks: bool,
    },
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_input(path: &Path) -> anyhow::Result<Box<dyn Read>> {
    if path.to_str() == Some("-") {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path).with_context(|| format!("opening input file {:?}", path))?;
    Ok(Box::new(file))
}

fn decode_path(path: &Path, config: DecoderConfig) -> anyhow::Result<Decoded> {
    let input = open_input(path)?;
    Decoder::with_config(input, config)
        .finish()
        .with_context(|| format!("decoding {:?}", path))
}

fn human_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut v = n as f64;
    let mut unit = 0;
    while v >= 1024.0 && unit < UNITS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", n)
    } else {
        format!("{:.2} {}", v, UNITS[unit])
    }
}

// ── Subcommand implementations ─────────────────────────────────────────────

fn run_decompress(
    input: PathBuf,
    output: PathBuf,
    strict: bool,
    max_output: Option<u64>,
) -> anyhow::Result<()> {
    let config = DecoderConfig {
        strict_compressed_length: strict,
        max_output,
    };

    let t0 = Instant::now();
    let decoded = decode_path(&input, config)?;
    let elapsed = t0.elapsed();

    let mut dst: Box<dyn Write> = if output.to_str() == Some("-") {
        Box::new(io::stdout().lock())
    } else {
        Box::new(
            File::create(&output).with_context(|| format!("creating output file {:?}", output))?,
        )
    };
    dst.write_all(&decoded.data)?;
    dst.flush()?;

    eprintln!("  chunks      : {}", decoded.chunks.len());
    eprintln!("  raw size    : {}", human_bytes(decoded.raw_size()));
    eprintln!("  compressed  : {}", human_bytes(decoded.compressed_size()));
    eprintln!(
        "  throughput  : {}/s",
        human_bytes((decoded.raw_size() as f64 / elapsed.as_secs_f64()) as u64)
    );
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

fn run_inspect(file: PathBuf, show_chunks: bool) -> anyhow::Result<()> {
    let decoded = decode_path(&file, DecoderConfig::default())?;
    let compressed = decoded
        .chunks
        .iter()
        .filter(|c| c.header.is_compressed())
        .count();

    println!("=== LZ4 stream: {:?} ===", file);
    println!();
    println!("  chunks         : {}", decoded.chunks.len());
    println!("  compressed     : {}", compressed);
    println!("  stored raw     : {}", decoded.chunks.len() - compressed);
    println!("  raw size       : {}", human_bytes(decoded.raw_size()));
    println!("  payload size   : {}", human_bytes(decoded.compressed_size()));
    println!("  ratio          : {:.2}x", decoded.ratio());

    if show_chunks {
        println!();
        println!(
            "  {:>8}  {:>12}  {:>6}  {:>5}  {:>12}  {:>12}  {:>7}",
            "chunk", "offset", "type", "flags", "original", "payload", "ratio"
        );
        println!("  {}", "-".repeat(74));
        for (i, c) in decoded.chunks.iter().enumerate() {
            let h = c.header;
            let flags = match (h.is_compressed(), h.is_high_compression()) {
                (true, true) => "C|HC",
                (true, false) => "C",
                (false, true) => "HC",
                (false, false) => "-",
            };
            println!(
                "  {:>8}  {:>12}  {:>#6x}  {:>5}  {:>12}  {:>12}  {:>7.3}",
                i,
                c.offset,
                h.chunk_type,
                flags,
                h.original_length,
                h.payload_length(),
                h.ratio()
            );
        }
    }

    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Decompress {
            input,
            output,
            strict,
            max_output,
        } => run_decompress(input, output, strict, max_output),
        Commands::Inspect { file, chunks } => run_inspect(file, chunks),
    }
}
