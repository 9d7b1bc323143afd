use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use memmap2::Mmap;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use filepart_core::assemble::{reassemble, ChunkSource};
use filepart_core::chunk::ChunkRecord;
use filepart_core::error::FilepartError;
use filepart_core::manifest::{manifest_file_name, ChunkEntry, Manifest};
use filepart_core::split::{split, SplitConfig};
use filepart_core::verify::verify;

const DEFAULT_CHUNK: &str = "1M";

#[derive(Parser)]
#[command(name = "filepart", version, about = "Split files into checksummed text chunks and reassemble them")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Split a file into chunk records plus a manifest
    Split {
        input: PathBuf,
        /// Chunk size in bytes; accepts K/M/G suffixes
        #[arg(long, default_value = DEFAULT_CHUNK)]
        chunk_size: String,
        /// Directory to write the manifest and chunk records into
        #[arg(long, default_value = ".")]
        output: PathBuf,
    },
    /// Rebuild the original file from a manifest and its chunk records
    Reassemble {
        manifest: PathBuf,
        /// Directory to write the rebuilt file into
        #[arg(long, default_value = ".")]
        output: PathBuf,
    },
    /// Check chunk records against a manifest without writing anything
    Verify { manifest: PathBuf },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Split { input, chunk_size, output } => cmd_split(&input, &chunk_size, &output),
        Cmd::Reassemble { manifest, output } => cmd_reassemble(&manifest, &output),
        Cmd::Verify { manifest } => cmd_verify(&manifest),
    }
}

fn parse_size(spec: &str) -> Result<usize> {
    let s = spec.trim().to_uppercase();
    let (num, mul) = if s.ends_with('K') {
        (&s[..s.len() - 1], 1usize << 10)
    } else if s.ends_with('M') {
        (&s[..s.len() - 1], 1 << 20)
    } else if s.ends_with('G') {
        (&s[..s.len() - 1], 1 << 30)
    } else {
        (&s[..], 1)
    };
    let v: usize = num.parse().map_err(|_| anyhow!("bad chunk size {}", spec))?;
    Ok(v * mul)
}

/// Reads chunk records from the directory the manifest lives in. A
/// record that is absent or does not parse is reported as missing; the
/// core draws the finer corruption distinctions itself.
struct DirChunkSource {
    dir: PathBuf,
}

impl ChunkSource for DirChunkSource {
    fn load(&mut self, entry: &ChunkEntry) -> Result<ChunkRecord, FilepartError> {
        let path = self.dir.join(&entry.chunk_file);
        let missing = |reason: String| FilepartError::ChunkMissing {
            chunk_file: entry.chunk_file.clone(),
            chunk_number: entry.chunk_number,
            reason,
        };
        let f = File::open(&path).map_err(|e| missing(format!("{}: {e}", path.display())))?;
        serde_json::from_reader(f).map_err(|e| missing(format!("{}: {e}", path.display())))
    }
}

fn write_record<T: serde::Serialize>(path: &Path, record: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(record)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn read_manifest(path: &Path) -> Result<Manifest> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    serde_json::from_reader(f).with_context(|| format!("parse manifest {}", path.display()))
}

fn cmd_split(input: &Path, chunk_size: &str, output: &Path) -> Result<()> {
    let chunk_size = parse_size(chunk_size)?;
    let file_name = input
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("input has no usable file name: {}", input.display()))?
        .to_string();

    let f = File::open(input).with_context(|| format!("open {}", input.display()))?;
    let len = f.metadata()?.len();
    // Zero-length files cannot be mapped; the core treats an empty
    // slice as a single empty chunk.
    let mmap;
    let bytes: &[u8] = if len == 0 {
        &[]
    } else {
        mmap = unsafe { Mmap::map(&f) }.with_context(|| format!("map {}", input.display()))?;
        &mmap
    };

    let out = split(bytes, &file_name, &SplitConfig { chunk_size })?;

    fs::create_dir_all(output).with_context(|| format!("create dir {}", output.display()))?;
    for (record, entry) in out.chunks.iter().zip(&out.manifest.chunks) {
        write_record(&output.join(&entry.chunk_file), record)?;
    }
    let manifest_path = output.join(manifest_file_name(&file_name));
    write_record(&manifest_path, &out.manifest)?;

    info!(chunks = out.chunks.len(), manifest = %manifest_path.display(), "split complete");
    println!("{}", manifest_path.display());
    Ok(())
}

fn cmd_reassemble(manifest_path: &Path, output: &Path) -> Result<()> {
    let manifest = read_manifest(manifest_path)?;
    let dir = manifest_path.parent().map(Path::to_path_buf).unwrap_or_default();

    let bytes = reassemble(&manifest, &mut DirChunkSource { dir })?;

    fs::create_dir_all(output).with_context(|| format!("create dir {}", output.display()))?;
    let out_path = output.join(format!("reassembled_{}", manifest.file_name));
    fs::write(&out_path, &bytes).with_context(|| format!("write {}", out_path.display()))?;

    info!(bytes = bytes.len(), output = %out_path.display(), "reassembled, checksums verified");
    println!("{}", out_path.display());
    Ok(())
}

fn cmd_verify(manifest_path: &Path) -> Result<()> {
    let manifest = read_manifest(manifest_path)?;
    let dir = manifest_path.parent().map(Path::to_path_buf).unwrap_or_default();

    let report = verify(&manifest, &mut DirChunkSource { dir })?;
    eprintln!(
        "Chunks ok={}, bad={}; whole-file={}",
        report.chunks_ok,
        report.chunks_bad,
        if report.whole_ok { "OK" } else { "MISMATCH" }
    );
    if report.chunks_bad == 0 && report.whole_ok {
        println!("OK");
    } else {
        println!("BAD");
    }
    Ok(())
}
