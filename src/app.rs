//! Command-line application: a thin shell over the encode/decode boundary.
//!
//! Owns file I/O, master-key resolution, and user-facing error translation.
//! The codec itself never touches the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::config::{APP_NAME, DEFAULT_MAX_CHUNK_BYTES, MASTER_KEY_ENV};
use crate::processor;
use crate::types::{Candidate, EncodeOptions};

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt an audio file into a set of carrier images.
    Encode {
        /// Input audio file.
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for the generated images.
        #[arg(short, long)]
        outdir: PathBuf,

        /// User id bound into key derivation.
        #[arg(short, long)]
        user: String,

        /// Master key as 64 hex characters (prefer the env var).
        #[arg(short, long)]
        master: Option<String>,

        /// Maximum raw payload bytes per image.
        #[arg(long, default_value_t = DEFAULT_MAX_CHUNK_BYTES)]
        max_chunk_bytes: usize,

        /// Disable zstd compression.
        #[arg(long)]
        no_compress: bool,
    },

    /// Recover the original audio file from carrier images.
    Decode {
        /// Directory containing the carrier images.
        #[arg(short, long)]
        indir: PathBuf,

        /// Recovered output file.
        #[arg(short, long)]
        out: PathBuf,

        /// User id used at encode time.
        #[arg(short, long)]
        user: String,

        /// Master key as 64 hex characters (prefer the env var).
        #[arg(short, long)]
        master: Option<String>,
    },
}

#[derive(Parser)]
#[command(
    name = "aicarrier",
    version,
    about = "Encrypts audio payloads into lossless carrier images and recovers them byte-for-byte."
)]
pub struct App {
    #[command(subcommand)]
    command: Commands,
}

impl App {
    pub fn init() -> Result<Self> {
        let subscriber = tracing_subscriber::fmt().with_target(false).finish();
        tracing::subscriber::set_global_default(subscriber)?;
        Ok(Self::parse())
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Encode { input, outdir, user, master, max_chunk_bytes, no_compress } => {
                run_encode(&input, &outdir, &user, master.as_deref(), max_chunk_bytes, !no_compress)
            }
            Commands::Decode { indir, out, user, master } => {
                run_decode(&indir, &out, &user, master.as_deref())
            }
        }
    }
}

/// Resolves the master key from the CLI argument or the environment.
fn resolve_master_key(arg: Option<&str>) -> Result<Vec<u8>> {
    let hex_key = match arg {
        Some(hex_key) => hex_key.to_owned(),
        None => std::env::var(MASTER_KEY_ENV)
            .with_context(|| format!("no master key given and {MASTER_KEY_ENV} is not set"))?,
    };

    hex::decode(hex_key.trim()).context("master key is not valid hexadecimal")
}

fn run_encode(
    input: &Path,
    outdir: &Path,
    user: &str,
    master: Option<&str>,
    max_chunk_bytes: usize,
    compress: bool,
) -> Result<()> {
    let master_key = resolve_master_key(master)?;
    let payload =
        fs::read(input).with_context(|| format!("failed to read input: {}", input.display()))?;

    let filename = input
        .file_name()
        .and_then(|name| name.to_str())
        .context("input path has no usable filename")?;

    let options = EncodeOptions { max_chunk_bytes, compress, ..EncodeOptions::default() };
    let images = processor::encode(&payload, filename, user, &master_key, &options)
        .with_context(|| format!("encoding failed: {}", input.display()))?;

    fs::create_dir_all(outdir)
        .with_context(|| format!("failed to create output directory: {}", outdir.display()))?;

    let stem = input.file_stem().and_then(|stem| stem.to_str()).unwrap_or(APP_NAME);
    let total = images.len();

    for encoded in &images {
        let name = format!("{stem}_part{:04}_of_{total:04}.png", encoded.chunk_index + 1);
        let path = outdir.join(&name);
        encoded
            .image
            .save(&path)
            .with_context(|| format!("failed to write image: {}", path.display()))?;
        info!(
            image = %name,
            payload_bytes = encoded.payload_len,
            width = encoded.image.width(),
            height = encoded.image.height(),
            "wrote carrier image"
        );
    }

    println!("✓ Encoded {} into {total} image(s) in {}", input.display(), outdir.display());
    Ok(())
}

fn run_decode(indir: &Path, out: &Path, user: &str, master: Option<&str>) -> Result<()> {
    let master_key = resolve_master_key(master)?;

    let mut paths: Vec<PathBuf> = fs::read_dir(indir)
        .with_context(|| format!("failed to read directory: {}", indir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            matches!(
                path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase).as_deref(),
                Some("png" | "tif" | "tiff")
            )
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        bail!("no PNG/TIFF images found in {}", indir.display());
    }

    let mut candidates = Vec::with_capacity(paths.len());
    for path in &paths {
        let label = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        match image::open(path) {
            Ok(img) => candidates.push(Candidate { label, image: img.to_rgb8() }),
            Err(e) => warn!(image = %label, error = %e, "skipping unreadable image"),
        }
    }

    let decoded = processor::decode(&candidates, user, &master_key)
        .with_context(|| format!("decoding failed: {}", indir.display()))?;

    fs::write(out, &decoded.bytes)
        .with_context(|| format!("failed to write output: {}", out.display()))?;

    for skipped in &decoded.skipped {
        println!("  skipped {}: {}", skipped.label, skipped.reason);
    }
    println!(
        "✓ Recovered {} ({} bytes from {} chunk(s), original name {:?})",
        out.display(),
        decoded.bytes.len(),
        decoded.total_chunks,
        decoded.filename
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KEY_SIZE;
    use tempfile::tempdir;

    fn test_master_hex() -> String {
        hex::encode(std::array::from_fn::<u8, KEY_SIZE, _>(|i| (i as u8).wrapping_mul(11).wrapping_add(7)))
    }

    #[test]
    fn test_resolve_master_key_rejects_bad_hex() {
        assert!(resolve_master_key(Some("not-hex")).is_err());
    }

    #[test]
    fn test_resolve_master_key_decodes() {
        let hex_key = test_master_hex();
        let key = resolve_master_key(Some(&hex_key)).unwrap();
        assert_eq!(key.len(), KEY_SIZE);
    }

    #[test]
    fn test_cli_file_roundtrip() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("clip.wav");
        let outdir = dir.path().join("images");
        let recovered = dir.path().join("recovered.wav");

        let payload: Vec<u8> = (0..2048u32).map(|i| (i % 241) as u8).collect();
        fs::write(&input, &payload).unwrap();

        let hex_key = test_master_hex();
        run_encode(&input, &outdir, "alice", Some(&hex_key), 600, true).unwrap();

        let images: Vec<_> = fs::read_dir(&outdir).unwrap().collect();
        assert_eq!(images.len(), 4); // ceil(2048 / 600)

        run_decode(&outdir, &recovered, "alice", Some(&hex_key)).unwrap();
        assert_eq!(fs::read(&recovered).unwrap(), payload);
    }

    #[test]
    fn test_cli_decode_wrong_user_fails() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("clip.wav");
        let outdir = dir.path().join("images");
        let recovered = dir.path().join("recovered.wav");

        fs::write(&input, vec![42u8; 512]).unwrap();

        let hex_key = test_master_hex();
        run_encode(&input, &outdir, "alice", Some(&hex_key), 1024, false).unwrap();
        assert!(run_decode(&outdir, &recovered, "bob", Some(&hex_key)).is_err());
        assert!(!recovered.exists());
    }
}
