//! aicarrier - encrypted audio-to-image carrier codec.
//!
//! Converts an arbitrary binary payload (typically an audio file) into a set
//! of encrypted lossless RGB images and back, byte-for-byte:
//! - AES-256-GCM authenticated encryption, header bound as associated data
//! - HKDF-SHA256 per-user key derivation from a caller-supplied master key
//! - zstd compression when it actually shrinks the chunk
//! - SHA-256 integrity verification of every recovered chunk
//!
//! The public boundary is [`processor::encode`] and [`processor::decode`];
//! the CLI in [`app`] is a thin transport over it.

pub mod app;
pub mod assembler;
pub mod compression;
pub mod config;
pub mod error;
pub mod frame;
pub mod header;
pub mod key;
pub mod pixels;
pub mod planner;
pub mod processor;
pub mod types;
pub mod wav;
