// src/hash.rs

//! SHA-256 helpers for package manifests and package ids
//!
//! Digests are always rendered as lowercase hex so they can be compared
//! as plain strings and written straight into TOML.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const BUFFER_SIZE: usize = 64 * 1024;

/// Hash a byte slice
pub fn hash_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Hash everything a reader yields
pub fn hash_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Hash a file's contents without loading it into memory
pub fn hash_file(path: &Path) -> io::Result<String> {
    hash_reader(File::open(path)?)
}
