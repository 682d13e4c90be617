use crate::error::{IoContext, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Hex encoded SHA-256 of a file, read in fixed-size chunks
pub fn sha256_file<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let path = file_path.as_ref();
    let mut file = File::open(path).io_context(|| format!("Failed to open file: {:?}", path))?;

    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .io_context(|| format!("Failed to read from file: {:?}", path))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
