//! Content digests for generated destinations.

use std::path::Path;

use sha2::{Digest as _, Sha256};

use crate::{application::ports::Filesystem, domain::Digest, error::RegenResult};

/// Digest a file or directory.
///
/// A file hashes its bytes. A directory hashes the concatenated bytes of
/// every contained file in sorted walk order. A missing path has no digest.
pub fn compute(fs: &dyn Filesystem, path: &Path) -> RegenResult<Option<Digest>> {
    if !fs.exists(path) {
        return Ok(None);
    }

    let mut hasher = Sha256::new();
    for file in fs.walk_files(path)? {
        hasher.update(fs.read_file(&file)?);
    }

    Ok(Some(Digest::from_hex(format!("{:x}", hasher.finalize()))))
}
