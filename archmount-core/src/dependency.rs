use std::path::Path;

use crate::error::{Error, Result};

/// Fails with [`Error::DependencyMissing`] unless the FUSE driver marker at
/// `probe` exists.
pub fn check_fuse_installed(probe: &Path) -> Result<()> {
    if probe.exists() {
        tracing::debug!(probe = %probe.display(), "FUSE driver found");
        Ok(())
    } else {
        Err(Error::DependencyMissing {
            path: probe.to_path_buf(),
        })
    }
}
