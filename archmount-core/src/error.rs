use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot open \"{extension}\" archives")]
    UnsupportedFormat { extension: String },

    #[error("Cannot run `{}`", .program.display())]
    SpawnFailure {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create mount point `{}`", .path.display())]
    MountPointCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Mounting `{}` failed with exit code {exit_code}: {stderr}", .archive.display())]
    MountFailed {
        archive: PathBuf,
        exit_code: i32,
        stderr: String,
    },

    #[error("Cannot unmount `{}`: {detail}", .mount_point.display())]
    UnmountFailed { mount_point: PathBuf, detail: String },

    #[error("FUSE driver not found at `{}`", .path.display())]
    DependencyMissing { path: PathBuf },

    #[error("{0}")]
    InvalidRequest(&'static str),

    #[error("Invalid helper table: {reason}")]
    InvalidHelperTable { reason: String },

    #[error("Cannot read the mount table")]
    MountTable {
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Short, alert-style summary of the failure. The `Display` output is the
    /// longer description.
    pub fn title(&self) -> &'static str {
        match self {
            Error::UnsupportedFormat { .. } => "Unsupported file type",
            Error::SpawnFailure { .. } => "Command failed to run",
            Error::MountPointCreationFailed { .. } => "Failed to create temporary directory",
            Error::MountFailed { .. } => "Unable to mount archive",
            Error::UnmountFailed { .. } => "Error unmounting volume",
            Error::DependencyMissing { .. } => "FUSE is not installed",
            Error::InvalidRequest(_) => "Invalid input",
            Error::InvalidHelperTable { .. } => "Invalid helper configuration",
            Error::MountTable { .. } => "Cannot enumerate volumes",
        }
    }
}
