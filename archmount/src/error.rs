use std::path::PathBuf;

use miette::Diagnostic;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum Error {
    #[error("FUSE for macOS is not installed")]
    #[diagnostic(help(
        "Please download and install the latest version from https://osxfuse.github.io/"
    ))]
    DependencyMissing {
        #[source]
        source: archmount_core::Error,
    },

    #[error("Cannot open archive `{}`", .path.display())]
    OpenArchive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{title}: `{}`", .archive.display())]
    Mount {
        title: &'static str,
        archive: PathBuf,
        #[source]
        source: archmount_core::Error,
        #[help]
        help: Option<String>,
    },

    #[error("{title}: `{}`", .mount_point.display())]
    Unmount {
        title: &'static str,
        mount_point: PathBuf,
        #[source]
        source: archmount_core::Error,
    },

    #[error("{failed} of {total} volumes could not be unmounted")]
    UnmountIncomplete { failed: usize, total: usize },

    #[error("Cannot enumerate mounted volumes")]
    ListVolumes {
        #[source]
        source: archmount_core::Error,
    },

    #[error("Cannot open helper table `{}`", .path.display())]
    OpenHelperTable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot load helper table `{}`", .path.display())]
    #[diagnostic(help(
        "Expected a JSON array of objects with `extension` and `executable` keys"
    ))]
    HelperTable {
        path: PathBuf,
        #[source]
        source: archmount_core::Error,
    },

    #[error("Cannot encode output")]
    Json {
        #[source]
        source: serde_json::Error,
    },

    #[error("Background task stopped unexpectedly")]
    Worker {
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("Cannot listen for interrupt signal")]
    Signal {
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn mount(archive: PathBuf, source: archmount_core::Error) -> Error {
        use archmount_core::Error::*;

        let help = match &source {
            UnsupportedFormat { .. } => {
                Some("Run `archmount formats` to see which archives can be mounted".to_string())
            }
            SpawnFailure { .. } => {
                Some("Check --helpers-dir points at the bundled helper executables".to_string())
            }
            InvalidRequest(_) => Some("Pass a non-empty --volume-name".to_string()),
            _ => None,
        };

        Error::Mount {
            title: source.title(),
            archive,
            source,
            help,
        }
    }

    pub fn unmount(mount_point: PathBuf, source: archmount_core::Error) -> Error {
        Error::Unmount {
            title: source.title(),
            mount_point,
            source,
        }
    }
}
