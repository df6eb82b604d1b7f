use std::path::{Path, PathBuf};

use crate::helper::HelperTable;

/// Final path segment of every mount point created by this crate. Together
/// with a FUSE filesystem type it identifies our volumes in the mount table.
pub const MOUNT_POINT_MARKER: &str = "_ArchiveMounter";

#[cfg(target_os = "macos")]
pub const DEFAULT_FUSE_PROBE: &str = "/Library/Filesystems/osxfuse.fs/Contents/Resources/mount_osxfuse";
#[cfg(not(target_os = "macos"))]
pub const DEFAULT_FUSE_PROBE: &str = "/dev/fuse";

/// Filesystem types reported for FUSE mounts. On Linux the helper's name is
/// appended as a subtype (`fuse.fuse-zip`), which [`fs_type_matches`] accepts.
#[cfg(target_os = "macos")]
pub const DEFAULT_FUSE_FS_TYPES: &[&str] = &["osxfuse", "macfuse"];
#[cfg(not(target_os = "macos"))]
pub const DEFAULT_FUSE_FS_TYPES: &[&str] = &["fuse"];

pub const FUSE_HOME_PAGE: &str = "https://osxfuse.github.io/";

#[derive(Debug, Clone)]
pub struct Config {
    pub helpers: HelperTable,
    /// Directory containing the helper executables.
    pub helpers_dir: PathBuf,
    /// Parent of the per-mount unique directories.
    pub temp_dir: PathBuf,
    pub marker: String,
    /// Filesystem types a marker mount must have to be listed. Empty accepts
    /// any type.
    pub fs_types: Vec<String>,
    pub fuse_probe: PathBuf,
    /// Program and leading arguments; the mount point is appended.
    pub unmount_command: Vec<String>,
    /// Program used to show a directory in the file manager.
    pub reveal_command: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            helpers: HelperTable::default(),
            helpers_dir: default_helpers_dir(),
            temp_dir: std::env::temp_dir(),
            marker: MOUNT_POINT_MARKER.to_string(),
            fs_types: DEFAULT_FUSE_FS_TYPES.iter().map(|t| t.to_string()).collect(),
            fuse_probe: PathBuf::from(DEFAULT_FUSE_PROBE),
            unmount_command: default_unmount_command(),
            reveal_command: default_reveal_command(),
        }
    }
}

/// `fs_type` is accepted when it equals one of `accepted` or is a subtype of
/// one (`fuse.rar2fs` for `fuse`).
pub fn fs_type_matches(fs_type: &str, accepted: &[String]) -> bool {
    accepted.is_empty()
        || accepted.iter().any(|t| match fs_type.strip_prefix(t.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('.'),
            None => false,
        })
}

/// `Contents/Executables` of the application bundle the running binary lives
/// in (`Contents/MacOS/<binary>`). Falls back to the binary's own directory.
pub fn default_helpers_dir() -> PathBuf {
    let exe = match std::env::current_exe() {
        Ok(v) => v,
        Err(_) => return PathBuf::from("."),
    };
    let exe_dir = exe.parent().unwrap_or_else(|| Path::new("."));

    match exe_dir.parent() {
        Some(contents) if contents.join("Executables").is_dir() => contents.join("Executables"),
        _ => exe_dir.to_path_buf(),
    }
}

#[cfg(target_os = "macos")]
fn default_unmount_command() -> Vec<String> {
    vec!["/usr/sbin/diskutil".into(), "unmount".into()]
}

#[cfg(not(target_os = "macos"))]
fn default_unmount_command() -> Vec<String> {
    vec!["fusermount".into(), "-u".into()]
}

#[cfg(target_os = "macos")]
fn default_reveal_command() -> Vec<String> {
    vec!["/usr/bin/open".into()]
}

#[cfg(not(target_os = "macos"))]
fn default_reveal_command() -> Vec<String> {
    vec!["xdg-open".into()]
}
