//! Discovery and teardown of volumes mounted by this crate.
//!
//! Nothing is cached: mounts come and go behind our back (Finder ejects,
//! helpers crashing, `umount` from a shell), so every listing is a fresh scan
//! of the operating system's mount table.

mod table;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{fs_type_matches, Config};
use crate::error::{Error, Result};
use crate::process::{ProcessRunner, SystemRunner};

pub use table::{parse_proc_mounts, SystemMountTable};

/// One row of the OS mount table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub mount_point: PathBuf,
    pub device: Option<String>,
    pub fs_type: String,
    pub volume_name: Option<String>,
}

pub trait MountTable {
    fn entries(&self) -> Result<Vec<MountEntry>>;
}

impl<T: MountTable + ?Sized> MountTable for &T {
    fn entries(&self) -> Result<Vec<MountEntry>> {
        (**self).entries()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MountedVolume {
    #[serde(rename = "name")]
    pub display_name: String,
    pub mount_point: PathBuf,
    /// Backing source as reported by the kernel; the archive path for helper
    /// mounts.
    pub device: String,
}

pub struct VolumeEnumerator<T = SystemMountTable, R = SystemRunner> {
    table: T,
    runner: R,
    marker: String,
    fs_types: Vec<String>,
    unmount_command: Vec<String>,
}

impl VolumeEnumerator<SystemMountTable, SystemRunner> {
    pub fn new(config: &Config) -> VolumeEnumerator<SystemMountTable, SystemRunner> {
        VolumeEnumerator::with_parts(
            SystemMountTable,
            SystemRunner,
            &config.marker,
            config.fs_types.clone(),
            config.unmount_command.clone(),
        )
    }
}

impl<T: MountTable, R: ProcessRunner> VolumeEnumerator<T, R> {
    pub fn with_parts(
        table: T,
        runner: R,
        marker: &str,
        fs_types: Vec<String>,
        unmount_command: Vec<String>,
    ) -> VolumeEnumerator<T, R> {
        VolumeEnumerator {
            table,
            runner,
            marker: marker.to_string(),
            fs_types,
            unmount_command,
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn list_mounted_volumes(&self) -> Result<Vec<MountedVolume>> {
        let marker = OsStr::new(&self.marker);
        let mut volumes = vec![];

        for entry in self.table.entries()? {
            if entry.mount_point.file_name() != Some(marker) {
                continue;
            }
            if !fs_type_matches(&entry.fs_type, &self.fs_types) {
                tracing::debug!(
                    mount_point = %entry.mount_point.display(),
                    fs_type = %entry.fs_type,
                    "not a FUSE mount; skipping"
                );
                continue;
            }

            let display_name = match entry.volume_name {
                Some(v) => v,
                None => {
                    tracing::warn!(
                        mount_point = %entry.mount_point.display(),
                        "volume name is not available; skipping"
                    );
                    continue;
                }
            };
            let device = match entry.device {
                Some(v) => v,
                None => {
                    tracing::warn!(
                        mount_point = %entry.mount_point.display(),
                        "device name is not available; skipping"
                    );
                    continue;
                }
            };

            volumes.push(MountedVolume {
                display_name,
                mount_point: entry.mount_point,
                device,
            });
        }

        tracing::debug!(count = volumes.len(), "enumerated volumes");
        Ok(volumes)
    }

    /// Ejects the volume at `mount_point`. A failure leaves the mount table
    /// untouched; the next enumeration reports whatever the OS has.
    pub fn unmount(&self, mount_point: &Path) -> Result<()> {
        let (program, leading) =
            self.unmount_command
                .split_first()
                .ok_or_else(|| Error::UnmountFailed {
                    mount_point: mount_point.to_path_buf(),
                    detail: "no unmount command configured".into(),
                })?;

        let mut args = leading.to_vec();
        args.push(mount_point.to_string_lossy().into_owned());

        tracing::info!(mount_point = %mount_point.display(), "unmounting");

        let result = match self.runner.run(Path::new(program), &args) {
            Ok(v) => v,
            Err(e) => {
                return Err(Error::UnmountFailed {
                    mount_point: mount_point.to_path_buf(),
                    detail: e.to_string(),
                })
            }
        };

        if !result.success() {
            let detail = match result.stderr.trim() {
                "" => format!("`{}` exited with code {}", program, result.exit_code),
                stderr => stderr.to_string(),
            };
            return Err(Error::UnmountFailed {
                mount_point: mount_point.to_path_buf(),
                detail,
            });
        }

        Ok(())
    }

    /// Attempts to unmount every listed volume, carrying on past failures.
    pub fn unmount_all(&self) -> Result<Vec<(MountedVolume, Result<()>)>> {
        let volumes = self.list_mounted_volumes()?;

        Ok(volumes
            .into_iter()
            .map(|volume| {
                let outcome = self.unmount(&volume.mount_point);
                if let Err(e) = &outcome {
                    tracing::warn!(volume = %volume.display_name, error = %e, "unmount failed");
                }
                (volume, outcome)
            })
            .collect())
    }
}
