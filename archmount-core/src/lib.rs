//! Mount ZIP and RAR archives as volumes using external FUSE helpers
//! (`fuse-zip`, `rar2fs`), and find or eject the volumes mounted that way.
//!
//! ```no_run
//! use archmount_core::{Config, Mounter, VolumeEnumerator};
//!
//! let config = Config::default();
//! archmount_core::check_fuse_installed(&config.fuse_probe)?;
//!
//! let mounter = Mounter::new(config.clone());
//! let request = mounter.request("/Users/me/photos.zip");
//! let mount_point = mounter.mount(&request)?;
//!
//! let volumes = VolumeEnumerator::new(&config).list_mounted_volumes()?;
//! assert!(volumes.iter().any(|v| v.mount_point == mount_point));
//! # Ok::<(), archmount_core::Error>(())
//! ```

mod config;
mod dependency;
mod error;
mod helper;
mod monitor;
mod mount;
mod options;
mod process;
pub mod volume;

pub use config::{
    fs_type_matches, Config, DEFAULT_FUSE_FS_TYPES, DEFAULT_FUSE_PROBE, FUSE_HOME_PAGE,
    MOUNT_POINT_MARKER,
};
pub use dependency::check_fuse_installed;
pub use error::{Error, Result};
pub use helper::{HelperDescriptor, HelperTable};
pub use monitor::{SubscriptionId, VolumeMonitor};
pub use mount::{unique_mount_point, MountRequest, Mounter};
pub use options::{compose_options, escape_value, MountFlags};
pub use process::{ProcessResult, ProcessRunner, SystemRunner};
pub use volume::{MountEntry, MountTable, MountedVolume, SystemMountTable, VolumeEnumerator};
