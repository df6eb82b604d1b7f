use std::fs::File;
use std::path::PathBuf;

use archmount_core::{Config, HelperTable};
use clap::{Parser, Subcommand};

use crate::error::{Error, Result};

#[derive(Debug, Parser)]
#[command(
    name = "archmount",
    about = "Mount ZIP and RAR archives as volumes.",
    version
)]
pub struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(visible_alias = "m", about = "Mount an archive")]
    Mount(MountArgs),

    #[command(visible_aliases = ["u", "eject"], about = "Unmount mounted archives")]
    Unmount(UnmountArgs),

    #[command(visible_aliases = ["l", "ls"], about = "List mounted archives")]
    List(ListArgs),

    #[command(about = "Print changes to the list of mounted archives")]
    Watch(WatchArgs),

    #[command(about = "Show supported archive formats and their helpers")]
    Formats,
}

#[derive(Debug, clap::Args)]
pub struct ConfigArgs {
    /// Directory containing the mount helper executables
    #[arg(long, global = true, env = "ARCHMOUNT_HELPERS_DIR", value_name = "DIR")]
    pub helpers_dir: Option<PathBuf>,

    /// JSON file mapping archive extensions to helpers
    #[arg(long, global = true, env = "ARCHMOUNT_HELPER_TABLE", value_name = "FILE")]
    pub helper_table: Option<PathBuf>,

    /// Parent directory for new mount points (defaults to the system temp dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    /// File whose presence shows that the FUSE driver is installed
    #[arg(long, global = true, value_name = "PATH")]
    pub fuse_probe: Option<PathBuf>,

    /// Filesystem type of listed mounts; subtypes (`fuse.fuse-zip`) match too
    #[arg(long = "fs-type", global = true, value_name = "TYPE", value_delimiter = ',')]
    pub fs_types: Vec<String>,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<Config> {
        let mut config = Config::default();

        if let Some(path) = &self.helper_table {
            let file = File::open(path).map_err(|source| Error::OpenHelperTable {
                path: path.clone(),
                source,
            })?;
            config.helpers =
                HelperTable::from_json_reader(file).map_err(|source| Error::HelperTable {
                    path: path.clone(),
                    source,
                })?;
        }
        if let Some(dir) = &self.helpers_dir {
            config.helpers_dir = dir.clone();
        }
        if let Some(dir) = &self.temp_dir {
            config.temp_dir = dir.clone();
        }
        if let Some(probe) = &self.fuse_probe {
            config.fuse_probe = probe.clone();
        }
        if !self.fs_types.is_empty() {
            config.fs_types = self.fs_types.clone();
        }

        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }
}

#[derive(Debug, clap::Args)]
pub struct MountArgs {
    /// Path to the archive to mount
    pub archive: PathBuf,

    /// Volume name (defaults to the archive name without extension)
    #[arg(short = 'n', long)]
    pub volume_name: Option<String>,

    /// Encoding of file names inside the archive, e.g. cp866
    #[arg(short = 'e', long)]
    pub encoding: Option<String>,

    /// Mount read-write instead of read-only
    #[arg(short = 'w', long)]
    pub read_write: bool,

    /// Mark the volume as local
    #[arg(long)]
    pub local: bool,

    /// Disallow ._ and .DS_Store files on the volume
    #[arg(long)]
    pub no_apple_double: bool,

    /// Show the mounted volume in the file manager
    #[arg(short = 'o', long)]
    pub open: bool,

    /// Suppress progress output
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

#[derive(Debug, clap::Args)]
pub struct UnmountArgs {
    /// Mount points to unmount
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub mount_points: Vec<PathBuf>,

    /// Unmount every mounted archive
    #[arg(short = 'a', long)]
    pub all: bool,
}

#[derive(Debug, clap::Args)]
pub struct ListArgs {
    /// Output in JSON format
    #[arg(short = 'j', long)]
    pub json: bool,
}

#[derive(Debug, clap::Args)]
pub struct WatchArgs {
    /// Seconds between mount table scans
    #[arg(short = 'i', long, default_value_t = 2, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,
}
