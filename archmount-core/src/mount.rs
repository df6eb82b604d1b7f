use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::options::{compose_options, MountFlags};
use crate::process::{ProcessRunner, SystemRunner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountRequest {
    pub archive_path: PathBuf,
    pub mount_point: PathBuf,
    pub volume_name: String,
    pub encoding: Option<String>,
    pub read_only: bool,
    pub flags: MountFlags,
}

impl MountRequest {
    /// A read-only request named after the archive's base name without
    /// extension.
    pub fn new(archive_path: impl Into<PathBuf>, mount_point: impl Into<PathBuf>) -> MountRequest {
        let archive_path = archive_path.into();
        let volume_name = archive_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        MountRequest {
            archive_path,
            mount_point: mount_point.into(),
            volume_name,
            encoding: None,
            read_only: true,
            flags: MountFlags::default(),
        }
    }

    pub fn extension(&self) -> String {
        self.archive_path
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// `<temp_dir>/<random uuid>/<marker>`. The random parent keeps concurrent and
/// historical mounts apart.
pub fn unique_mount_point(temp_dir: &Path, marker: &str) -> PathBuf {
    temp_dir
        .join(Uuid::new_v4().to_string().to_uppercase())
        .join(marker)
}

pub struct Mounter<R = SystemRunner> {
    config: Config,
    runner: R,
}

impl Mounter<SystemRunner> {
    pub fn new(config: Config) -> Mounter<SystemRunner> {
        Mounter::with_runner(config, SystemRunner)
    }
}

impl<R: ProcessRunner> Mounter<R> {
    pub fn with_runner(config: Config, runner: R) -> Mounter<R> {
        Mounter { config, runner }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A default request for `archive_path` with a freshly generated mount point.
    pub fn request(&self, archive_path: impl Into<PathBuf>) -> MountRequest {
        MountRequest::new(
            archive_path,
            unique_mount_point(&self.config.temp_dir, &self.config.marker),
        )
    }

    /// Mounts the archive and returns its mount point.
    ///
    /// The helper's exit code is the only success signal. On failure the
    /// mount-point directory, if it was created, is left in place.
    pub fn mount(&self, request: &MountRequest) -> Result<PathBuf> {
        let helper = self.config.helpers.resolve(&request.extension())?;

        if request.volume_name.is_empty() {
            return Err(Error::InvalidRequest("Volume name can't be empty"));
        }

        std::fs::create_dir_all(&request.mount_point).map_err(|source| {
            Error::MountPointCreationFailed {
                path: request.mount_point.clone(),
                source,
            }
        })?;

        let options = compose_options(request, &helper.default_options);
        let args = vec![
            "-o".to_string(),
            options,
            request.archive_path.to_string_lossy().into_owned(),
            request.mount_point.to_string_lossy().into_owned(),
        ];

        let program = helper.executable_path(&self.config.helpers_dir);
        tracing::info!(
            archive = %request.archive_path.display(),
            mount_point = %request.mount_point.display(),
            helper = %helper.executable_name,
            "mounting"
        );

        let result = self.runner.run(&program, &args)?;
        if !result.success() {
            tracing::warn!(
                archive = %request.archive_path.display(),
                exit_code = result.exit_code,
                "helper failed"
            );
            return Err(Error::MountFailed {
                archive: request.archive_path.clone(),
                exit_code: result.exit_code,
                stderr: result.stderr,
            });
        }

        Ok(request.mount_point.clone())
    }

    /// Shows `path` in the platform file manager.
    pub fn reveal(&self, path: &Path) -> Result<()> {
        let (program, leading) = match self.config.reveal_command.split_first() {
            Some(v) => v,
            None => return Ok(()),
        };

        let mut args = leading.to_vec();
        args.push(path.to_string_lossy().into_owned());

        let result = self.runner.run(Path::new(program), &args)?;
        if !result.success() {
            tracing::warn!(path = %path.display(), stderr = %result.stderr, "cannot reveal");
        }
        Ok(())
    }
}
