//! Mounting through real (scripted) helper executables.
//!
//! The scripts stand in for `fuse-zip`: they record their arguments and append
//! a `/proc/self/mounts`-style line to a file that a test mount table reads
//! back, so the full mount → list cycle runs without a FUSE driver.
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use archmount_core::volume::parse_proc_mounts;
use archmount_core::{
    Config, Error, MountEntry, MountTable, Mounter, SystemRunner, VolumeEnumerator,
};
use tempfile::TempDir;

struct FileMountTable(PathBuf);

impl MountTable for FileMountTable {
    fn entries(&self) -> archmount_core::Result<Vec<MountEntry>> {
        let content = std::fs::read_to_string(&self.0).unwrap_or_default();
        Ok(parse_proc_mounts(&content))
    }
}

struct Fixture {
    dir: TempDir,
    config: Config,
}

impl Fixture {
    fn new() -> Fixture {
        let dir = TempDir::new().unwrap();
        let helpers_dir = dir.path().join("Executables");
        let temp_dir = dir.path().join("tmp");
        std::fs::create_dir_all(&helpers_dir).unwrap();
        std::fs::create_dir_all(&temp_dir).unwrap();

        let config = Config {
            helpers_dir,
            temp_dir,
            ..Config::default()
        };
        Fixture { dir, config }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn install_helper(&self, name: &str, body: &str) {
        let path = self.config.helpers_dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn install_recording_helper(&self, name: &str) {
        self.install_helper(
            name,
            &format!(
                "printf '%s\\n' \"$@\" > '{args}'\n\
                 printf '%s %s fuse.{name} ro 0 0\\n' \"$3\" \"$4\" >> '{mounts}'",
                args = self.path("args").display(),
                mounts = self.path("mounts").display(),
                name = name,
            ),
        );
    }

    fn recorded_args(&self) -> Vec<String> {
        std::fs::read_to_string(self.path("args"))
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    fn enumerator(&self) -> VolumeEnumerator<FileMountTable, SystemRunner> {
        VolumeEnumerator::with_parts(
            FileMountTable(self.path("mounts")),
            SystemRunner,
            &self.config.marker,
            vec!["fuse".into()],
            vec!["false".into()],
        )
    }
}

#[test]
fn mounting_a_zip_end_to_end() {
    let fixture = Fixture::new();
    fixture.install_recording_helper("fuse-zip");

    let archive = fixture.path("archive.zip");
    std::fs::write(&archive, b"PK").unwrap();

    let mounter = Mounter::new(fixture.config.clone());
    let request = mounter.request(&archive);
    let mount_point = mounter.mount(&request).unwrap();

    assert!(mount_point.is_dir());
    assert_eq!(mount_point.file_name().unwrap(), "_ArchiveMounter");
    assert!(mount_point.starts_with(&fixture.config.temp_dir));

    assert_eq!(
        fixture.recorded_args(),
        vec![
            "-o".to_string(),
            format!("volname=archive,fsname={},rdonly", archive.display()),
            archive.display().to_string(),
            mount_point.display().to_string(),
        ]
    );

    let volumes = fixture.enumerator().list_mounted_volumes().unwrap();
    assert_eq!(volumes.len(), 1);
    assert_eq!(volumes[0].mount_point, mount_point);
    assert_eq!(volumes[0].device, archive.display().to_string());
    assert_eq!(volumes[0].display_name, "archive");
}

#[test]
fn helper_stderr_is_reported_verbatim() {
    let fixture = Fixture::new();
    fixture.install_helper(
        "rar2fs",
        "printf 'rar2fs: unsupported RAR version\\nsecond line' >&2\nexit 4",
    );

    let mounter = Mounter::new(fixture.config.clone());
    let request = mounter.request(fixture.path("broken.rar"));

    match mounter.mount(&request) {
        Err(Error::MountFailed {
            exit_code, stderr, ..
        }) => {
            assert_eq!(exit_code, 4);
            assert_eq!(stderr, "rar2fs: unsupported RAR version\nsecond line");
        }
        other => panic!("expected MountFailed, got {:?}", other),
    }
    assert!(fixture.enumerator().list_mounted_volumes().unwrap().is_empty());
}

#[test]
fn zero_exit_is_success_whatever_stdout_says() {
    let fixture = Fixture::new();
    fixture.install_helper("fuse-zip", "echo 'error: this looks bad'");

    let mounter = Mounter::new(fixture.config.clone());
    let request = mounter.request(fixture.path("a.zip"));
    assert_eq!(mounter.mount(&request).unwrap(), request.mount_point);
}

#[test]
fn missing_helper_is_spawn_failure() {
    let fixture = Fixture::new();

    let mounter = Mounter::new(fixture.config.clone());
    let request = mounter.request(fixture.path("a.zip"));

    match mounter.mount(&request) {
        Err(Error::SpawnFailure { program, .. }) => {
            assert_eq!(program, fixture.config.helpers_dir.join("fuse-zip"))
        }
        other => panic!("expected SpawnFailure, got {:?}", other),
    }
}

#[test]
fn concurrent_mounts_of_one_archive_get_separate_mount_points() {
    let fixture = Fixture::new();
    fixture.install_recording_helper("fuse-zip");

    let archive = fixture.path("same.zip");
    let mounter = Mounter::new(fixture.config.clone());
    let first = mounter.mount(&mounter.request(&archive)).unwrap();
    let second = mounter.mount(&mounter.request(&archive)).unwrap();

    assert_ne!(first, second);
    assert_eq!(fixture.enumerator().list_mounted_volumes().unwrap().len(), 2);
}

#[test]
fn failing_eject_command_is_unmount_failed() {
    let fixture = Fixture::new();
    match fixture
        .enumerator()
        .unmount(Path::new("/tmp/X/_ArchiveMounter"))
    {
        Err(Error::UnmountFailed { detail, .. }) => {
            assert_eq!(detail, "`false` exited with code 1")
        }
        other => panic!("expected UnmountFailed, got {:?}", other),
    }
}
