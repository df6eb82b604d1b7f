use std::time::Duration;

use archmount_core::{MountRequest, MountedVolume};
use indicatif::{ProgressBar, ProgressStyle};

/// Shown while the helper starts up; it returns once the volume is mounted.
/// Hidden with `--quiet`, so callers can finish it unconditionally.
pub fn mount_spinner(request: &MountRequest, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner().template("{spinner:.green} {msg} {elapsed:.dim}");
    if let Ok(style) = style {
        pb.set_style(style);
    }
    pb.set_message(format!(
        "Mounting {} ({}{})",
        request.volume_name,
        request.extension(),
        if request.read_only { ", read-only" } else { "" },
    ));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// One line per volume: name, backing archive, mount point.
pub fn format_volume(volume: &MountedVolume) -> String {
    format!(
        "{:<24}  {:<40}  {}",
        volume.display_name,
        volume.device,
        volume.mount_point.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn mount_spinner_names_the_volume() {
        let request = MountRequest::new("/data/photos.zip", "/tmp/A/_ArchiveMounter");
        let pb = mount_spinner(&request, false);
        assert_eq!(pb.message(), "Mounting photos (zip, read-only)");
        pb.finish_and_clear();
    }

    #[test]
    fn quiet_mount_spinner_is_hidden() {
        let request = MountRequest::new("/data/photos.zip", "/tmp/A/_ArchiveMounter");
        assert!(mount_spinner(&request, true).is_hidden());
    }

    #[test]
    fn volume_line_keeps_all_three_fields() {
        let line = format_volume(&MountedVolume {
            display_name: "photos".into(),
            mount_point: PathBuf::from("/tmp/A/_ArchiveMounter"),
            device: "/data/photos.zip".into(),
        });
        assert!(line.starts_with("photos "));
        assert!(line.contains("/data/photos.zip"));
        assert!(line.ends_with("/tmp/A/_ArchiveMounter"));
    }
}
