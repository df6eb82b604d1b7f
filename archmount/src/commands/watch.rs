use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use archmount_core::{Config, MountedVolume, VolumeEnumerator, VolumeMonitor};

use crate::cli::WatchArgs;
use crate::error::{Error, Result};
use crate::util::format_volume;

/// Lines describing how `current` differs from `previous`. A renamed volume
/// shows up as removed and added.
fn changes(previous: &[MountedVolume], current: &[MountedVolume]) -> Vec<String> {
    let before: HashSet<_> = previous.iter().collect();
    let after: HashSet<_> = current.iter().collect();

    let mut lines: Vec<String> = previous
        .iter()
        .filter(|v| !after.contains(v))
        .map(|v| format!("- {}", format_volume(v)))
        .collect();
    lines.extend(
        current
            .iter()
            .filter(|v| !before.contains(v))
            .map(|v| format!("+ {}", format_volume(v))),
    );
    lines
}

pub async fn run(config: Config, args: WatchArgs) -> Result<()> {
    let monitor = Arc::new(VolumeMonitor::new(VolumeEnumerator::new(&config)));

    let previous: Mutex<Vec<MountedVolume>> = Mutex::new(vec![]);
    monitor.on_volume_table_changed(move |volumes| {
        let mut previous = previous.lock().unwrap_or_else(|e| e.into_inner());
        for line in changes(&previous, volumes) {
            println!("{}", line);
        }
        *previous = volumes.to_vec();
    });

    let mut interval = tokio::time::interval(Duration::from_secs(args.interval));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let monitor = monitor.clone();
                tokio::task::spawn_blocking(move || monitor.notify_if_changed())
                    .await
                    .map_err(|source| Error::Worker { source })?
                    .map_err(|source| Error::ListVolumes { source })?;
            }
            result = tokio::signal::ctrl_c() => {
                result.map_err(|source| Error::Signal { source })?;
                break;
            }
        }
    }

    Ok(())
}
