use archmount_core::{Config, VolumeEnumerator};

use crate::cli::UnmountArgs;
use crate::error::{Error, Result};

pub fn run(config: Config, args: UnmountArgs) -> Result<()> {
    let enumerator = VolumeEnumerator::new(&config);

    if args.all {
        let outcomes = enumerator
            .unmount_all()
            .map_err(|source| Error::ListVolumes { source })?;

        let total = outcomes.len();
        let mut failed = 0;
        for (volume, outcome) in outcomes {
            match outcome {
                Ok(()) => println!("Unmounted: {}", volume.display_name),
                Err(e) => {
                    eprintln!("{} {}: {}", e.title(), volume.display_name, e);
                    failed += 1;
                }
            }
        }

        return match failed {
            0 => Ok(()),
            failed => Err(Error::UnmountIncomplete { failed, total }),
        };
    }

    if let [mount_point] = args.mount_points.as_slice() {
        enumerator
            .unmount(mount_point)
            .map_err(|source| Error::unmount(mount_point.clone(), source))?;
        println!("Unmounted: {}", mount_point.display());
        return Ok(());
    }

    let total = args.mount_points.len();
    let mut failed = 0;
    for mount_point in &args.mount_points {
        match enumerator.unmount(mount_point) {
            Ok(()) => println!("Unmounted: {}", mount_point.display()),
            Err(e) => {
                eprintln!("{}: {}", e.title(), e);
                failed += 1;
            }
        }
    }

    match failed {
        0 => Ok(()),
        failed => Err(Error::UnmountIncomplete { failed, total }),
    }
}
