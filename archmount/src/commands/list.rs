use archmount_core::{Config, VolumeEnumerator};

use crate::cli::ListArgs;
use crate::error::{Error, Result};
use crate::util::format_volume;

pub fn run(config: Config, args: ListArgs) -> Result<()> {
    let volumes = VolumeEnumerator::new(&config)
        .list_mounted_volumes()
        .map_err(|source| Error::ListVolumes { source })?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&volumes).map_err(|source| Error::Json { source })?;
        println!("{}", json);
        return Ok(());
    }

    if volumes.is_empty() {
        println!("No archives mounted");
        return Ok(());
    }

    println!("{:<24}  {:<40}  Mount point", "Name", "Archive");
    println!("{}", "-".repeat(90));
    for volume in &volumes {
        println!("{}", format_volume(volume));
    }

    Ok(())
}
