use archmount_core::{check_fuse_installed, Config, MountFlags, Mounter};

use crate::cli::MountArgs;
use crate::error::{Error, Result};
use crate::util::mount_spinner;

pub async fn run(config: Config, args: MountArgs) -> Result<()> {
    check_fuse_installed(&config.fuse_probe)
        .map_err(|source| Error::DependencyMissing { source })?;

    let archive = std::fs::canonicalize(&args.archive).map_err(|source| Error::OpenArchive {
        path: args.archive.clone(),
        source,
    })?;

    let mounter = Mounter::new(config);
    let mut request = mounter.request(&archive);
    if let Some(name) = args.volume_name {
        request.volume_name = name;
    }
    request.encoding = args.encoding.filter(|e| !e.is_empty());
    request.read_only = !args.read_write;
    request.flags = MountFlags {
        local: args.local,
        no_apple_double: args.no_apple_double,
    };

    let spinner = mount_spinner(&request, args.quiet);

    // The helper call blocks until the helper has daemonized.
    let (mounter, result) = tokio::task::spawn_blocking(move || {
        let result = mounter.mount(&request);
        (mounter, result)
    })
    .await
    .map_err(|source| Error::Worker { source })?;

    spinner.finish_and_clear();

    let mount_point = result.map_err(|source| Error::mount(archive, source))?;
    println!("{}", mount_point.display());

    if args.open {
        if let Err(e) = mounter.reveal(&mount_point) {
            tracing::warn!(error = %e, "cannot open mount point");
        }
    }

    Ok(())
}
