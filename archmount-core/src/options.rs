//! Mount-option string composition.
//!
//! Helpers receive every option in a single comma-separated `-o` argument, so
//! commas inside user-supplied values are replaced with `_` before joining.

use crate::mount::MountRequest;

/// Extra flags understood by macFUSE-based helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MountFlags {
    /// Mark the file system as local (`local`).
    pub local: bool,
    /// Disallow `._` and `.DS_Store` files (`noappledouble`).
    pub no_apple_double: bool,
}

pub fn escape_value(value: &str) -> String {
    value.replace(',', "_")
}

/// Builds the `-o` argument for a helper from a request and the helper's own
/// default options.
pub fn compose_options(request: &MountRequest, helper_defaults: &[String]) -> String {
    let mut options = vec![
        format!("volname={}", escape_value(&request.volume_name)),
        format!(
            "fsname={}",
            escape_value(&request.archive_path.to_string_lossy())
        ),
    ];

    if let Some(encoding) = &request.encoding {
        options.push("modules=iconv".into());
        options.push(format!("from_code={}", escape_value(encoding)));
        options.push("to_code=utf-8".into());
    }
    if request.flags.local {
        options.push("local".into());
    }
    if request.read_only {
        options.push("rdonly".into());
    }
    if request.flags.no_apple_double {
        options.push("noappledouble".into());
    }

    options.extend(helper_defaults.iter().cloned());
    options.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn request(volume_name: &str) -> MountRequest {
        MountRequest {
            archive_path: PathBuf::from("/path/archive.zip"),
            mount_point: PathBuf::from("/tmp/x/_ArchiveMounter"),
            volume_name: volume_name.into(),
            encoding: None,
            read_only: true,
            flags: MountFlags::default(),
        }
    }

    #[test]
    fn defaults_are_volname_fsname_rdonly() {
        assert_eq!(
            compose_options(&request("archive"), &[]),
            "volname=archive,fsname=/path/archive.zip,rdonly"
        );
    }

    #[test]
    fn commas_in_values_are_replaced() {
        let mut req = request("My,Disk");
        req.archive_path = PathBuf::from("/a,b/c.zip");
        req.encoding = Some("cp,866".into());

        let options = compose_options(&req, &[]);
        assert!(options.contains("volname=My_Disk"));
        assert!(options.contains("fsname=/a_b/c.zip"));
        assert!(options.contains("from_code=cp_866"));

        // Every comma-separated piece is a whole option.
        for piece in options.split(',') {
            assert!(
                [
                    "volname=",
                    "fsname=",
                    "modules=",
                    "from_code=",
                    "to_code=",
                    "rdonly"
                ]
                .iter()
                .any(|p| piece.starts_with(p)),
                "unexpected piece {:?}",
                piece
            );
        }
    }

    #[test]
    fn read_write_without_encoding_omits_rdonly_and_iconv() {
        let mut req = request("archive");
        req.read_only = false;

        let options = compose_options(&req, &[]);
        assert!(!options.contains("rdonly"));
        assert!(!options.contains("iconv"));
        assert!(!options.contains("from_code"));
        assert!(!options.contains("to_code"));
    }

    #[test]
    fn encoding_adds_iconv_triple_in_order() {
        let mut req = request("archive");
        req.encoding = Some("cp866".into());

        assert_eq!(
            compose_options(&req, &[]),
            "volname=archive,fsname=/path/archive.zip,\
             modules=iconv,from_code=cp866,to_code=utf-8,rdonly"
        );
    }

    #[test]
    fn flags_and_helper_defaults_follow_user_options() {
        let mut req = request("archive");
        req.flags = MountFlags {
            local: true,
            no_apple_double: true,
        };

        assert_eq!(
            compose_options(&req, &["allow_other".to_string()]),
            "volname=archive,fsname=/path/archive.zip,local,rdonly,noappledouble,allow_other"
        );
    }
}
