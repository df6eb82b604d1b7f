use std::path::{Path, PathBuf};

use super::{MountEntry, MountTable};
use crate::error::{Error, Result};

/// The running system's mount table.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemMountTable;

impl MountTable for SystemMountTable {
    fn entries(&self) -> Result<Vec<MountEntry>> {
        read_entries().map_err(|source| Error::MountTable { source })
    }
}

#[cfg(target_os = "linux")]
fn read_entries() -> std::io::Result<Vec<MountEntry>> {
    let content = std::fs::read_to_string("/proc/self/mounts")?;
    Ok(parse_proc_mounts(&content))
}

#[cfg(target_os = "macos")]
fn read_entries() -> std::io::Result<Vec<MountEntry>> {
    macos::read_entries()
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn read_entries() -> std::io::Result<Vec<MountEntry>> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "mount table enumeration is not supported on this platform",
    ))
}

/// Parses `/proc/self/mounts` (fstab(5) format).
///
/// The kernel keeps no user-visible volume name for FUSE mounts, so the stem
/// of the source is used instead; for helper mounts that is the archive name.
pub fn parse_proc_mounts(content: &str) -> Vec<MountEntry> {
    content
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let device = lossy(unescape(fields.next()?));
            let mount_point = path_from_bytes(unescape(fields.next()?));
            let fs_type = lossy(unescape(fields.next()?));

            let volume_name = Path::new(&device)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .filter(|s| !s.is_empty());
            let device = Some(device).filter(|d| !d.is_empty() && d != "none");

            Some(MountEntry {
                mount_point,
                device,
                fs_type,
                volume_name,
            })
        })
        .collect()
}

/// Decodes the `\ooo` octal escapes the kernel uses for space, tab, newline
/// and backslash. The result is raw bytes: paths need not be UTF-8.
fn unescape(field: &str) -> Vec<u8> {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() && is_octal(&bytes[i + 1..i + 4]) {
            let value = (bytes[i + 1] - b'0') as u32 * 64
                + (bytes[i + 2] - b'0') as u32 * 8
                + (bytes[i + 3] - b'0') as u32;
            if value <= 0xff {
                out.push(value as u8);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    out
}

fn lossy(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

#[cfg(unix)]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    use std::os::unix::ffi::OsStringExt;
    PathBuf::from(std::ffi::OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    PathBuf::from(lossy(bytes))
}

fn is_octal(bytes: &[u8]) -> bool {
    bytes.iter().all(|b| (b'0'..=b'7').contains(b))
}

#[cfg(target_os = "macos")]
mod macos {
    use std::ffi::{CStr, CString, OsStr};
    use std::os::unix::ffi::OsStrExt;
    use std::path::{Path, PathBuf};

    use super::MountEntry;

    fn c_field(field: &[libc::c_char]) -> &[u8] {
        // statfs name fields are NUL-terminated within their fixed length.
        let bytes = unsafe { std::slice::from_raw_parts(field.as_ptr() as *const u8, field.len()) };
        match bytes.iter().position(|&b| b == 0) {
            Some(end) => &bytes[..end],
            None => bytes,
        }
    }

    pub(super) fn read_entries() -> std::io::Result<Vec<MountEntry>> {
        let mut buf: *mut libc::statfs = std::ptr::null_mut();
        let count = unsafe { libc::getmntinfo(&mut buf, libc::MNT_NOWAIT) };
        if count <= 0 || buf.is_null() {
            return Err(std::io::Error::last_os_error());
        }

        // Owned by libc and reused by the next getmntinfo call.
        let mounts = unsafe { std::slice::from_raw_parts(buf, count as usize) };

        Ok(mounts
            .iter()
            .map(|m| {
                let mount_point = PathBuf::from(OsStr::from_bytes(c_field(&m.f_mntonname)));
                let device = String::from_utf8_lossy(c_field(&m.f_mntfromname)).into_owned();
                let fs_type = String::from_utf8_lossy(c_field(&m.f_fstypename)).into_owned();
                let volume_name = volume_name(&mount_point);

                MountEntry {
                    mount_point,
                    device: Some(device).filter(|d| !d.is_empty()),
                    fs_type,
                    volume_name,
                }
            })
            .collect())
    }

    #[repr(C)]
    struct VolumeNameBuf {
        length: u32,
        name: libc::attrreference_t,
        data: [u8; 1024],
    }

    /// The user-visible volume name (`ATTR_VOL_NAME`).
    fn volume_name(path: &Path) -> Option<String> {
        let c_path = CString::new(path.as_os_str().as_bytes()).ok()?;

        let mut attrs: libc::attrlist = unsafe { std::mem::zeroed() };
        attrs.bitmapcount = libc::ATTR_BIT_MAP_COUNT;
        attrs.volattr = libc::ATTR_VOL_INFO | libc::ATTR_VOL_NAME;

        let mut buf: VolumeNameBuf = unsafe { std::mem::zeroed() };
        let ret = unsafe {
            libc::getattrlist(
                c_path.as_ptr(),
                &mut attrs as *mut libc::attrlist as *mut libc::c_void,
                &mut buf as *mut VolumeNameBuf as *mut libc::c_void,
                std::mem::size_of::<VolumeNameBuf>(),
                0,
            )
        };
        if ret != 0 {
            tracing::debug!(
                path = %path.display(),
                error = %std::io::Error::last_os_error(),
                "getattrlist failed"
            );
            return None;
        }

        // The offset is relative to the attrreference_t itself.
        let offset = buf.name.attr_dataoffset as usize;
        let length = buf.name.attr_length as usize;
        let start = offset.checked_sub(std::mem::size_of::<libc::attrreference_t>())?;
        let raw = buf.data.get(start..start + length)?;
        let name = CStr::from_bytes_until_nul(raw).ok()?;

        Some(name.to_string_lossy().into_owned()).filter(|s| !s.is_empty())
    }
}
