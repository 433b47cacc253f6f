//! Filesystem helpers shared by the rental inventory crates.
//!
//! Paths are UTF-8 (`camino`) and every file is reached through `cap-std`
//! ambient authority, so callers never touch `std::fs` directly.
#![forbid(unsafe_code)]

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io;
use std::path::MAIN_SEPARATOR_STR;

/// Open an existing file for reading.
///
/// A missing file surfaces as an [`io::ErrorKind::NotFound`] error so callers
/// can tell it apart from other I/O failures.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Create every missing directory above `path`.
///
/// Bare file names and paths directly under a filesystem root need no work.
/// Absolute paths, including Windows drive and UNC paths, are created from
/// their root rather than from the current directory.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }

    let (anchor, relative) = split_anchor(parent);
    if relative.as_str().is_empty() {
        return Ok(());
    }
    fs_utf8::Dir::open_ambient_dir(&anchor, ambient_authority())?.create_dir_all(&relative)
}

/// Split `path` into the directory it hangs from and the remainder below it.
///
/// Relative paths hang from the current directory.
fn split_anchor(path: &Utf8Path) -> (Utf8PathBuf, Utf8PathBuf) {
    let mut components = path.components();
    let anchor = match components.next() {
        Some(Utf8Component::Prefix(prefix)) => {
            let mut anchor = Utf8PathBuf::from(prefix.as_str());
            // `C:\data` is rooted; `C:data` is relative to the drive.
            if components.clone().next() == Some(Utf8Component::RootDir) {
                components.next();
                anchor.push(MAIN_SEPARATOR_STR);
            }
            anchor
        }
        Some(Utf8Component::RootDir) => Utf8PathBuf::from(MAIN_SEPARATOR_STR),
        _ => return (Utf8PathBuf::from("."), path.to_path_buf()),
    };
    (anchor, components.as_path().to_path_buf())
}
