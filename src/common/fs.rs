//! Common file system operations

use std::fs;
use std::path::Path;

/// Copy a directory tree into `dst`, which must not exist yet
///
/// Entries are visited in file name order. Symlinks are recreated as
/// symlinks with the same target and regular files keep their permission bits.
/// Directories keep their mode plus full owner access, so a read-only source
/// tree never yields a copy its owner cannot remove.
pub fn copy_dir_recursive<P1, P2>(src: P1, dst: P2) -> std::io::Result<()>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    let src_ref = src.as_ref();
    let dst_ref = dst.as_ref();

    fs::create_dir(dst_ref)?;

    let mut entries = fs::read_dir(src_ref)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(fs::DirEntry::file_name);

    for entry in entries {
        let entry_path = entry.path();
        let dst_path = dst_ref.join(entry.file_name());
        let file_type = entry.file_type()?;

        if file_type.is_symlink() {
            copy_symlink(&entry_path, &dst_path)?;
        } else if file_type.is_dir() {
            copy_dir_recursive(&entry_path, &dst_path)?;
        } else {
            fs::copy(&entry_path, &dst_path)?;
        }
    }

    let mut permissions = fs::metadata(src_ref)?.permissions();
    grant_owner_access(&mut permissions);
    fs::set_permissions(dst_ref, permissions)?;

    Ok(())
}

#[cfg(unix)]
fn grant_owner_access(permissions: &mut fs::Permissions) {
    use std::os::unix::fs::PermissionsExt;

    permissions.set_mode(permissions.mode() | 0o700);
}

#[cfg(not(unix))]
fn grant_owner_access(_permissions: &mut fs::Permissions) {}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> std::io::Result<()> {
    let target = fs::read_link(src)?;
    std::os::unix::fs::symlink(target, dst)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> std::io::Result<()> {
    // Symlink creation needs extra privileges on Windows; copy the target instead.
    if src.is_dir() {
        copy_dir_recursive(src, dst)
    } else {
        fs::copy(src, dst).map(|_| ())
    }
}
