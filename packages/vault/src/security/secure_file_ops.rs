//! Secure file operations module
//!
//! Atomic file replacement, owner-only permissions and hidden directories.
//! Everything here is synchronous: the vault has a single writer and no runtime.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use uuid::Uuid;

/// Atomic file replacement using temp file + rename
///
/// The temp file lives next to the target so the rename never crosses a
/// filesystem. A crash before the rename leaves the previous file intact.
pub fn atomic_replace(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = path.with_extension(format!("tmp.{}", Uuid::new_v4()));

    {
        let mut options = OpenOptions::new();
        options.create_new(true).write(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut temp_file = options.open(&temp_path)?;
        if let Err(e) = temp_file.write_all(data).and_then(|()| temp_file.sync_all()) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
    }

    fs::rename(&temp_path, path).inspect_err(|_| {
        let _ = fs::remove_file(&temp_path);
    })
}

/// Create a directory (and parents) readable only by the owner
///
/// A directory that already exists is left with its current permissions.
pub fn create_private_dir(path: &Path) -> io::Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
    }

    Ok(())
}

/// Hide a directory from casual listing
///
/// Unix hides dot-prefixed names already, so only permissions are tightened
/// there. Windows needs the hidden attribute set explicitly.
pub fn mark_hidden(path: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        let status = std::process::Command::new("attrib")
            .arg("+h")
            .arg(path)
            .status()?;
        if !status.success() {
            return Err(io::Error::other(format!(
                "attrib +h exited with {status} for {}",
                path.display()
            )));
        }
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
    }

    Ok(())
}
