//! Atomic file write helpers.
//!
//! The bytes land in a temp file in the destination directory, which is then
//! renamed over the target. Readers observe either the old or the new content,
//! never a partial write. If rename-over-existing fails (Windows), the old file
//! is moved to `.bak` first and restored when the second rename fails too.
//!
//! Files are written owner-only (0o600 on Unix): the persisted cache holds
//! customer credentials. The temp file is synced before the rename and the
//! parent directory after it (best-effort), so the rename survives a crash.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

pub fn atomic_write(path: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    set_owner_only(tmp.path())?;

    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    if let Err(err) = tmp.persist(path) {
        if !path.exists() {
            return Err(err.error);
        }
        let backup = path.with_extension("bak");
        let _ = fs::remove_file(&backup);
        fs::rename(path, &backup)?;

        if let Err(retry) = err.file.persist(path) {
            let _ = fs::rename(&backup, path);
            return Err(retry.error);
        }
        if let Err(e) = fs::remove_file(&backup) {
            warn!(path = %backup.display(), "Failed to remove .bak after atomic write: {e}");
        }
    }

    set_owner_only(path)?;
    sync_dir_best_effort(parent);

    Ok(())
}

#[cfg(unix)]
fn set_owner_only(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn set_owner_only(_path: &Path) -> io::Result<()> {
    Ok(())
}

fn sync_dir_best_effort(dir: &Path) {
    #[cfg(unix)]
    if let Err(e) = fs::File::open(dir).and_then(|d| d.sync_all()) {
        debug!(path = %dir.display(), "Directory sync failed (best-effort): {e}");
    }

    #[cfg(not(unix))]
    debug!(path = %dir.display(), "Directory sync not supported on this platform");
}
