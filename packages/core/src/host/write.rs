//! Backup-then-atomic-replace for SSH config rewrites
//!
//! New content goes to a temp file in the target's directory, is checked to
//! be non-empty, then renamed over the target. A backup of the original is
//! held for the duration of the write; if anything fails before the swap is
//! committed, the backup is copied back when the guard drops.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};

use super::error::ConfigError;

/// Restores the original file on drop unless committed
///
/// The backup is a uniquely named temp file next to the target; existing
/// `*.bak` files are never touched.
struct BackupGuard {
    target: PathBuf,
    backup: Option<NamedTempFile>,
    committed: bool,
}

impl BackupGuard {
    fn create(target: &Path, dir: &Path) -> Result<Self, ConfigError> {
        let backup = if target.exists() {
            let mut prefix = OsString::from(".");
            prefix.push(target.file_name().unwrap_or_default());
            prefix.push(".");
            let backup = Builder::new()
                .prefix(&prefix)
                .suffix(".bak")
                .tempfile_in(dir)
                .map_err(|e| ConfigError::io("create backup in", dir, e))?;
            fs::copy(target, backup.path())
                .map_err(|e| ConfigError::io("back up", target, e))?;
            tracing::debug!("Created config backup: {}", backup.path().display());
            Some(backup)
        } else {
            None
        };

        Ok(Self {
            target: target.to_path_buf(),
            backup,
            committed: false,
        })
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for BackupGuard {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        let restored = match &self.backup {
            Some(backup) => fs::copy(backup.path(), &self.target).map(|_| ()),
            None if self.target.exists() => fs::remove_file(&self.target),
            None => Ok(()),
        };
        match restored {
            Ok(()) => tracing::warn!(
                "Config write failed, restored previous content of {}",
                self.target.display()
            ),
            Err(e) => {
                tracing::warn!("Failed to restore {}: {}", self.target.display(), e);
                // Leave the backup in place for manual recovery
                if let Some(backup) = self.backup.take() {
                    match backup.keep() {
                        Ok((_, path)) => {
                            tracing::warn!("Previous content kept at {}", path.display())
                        }
                        Err(e) => tracing::warn!("Failed to keep backup: {}", e.error),
                    }
                }
            }
        }
    }
}

/// Atomically replace `path` with `contents`
///
/// Fails with [`ConfigError::EmptyResult`] rather than ever leaving an empty file.
pub(crate) fn replace_file(path: &Path, contents: &str) -> Result<(), ConfigError> {
    replace_file_with(path, contents, |_| Ok(()))
}

/// [`replace_file`] with a hook run right before the swap
///
/// An error from the hook aborts the write and triggers the restore path.
pub(crate) fn replace_file_with<F>(
    path: &Path,
    contents: &str,
    before_swap: F,
) -> Result<(), ConfigError>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    if contents.trim().is_empty() {
        return Err(ConfigError::EmptyResult(path.to_path_buf()));
    }

    // Write through symlinks (e.g. a dotfiles-managed ~/.ssh/config)
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    ensure_private_dir(&dir)?;

    let guard = BackupGuard::create(&target, &dir)?;

    let mut tmp = NamedTempFile::new_in(&dir)
        .map_err(|e| ConfigError::io("create temp file in", &dir, e))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| ConfigError::io("write temp file for", &target, e))?;

    let written = tmp
        .as_file()
        .metadata()
        .map_err(|e| ConfigError::io("inspect temp file for", &target, e))?
        .len();
    if written == 0 {
        return Err(ConfigError::EmptyResult(target));
    }

    apply_permissions(&tmp, &target)?;

    before_swap(&target).map_err(|e| ConfigError::io("prepare", &target, e))?;

    tmp.persist(&target)
        .map_err(|e| ConfigError::io("replace", &target, e.error))?;

    guard.commit();
    tracing::debug!("Wrote {} bytes to {}", written, target.display());
    Ok(())
}

/// Create the directory with 0700 on Unix if it does not exist
fn ensure_private_dir(dir: &Path) -> Result<(), ConfigError> {
    if dir.exists() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| ConfigError::io("create directory", dir, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))
            .map_err(|e| ConfigError::io("set permissions on", dir, e))?;
    }
    Ok(())
}

/// Keep the original file's mode; new files get 0600
fn apply_permissions(tmp: &NamedTempFile, target: &Path) -> Result<(), ConfigError> {
    let perms = match fs::metadata(target) {
        Ok(meta) => meta.permissions(),
        Err(_) => {
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::Permissions::from_mode(0o600)
            }
            #[cfg(not(unix))]
            {
                return Ok(());
            }
        }
    };
    fs::set_permissions(tmp.path(), perms)
        .map_err(|e| ConfigError::io("set permissions on", tmp.path(), e))
}
