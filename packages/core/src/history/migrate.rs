//! One-shot move of the history file from its legacy location

use std::fs;
use std::io;
use std::path::Path;

use super::store::write_private_file;

/// Result of a legacy history migration attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The new file already exists; nothing was touched
    AlreadyPresent,
    /// No legacy file was found
    NothingToMigrate,
    /// The legacy file was copied to the new location
    Migrated,
}

/// Move the legacy history file to `new_path`
///
/// The copy is written with owner-only permissions. Failing to remove the
/// legacy file afterwards is logged but still counts as migrated.
pub fn migrate_legacy_file(new_path: &Path, legacy_path: &Path) -> io::Result<MigrationOutcome> {
    if new_path.exists() {
        return Ok(MigrationOutcome::AlreadyPresent);
    }

    let data = match fs::read(legacy_path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(MigrationOutcome::NothingToMigrate);
        }
        Err(e) => return Err(e),
    };

    write_private_file(new_path, &data)?;
    tracing::info!(
        "Migrated connection history from {} to {}",
        legacy_path.display(),
        new_path.display()
    );

    if let Err(e) = fs::remove_file(legacy_path) {
        tracing::warn!(
            "Failed to remove legacy history file {}: {}",
            legacy_path.display(),
            e
        );
    }

    Ok(MigrationOutcome::Migrated)
}
