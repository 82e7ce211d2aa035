//! SSH config file store
//!
//! Reads `Host` blocks into [`HostRecord`]s and rewrites one block at a
//! time. Every mutating call re-reads the file, so sequential calls always
//! see the latest content on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::paths::get_ssh_dir;

use super::error::ConfigError;
use super::parser::{ConfigDocument, is_pattern, render_block};
use super::schema::HostRecord;
use super::validate::{validate_host, validate_host_names};
use super::write::{replace_file, replace_file_with};

/// Get the path to the user's SSH config file
pub fn get_ssh_config_path() -> Option<PathBuf> {
    get_ssh_dir().map(|d| d.join("config"))
}

fn load_document(path: &Path) -> Result<ConfigDocument, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::io("read", path, e))?;
    Ok(ConfigDocument::parse(path, &content))
}

/// Like [`load_document`], but a missing file is an empty document
fn load_document_or_empty(path: &Path) -> Result<ConfigDocument, ConfigError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(ConfigDocument::parse(path, &content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ConfigDocument::parse(path, "")),
        Err(e) => Err(ConfigError::io("read", path, e)),
    }
}

/// Parse every concrete host in the file
///
/// Malformed blocks are skipped; only I/O failures are errors.
pub fn parse_all(path: &Path) -> Result<Vec<HostRecord>, ConfigError> {
    let records = load_document(path)?.records();
    tracing::debug!("Parsed {} hosts from {}", records.len(), path.display());
    Ok(records)
}

/// Look up one host by name
pub fn get_host(name: &str, path: &Path) -> Result<HostRecord, ConfigError> {
    parse_all(path)?
        .into_iter()
        .find(|r| r.name == name)
        .ok_or_else(|| ConfigError::NotFound(name.to_string()))
}

/// Check if a host alias is declared in the file
pub fn host_exists(name: &str, path: &Path) -> bool {
    load_document(path)
        .map(|doc| doc.find_block(name).is_some())
        .unwrap_or(false)
}

/// Check whether `name` shares its `Host` line with other names
///
/// Returns the full name list of the declaration alongside the flag.
pub fn is_part_of_multi_host_declaration(
    name: &str,
    path: &Path,
) -> Result<(bool, Vec<String>), ConfigError> {
    let doc = load_document(path)?;
    let block = doc
        .find_block(name)
        .ok_or_else(|| ConfigError::NotFound(name.to_string()))?;
    Ok((block.is_multi_host(), block.names.clone()))
}

/// Replace the single-name block declaring `old_name` with `new_record`
///
/// `new_record.name` may differ from `old_name` to rename the host. Blocks
/// that declare several names must go through [`update_multi_host_block`].
pub fn update_host(
    old_name: &str,
    new_record: &HostRecord,
    path: &Path,
) -> Result<(), ConfigError> {
    validate_host(new_record)?;

    let doc = load_document(path)?;
    let block = doc
        .find_block(old_name)
        .ok_or_else(|| ConfigError::NotFound(old_name.to_string()))?;

    if block.is_multi_host() {
        return Err(ConfigError::Validation(format!(
            "'{}' is declared together with {}; update the whole block instead",
            old_name,
            block.names.join(", ")
        )));
    }
    if new_record.name != old_name && doc.names_outside(block.start).any(|n| n == new_record.name)
    {
        return Err(ConfigError::AlreadyExists(new_record.name.clone()));
    }

    let lines = render_block(std::slice::from_ref(&new_record.name), new_record);
    replace_file(path, &doc.splice(block.start, block.end, &lines))?;

    tracing::info!("Updated host '{}' in {}", old_name, path.display());
    Ok(())
}

/// Replace the block declaring `old_names` with one declaring `new_names`
///
/// This is how hosts are renamed, grouped, or split off a group: the whole
/// block is swapped in a single atomic write, so readers see either the
/// old or the new declaration. `common`'s name is ignored.
pub fn update_multi_host_block(
    old_names: &[String],
    new_names: &[String],
    common: &HostRecord,
    path: &Path,
) -> Result<(), ConfigError> {
    rewrite_multi_host_block(old_names, new_names, common, path, |_| Ok(()))
}

fn rewrite_multi_host_block<F>(
    old_names: &[String],
    new_names: &[String],
    common: &HostRecord,
    path: &Path,
    before_swap: F,
) -> Result<(), ConfigError>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    validate_host_names(new_names)?;
    // Patterns kept on the Host line are written back without record checks
    for name in new_names.iter().filter(|n| !is_pattern(n)) {
        validate_host(&common.renamed(name.clone()))?;
    }
    let first = old_names.first().ok_or_else(|| {
        ConfigError::Validation("no existing host names given".to_string())
    })?;

    let doc = load_document(path)?;
    let block = doc
        .find_block(first)
        .ok_or_else(|| ConfigError::NotFound(first.clone()))?;

    let mut declared = block.names.clone();
    let mut expected = old_names.to_vec();
    declared.sort();
    expected.sort();
    if declared != expected {
        return Err(ConfigError::Validation(format!(
            "block declares [{}], not [{}]",
            block.names.join(", "),
            old_names.join(", ")
        )));
    }

    if let Some(taken) = doc
        .names_outside(block.start)
        .find(|n| new_names.iter().any(|new| new.as_str() == *n))
    {
        return Err(ConfigError::AlreadyExists(taken.to_string()));
    }

    let lines = render_block(new_names, common);
    replace_file_with(path, &doc.splice(block.start, block.end, &lines), before_swap)?;

    tracing::info!(
        "Replaced host block [{}] with [{}] in {}",
        old_names.join(" "),
        new_names.join(" "),
        path.display()
    );
    Ok(())
}

/// Remove the whole block declaring `name`
///
/// Co-declared names go with it. To drop a single name from a group, call
/// [`update_multi_host_block`] without that name.
pub fn delete_host(name: &str, path: &Path) -> Result<(), ConfigError> {
    let doc = load_document(path)?;
    let block = doc
        .find_block(name)
        .ok_or_else(|| ConfigError::NotFound(name.to_string()))?;

    replace_file(path, &doc.without_block(block))?;

    tracing::info!(
        "Deleted host block [{}] from {}",
        block.names.join(" "),
        path.display()
    );
    Ok(())
}

/// Append a new single-name block
///
/// Creates the file (and its directory) if it does not exist yet.
pub fn add_host(record: &HostRecord, path: &Path) -> Result<(), ConfigError> {
    validate_host(record)?;

    let doc = load_document_or_empty(path)?;
    if doc.find_block(&record.name).is_some() {
        return Err(ConfigError::AlreadyExists(record.name.clone()));
    }

    let lines = render_block(std::slice::from_ref(&record.name), record);
    replace_file(path, &doc.with_appended(&lines))?;

    tracing::info!("Added host '{}' to {}", record.name, path.display());
    Ok(())
}
