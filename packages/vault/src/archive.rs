//! Password-protected emergency archives
//!
//! An emergency archive is an AES-256 zip holding the data file under its
//! own name and the attachment directory under `files/`. Archives are
//! write-once: an existing name is never reused.

use crate::error::VaultResult;
use chrono::Local;
use pinvault_common::LoggingTransformer;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::{FileOptions, SimpleFileOptions};
use zip::{AesMode, CompressionMethod, ZipWriter};

pub const ARCHIVE_PREFIX: &str = "vault_backup_";
pub const ARCHIVE_EXTENSION: &str = "zip";
/// Directory inside the archive that receives the attachment files
pub const FILES_ENTRY: &str = "files";

/// Archive file name for a timestamp; `attempt > 0` adds a collision suffix
pub fn archive_file_name(stamp: &str, attempt: u32) -> String {
    if attempt == 0 {
        format!("{ARCHIVE_PREFIX}{stamp}.{ARCHIVE_EXTENSION}")
    } else {
        format!("{ARCHIVE_PREFIX}{stamp}_{attempt}.{ARCHIVE_EXTENSION}")
    }
}

/// Write an emergency archive of `data_file` and `files_dir` into `dest_dir`
///
/// Either source may be missing; the archive then holds whatever exists.
/// A partially written archive is removed on failure.
///
/// # Errors
/// Returns an error if the destination cannot be created or any source
/// cannot be read or compressed.
pub fn write_emergency_archive(
    dest_dir: &Path,
    data_file: &Path,
    files_dir: &Path,
    password: &str,
) -> VaultResult<PathBuf> {
    std::fs::create_dir_all(dest_dir)?;

    let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let (path, file) = create_unique(dest_dir, &stamp)?;

    match fill_archive(file, data_file, files_dir, password) {
        Ok(()) => Ok(path),
        Err(e) => {
            if let Err(cleanup) = std::fs::remove_file(&path) {
                LoggingTransformer::log_cleanup_warning("partial emergency archive", &cleanup);
            }
            Err(e)
        }
    }
}

fn create_unique(dest_dir: &Path, stamp: &str) -> io::Result<(PathBuf, File)> {
    let mut attempt = 0;
    loop {
        let path = dest_dir.join(archive_file_name(stamp, attempt));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e),
        }
    }
}

fn entry_options(password: &str) -> FileOptions<'_, ()> {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .with_aes_encryption(AesMode::Aes256, password)
}

fn fill_archive(
    file: File,
    data_file: &Path,
    files_dir: &Path,
    password: &str,
) -> VaultResult<()> {
    let mut zip = ZipWriter::new(file);

    if data_file.is_file() {
        let name = data_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| crate::config::DATA_FILE_NAME.to_string());
        zip.start_file(name, entry_options(password))?;
        io::copy(&mut File::open(data_file)?, &mut zip)?;
    }

    if files_dir.is_dir() {
        zip.add_directory(format!("{FILES_ENTRY}/"), SimpleFileOptions::default())?;

        for entry in WalkDir::new(files_dir).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            let Ok(relative) = entry.path().strip_prefix(files_dir) else {
                continue;
            };
            let name = archive_entry_name(relative);

            if entry.file_type().is_dir() {
                zip.add_directory(format!("{name}/"), SimpleFileOptions::default())?;
            } else if entry.file_type().is_file() {
                zip.start_file(name, entry_options(password))?;
                io::copy(&mut File::open(entry.path())?, &mut zip)?;
            }
        }
    }

    let file = zip.finish()?;
    file.sync_all()?;
    Ok(())
}

fn archive_entry_name(relative: &Path) -> String {
    let mut name = String::from(FILES_ENTRY);
    for component in relative.components() {
        name.push('/');
        name.push_str(&component.as_os_str().to_string_lossy());
    }
    name
}
