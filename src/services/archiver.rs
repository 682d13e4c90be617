use crate::error::{ExportError, IoContext, Result};
use crate::models::{ensure_existing_dir, ChannelLayout, PathConfig};
use crate::utils::{sha256_file, walk_files_sorted, WalkedFile};
use chrono::{DateTime, Datelike, Local, Timelike};
use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Pack the Allegro and Vinted channels into `Zdjęcia.zip` under the source root,
/// replacing any archive left by a previous run.
pub fn pack_photos(config: &PathConfig) -> Result<PackReport> {
    let source = config.require_source()?;
    ensure_existing_dir(source)?;

    let layout = ChannelLayout::for_source(source);
    info!("Packing channels of {:?} into {:?}", source, layout.archive);

    if layout.archive.exists() {
        debug!("Removing previous archive {:?}", layout.archive);
        fs::remove_file(&layout.archive)
            .io_context(|| format!("Failed to remove old archive: {:?}", layout.archive))?;
    }

    let (entries, total_bytes) = match write_archive(&layout) {
        Ok(totals) => totals,
        Err(e) => {
            discard_partial_archive(&layout.archive);
            return Err(e);
        }
    };

    let report = PackReport {
        sha256: sha256_file(&layout.archive)?,
        archive_path: layout.archive,
        entries,
        total_bytes,
    };

    info!(
        "Archive {:?} written. Entries: {}, bytes: {}, sha256: {}",
        report.archive_path, report.entries, report.total_bytes, report.sha256
    );

    Ok(report)
}

/// Returns the number of entries and uncompressed bytes written.
/// The archive handle is dropped before this returns, on every path.
fn write_archive(layout: &ChannelLayout) -> Result<(usize, u64)> {
    let archive_path = layout.archive.as_path();
    let file = File::create(archive_path)
        .io_context(|| format!("Failed to create archive: {:?}", archive_path))?;
    let mut writer = ZipWriter::new(file);

    let mut entries = 0;
    let mut total_bytes = 0;
    for (channel, prefix) in layout.channels() {
        if !channel.is_dir() {
            debug!("Channel {:?} does not exist, skipping", channel);
            continue;
        }

        for walked in walk_files_sorted(channel)? {
            total_bytes += add_file(&mut writer, archive_path, &walked, prefix)?;
            entries += 1;
        }
    }

    writer.finish().map_err(|source| archive_error(archive_path, source))?;
    Ok((entries, total_bytes))
}

fn add_file(
    writer: &mut ZipWriter<File>,
    archive_path: &Path,
    walked: &WalkedFile,
    prefix: &str,
) -> Result<u64> {
    let entry_name = format!("{}/{}", prefix, walked.relative);
    let metadata = fs::metadata(&walked.path)
        .io_context(|| format!("Failed to read metadata for: {:?}", walked.path))?;

    writer
        .start_file(entry_name.clone(), entry_options(&metadata))
        .map_err(|source| archive_error(archive_path, source))?;

    let mut input = File::open(&walked.path)
        .io_context(|| format!("Failed to open file: {:?}", walked.path))?;
    let written = std::io::copy(&mut input, writer)
        .io_context(|| format!("Failed to write {:?} into archive", entry_name))?;

    debug!("Added {} ({} bytes)", entry_name, written);
    Ok(written)
}

fn entry_options(metadata: &fs::Metadata) -> SimpleFileOptions {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip_timestamp(metadata));

    #[cfg(unix)]
    let options = {
        use std::os::unix::fs::PermissionsExt;
        options.unix_permissions(metadata.permissions().mode() & 0o7777)
    };

    options
}

/// Local modification time in zip's format. Times the format cannot hold
/// (before 1980 or after 2107) fall back to 1980-01-01 00:00.
fn zip_timestamp(metadata: &fs::Metadata) -> zip::DateTime {
    metadata
        .modified()
        .ok()
        .and_then(|modified| to_zip_datetime(DateTime::<Local>::from(modified)))
        .unwrap_or_default()
}

fn to_zip_datetime(local: DateTime<Local>) -> Option<zip::DateTime> {
    let year = u16::try_from(local.year()).ok()?;
    zip::DateTime::from_date_and_time(
        year,
        local.month() as u8,
        local.day() as u8,
        local.hour() as u8,
        local.minute() as u8,
        local.second() as u8,
    )
    .ok()
}

fn archive_error(path: &Path, source: zip::result::ZipError) -> ExportError {
    ExportError::Archive {
        path: path.to_path_buf(),
        source,
    }
}

fn discard_partial_archive(path: &Path) {
    if !path.exists() {
        return;
    }
    match fs::remove_file(path) {
        Ok(()) => warn!("Removed incomplete archive {:?}", path),
        Err(e) => warn!("Failed to remove incomplete archive {:?}: {}", path, e),
    }
}

/// Outcome of one pack run
#[derive(Debug, Clone, Serialize)]
pub struct PackReport {
    pub archive_path: PathBuf,
    pub entries: usize,
    pub total_bytes: u64,
    pub sha256: String,
}

impl PackReport {
    pub fn summary(&self) -> String {
        format!(
            "Packed Allegro and Vinted into {} ({} files)",
            self.archive_path.display(),
            self.entries
        )
    }
}
