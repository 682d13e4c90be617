use crate::error::{IoContext, Result};
use crate::models::{ensure_existing_dir, ChannelLayout, ItemFolder, PathConfig, ALLEGRO_DIR, VINTED_DIR};
use crate::utils::{copy_file_with_metadata, copy_tree, list_files_with_prefix, list_subdirectories, remove_tree};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Move every `Z (<N>)` folder of the source root into the Allegro and Vinted
/// channels. Allegro copies also receive the matching cut-out photos.
///
/// The first failure stops the run. Folders finished before it stay moved.
pub fn reorganize(config: &PathConfig) -> Result<ReorganizeReport> {
    let source = config.require_source()?;
    let cut = config.require_cut()?;

    ensure_existing_dir(source)?;
    ensure_existing_dir(cut)?;

    info!("Starting reorganization of {:?} (cut photos in {:?})", source, cut);
    let started_at = Utc::now();

    let layout = ChannelLayout::for_source(source);
    for (channel, _) in layout.channels() {
        fs::create_dir_all(channel)
            .io_context(|| format!("Failed to create directory: {:?}", channel))?;
    }

    let (items, ignored_entries) = discover_item_folders(source)?;

    if items.is_empty() {
        info!("No item folders found in {:?}", source);
    }

    let mut processed = Vec::with_capacity(items.len());
    for item in &items {
        processed.push(process_item(item, cut, &layout)?);
    }

    let report = ReorganizeReport {
        started_at,
        finished_at: Utc::now(),
        items: processed,
        ignored_entries,
    };

    info!(
        "Reorganization completed. Folders: {}, cut photos: {}, ignored directories: {}",
        report.items.len(),
        report.auxiliary_total(),
        report.ignored_entries
    );

    Ok(report)
}

/// Item folders directly under `source`, plus the count of other directories.
/// The channel roots themselves are not counted.
fn discover_item_folders(source: &Path) -> Result<(Vec<ItemFolder>, usize)> {
    let mut ignored = 0;
    let items: Vec<ItemFolder> = list_subdirectories(source)?
        .into_iter()
        .filter(|(name, _)| name != ALLEGRO_DIR && name != VINTED_DIR)
        .filter_map(|(name, path)| {
            let item = ItemFolder::from_entry(&name, path);
            if item.is_none() {
                debug!("Ignoring directory {:?}", name);
                ignored += 1;
            }
            item
        })
        .collect();

    Ok((items, ignored))
}

fn process_item(item: &ItemFolder, cut: &Path, layout: &ChannelLayout) -> Result<ProcessedItem> {
    let allegro_dir = layout.allegro.join(&item.dir_name);
    copy_tree(&item.path, &allegro_dir)?;

    let auxiliary_files = match item.auxiliary_prefix() {
        Some(prefix) => copy_auxiliary_files(cut, &prefix, &allegro_dir)?,
        None => {
            debug!("{:?} has no positive index, skipping cut photos", item.name);
            Vec::new()
        }
    };

    copy_tree(&item.path, layout.vinted.join(&item.dir_name))?;
    remove_tree(&item.path)?;

    info!(
        "Moved {:?} to Allegro ({} cut photos) and Vinted",
        item.name,
        auxiliary_files.len()
    );

    Ok(ProcessedItem {
        name: item.name.clone(),
        index: item.index,
        auxiliary_files,
    })
}

fn copy_auxiliary_files(cut: &Path, prefix: &str, destination: &Path) -> Result<Vec<String>> {
    let files = list_files_with_prefix(cut, prefix)?;

    if files.is_empty() {
        warn!("No cut photos starting with {:?} in {:?}", prefix, cut);
    }

    let mut copied = Vec::with_capacity(files.len());
    for file_path in files {
        let Some(file_name) = file_path.file_name() else {
            continue;
        };
        copy_file_with_metadata(&file_path, destination.join(file_name))?;
        copied.push(file_name.to_string_lossy().to_string());
    }

    Ok(copied)
}

/// Outcome of one reorganization run
#[derive(Debug, Clone, Serialize)]
pub struct ReorganizeReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub items: Vec<ProcessedItem>,
    pub ignored_entries: usize,
}

impl ReorganizeReport {
    pub fn auxiliary_total(&self) -> usize {
        self.items.iter().map(|item| item.auxiliary_files.len()).sum()
    }

    pub fn summary(&self) -> String {
        format!(
            "Moved {} item folders to Allegro and Vinted ({} cut photos added to Allegro)",
            self.items.len(),
            self.auxiliary_total()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedItem {
    pub name: String,
    pub index: i64,
    pub auxiliary_files: Vec<String>,
}
