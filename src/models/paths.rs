use crate::error::{ExportError, Result};
use std::path::{Path, PathBuf};

/// Channel that receives full item folders plus matched cut-out photos
pub const ALLEGRO_DIR: &str = "Allegro";
/// Channel that receives full item folders only
pub const VINTED_DIR: &str = "Vinted";
pub const ARCHIVE_FILE_NAME: &str = "Zdjęcia.zip";

/// Paths supplied by the caller for one invocation.
///
/// Built fresh for every operation; nothing here is cached between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathConfig {
    pub source: Option<PathBuf>,
    pub cut: Option<PathBuf>,
}

impl PathConfig {
    pub fn new(source: impl Into<PathBuf>, cut: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(source.into()),
            cut: Some(cut.into()),
        }
    }

    /// Build a config from optional strings, treating empty strings as unset
    pub fn from_optional(source: Option<&str>, cut: Option<&str>) -> Self {
        let non_empty = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };

        Self {
            source: non_empty(source),
            cut: non_empty(cut),
        }
    }

    pub fn require_source(&self) -> Result<&Path> {
        require(self.source.as_deref(), "source photos path is not set")
    }

    pub fn require_cut(&self) -> Result<&Path> {
        require(self.cut.as_deref(), "cut photos path is not set")
    }
}

fn require<'a>(path: Option<&'a Path>, message: &str) -> Result<&'a Path> {
    match path {
        Some(p) if !p.as_os_str().is_empty() => Ok(p),
        _ => Err(ExportError::Configuration(message.to_string())),
    }
}

/// Destination layout derived from a source root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelLayout {
    pub allegro: PathBuf,
    pub vinted: PathBuf,
    pub archive: PathBuf,
}

impl ChannelLayout {
    pub fn for_source(source: &Path) -> Self {
        Self {
            allegro: source.join(ALLEGRO_DIR),
            vinted: source.join(VINTED_DIR),
            archive: source.join(ARCHIVE_FILE_NAME),
        }
    }

    /// Channel roots paired with the archive prefix each is stored under
    pub fn channels(&self) -> [(&Path, &'static str); 2] {
        [
            (self.allegro.as_path(), ALLEGRO_DIR),
            (self.vinted.as_path(), VINTED_DIR),
        ]
    }
}

/// Require that `path` exists and is a directory
pub fn ensure_existing_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ExportError::NotFound(path.to_path_buf()))
    }
}
