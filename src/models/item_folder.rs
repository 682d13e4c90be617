use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

const ITEM_PREFIX: &str = "Z (";
const ITEM_SUFFIX: &str = ")";

/// Returned by [`extract_index`] when no index can be read
pub const NO_INDEX: i64 = -1;

/// A numbered item folder found directly under the source root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFolder {
    /// Display form of the name; lossy when the name is not UTF-8
    pub name: String,
    /// Name as found on disk, used to build destination paths
    pub dir_name: OsString,
    pub path: PathBuf,
    pub index: i64,
}

impl ItemFolder {
    /// Returns `None` when `dir_name` does not look like `Z (<N>)`
    pub fn from_entry(dir_name: &OsStr, path: PathBuf) -> Option<Self> {
        let name = dir_name.to_string_lossy();
        if !is_item_folder_name(&name) {
            return None;
        }

        Some(Self {
            index: extract_index(&name),
            name: name.into_owned(),
            dir_name: dir_name.to_os_string(),
            path,
        })
    }

    /// Only a strictly positive index pulls in cut-out photos
    pub fn auxiliary_prefix(&self) -> Option<String> {
        (self.index > 0).then(|| auxiliary_prefix(self.index))
    }
}

pub fn is_item_folder_name(name: &str) -> bool {
    name.starts_with(ITEM_PREFIX) && name.ends_with(ITEM_SUFFIX)
}

/// Parse the integer between the first `(` and the first `)` after it.
///
/// Total: anything unreadable yields [`NO_INDEX`].
pub fn extract_index(name: &str) -> i64 {
    let Some(open) = name.find('(') else {
        return NO_INDEX;
    };
    let rest = &name[open + 1..];
    let Some(close) = rest.find(')') else {
        return NO_INDEX;
    };

    rest[..close].trim().parse().unwrap_or(NO_INDEX)
}

/// Filename prefix of cut-out photos belonging to item `index`
pub fn auxiliary_prefix(index: i64) -> String {
    format!("0 ({})-Photoroom", index)
}
