use crate::error::{ExportError, IoContext, Result};
use filetime::FileTime;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Immediate subdirectories of `directory` as `(name, path)`, sorted by name.
/// Names are kept as `OsString` so folders with non UTF-8 names are still listed.
pub fn list_subdirectories<P: AsRef<Path>>(directory: P) -> Result<Vec<(OsString, PathBuf)>> {
    let dir_path = directory.as_ref();

    let entries = fs::read_dir(dir_path)
        .io_context(|| format!("Failed to read directory: {:?}", dir_path))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.io_context(|| format!("Failed to read entry in: {:?}", dir_path))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push((entry.file_name(), path));
        }
    }

    dirs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(dirs)
}

/// Regular files directly inside `directory` whose name starts with `prefix`.
/// Not recursive. Sorted by file name.
pub fn list_files_with_prefix<P: AsRef<Path>>(directory: P, prefix: &str) -> Result<Vec<PathBuf>> {
    let dir_path = directory.as_ref();

    let entries = fs::read_dir(dir_path)
        .io_context(|| format!("Failed to read directory: {:?}", dir_path))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.io_context(|| format!("Failed to read entry in: {:?}", dir_path))?;
        if !matches_prefix(&entry.file_name().to_string_lossy(), prefix) {
            continue;
        }
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn matches_prefix(file_name: &str, prefix: &str) -> bool {
    file_name.starts_with(prefix)
}

/// Copy one file, carrying over permissions and access/modification times.
/// An existing file at `destination` is overwritten.
pub fn copy_file_with_metadata<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q) -> Result<()> {
    let src_path = source.as_ref();
    let dest_path = destination.as_ref();

    fs::copy(src_path, dest_path)
        .io_context(|| format!("Failed to copy file from {:?} to {:?}", src_path, dest_path))?;

    let metadata = fs::metadata(src_path)
        .io_context(|| format!("Failed to read metadata for: {:?}", src_path))?;

    filetime::set_file_times(
        dest_path,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )
    .io_context(|| format!("Failed to set file times on: {:?}", dest_path))?;

    Ok(())
}

/// Mirror the tree under `source` into `destination`, including empty
/// directories. Existing files are overwritten, nothing is removed.
/// Returns the number of files copied.
pub fn copy_tree<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q) -> Result<usize> {
    let src_root = source.as_ref();
    let dest_root = destination.as_ref();

    if !src_root.is_dir() {
        return Err(ExportError::NotFound(src_root.to_path_buf()));
    }

    fs::create_dir_all(dest_root)
        .io_context(|| format!("Failed to create directory: {:?}", dest_root))?;

    let mut copied = 0;
    for entry in WalkDir::new(src_root).min_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| walk_error(src_root, e))?;
        let relative = relative_to(src_root, entry.path())?;
        let target = dest_root.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .io_context(|| format!("Failed to create directory: {:?}", target))?;
        } else {
            copy_file_with_metadata(entry.path(), &target)?;
            copied += 1;
        }
    }

    tracing::debug!("Copied {} files from {:?} to {:?}", copied, src_root, dest_root);
    Ok(copied)
}

/// Remove a directory and everything below it
pub fn remove_tree<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    fs::remove_dir_all(path).io_context(|| format!("Failed to remove directory: {:?}", path))
}

/// A file found while walking a tree, with its `/`-separated path relative to the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    pub path: PathBuf,
    pub relative: String,
}

/// Every file below `root`, sorted by relative path
pub fn walk_files_sorted<P: AsRef<Path>>(root: P) -> Result<Vec<WalkedFile>> {
    let root = root.as_ref();

    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if entry.file_type().is_dir() {
            continue;
        }
        let relative = to_slash_path(relative_to(root, entry.path())?);
        files.push(WalkedFile {
            relative,
            path: entry.into_path(),
        });
    }

    files.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(files)
}

/// Join path components with `/` regardless of the host separator
pub fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn relative_to<'a>(root: &Path, path: &'a Path) -> Result<&'a Path> {
    path.strip_prefix(root).map_err(|e| {
        ExportError::io(
            format!("Path {:?} is outside of {:?}", path, root),
            std::io::Error::new(std::io::ErrorKind::InvalidInput, e),
        )
    })
}

fn walk_error(root: &Path, error: walkdir::Error) -> ExportError {
    let context = match error.path() {
        Some(path) => format!("Failed to walk {:?}", path),
        None => format!("Failed to walk {:?}", root),
    };
    ExportError::io(context, error.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_matches_prefix() {
        assert!(matches_prefix("0 (3)-Photoroom-a.jpg", "0 (3)-Photoroom"));
        assert!(!matches_prefix("0 (30)-Photoroom-a.jpg", "0 (3)-Photoroom"));
        assert!(!matches_prefix("x 0 (3)-Photoroom.jpg", "0 (3)-Photoroom"));
    }

    #[test]
    fn test_copy_tree_mirrors_structure() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        write(&src.join("a.jpg"), "a");
        write(&src.join("nested/deeper/b.jpg"), "b");
        fs::create_dir_all(src.join("empty")).unwrap();

        let dest = tmp.path().join("out/dest");
        let copied = copy_tree(&src, &dest).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(fs::read_to_string(dest.join("a.jpg")).unwrap(), "a");
        assert_eq!(fs::read_to_string(dest.join("nested/deeper/b.jpg")).unwrap(), "b");
        assert!(dest.join("empty").is_dir());
        assert!(src.join("a.jpg").exists());
    }

    #[test]
    fn test_copy_tree_overwrites_and_keeps_extra_files() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dest = tmp.path().join("dest");
        write(&src.join("a.jpg"), "new");
        write(&dest.join("a.jpg"), "old");
        write(&dest.join("keep.jpg"), "keep");

        copy_tree(&src, &dest).unwrap();

        assert_eq!(fs::read_to_string(dest.join("a.jpg")).unwrap(), "new");
        assert_eq!(fs::read_to_string(dest.join("keep.jpg")).unwrap(), "keep");
    }

    #[test]
    fn test_copy_tree_missing_source() {
        let tmp = TempDir::new().unwrap();
        let err = copy_tree(tmp.path().join("nope"), tmp.path().join("dest")).unwrap_err();
        assert!(matches!(err, ExportError::NotFound(_)));
        assert!(!tmp.path().join("dest").exists());
    }

    #[test]
    fn test_copy_preserves_modification_time() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("photo.jpg");
        write(&src, "pixels");
        let mtime = FileTime::from_unix_time(1_600_000_000, 0);
        filetime::set_file_mtime(&src, mtime).unwrap();

        let dest = tmp.path().join("copy.jpg");
        copy_file_with_metadata(&src, &dest).unwrap();

        let copied = fs::metadata(&dest).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&copied), mtime);
    }

    #[test]
    fn test_list_files_with_prefix_skips_directories() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join("0 (2)-Photoroom-b.jpg"), "b");
        write(&tmp.path().join("0 (2)-Photoroom-a.jpg"), "a");
        write(&tmp.path().join("0 (20)-Photoroom.jpg"), "x");
        fs::create_dir_all(tmp.path().join("0 (2)-Photoroom-dir")).unwrap();

        let files = list_files_with_prefix(tmp.path(), "0 (2)-Photoroom").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["0 (2)-Photoroom-a.jpg", "0 (2)-Photoroom-b.jpg"]);
    }

    #[test]
    fn test_list_files_with_prefix_propagates_read_errors() {
        let tmp = TempDir::new().unwrap();
        let err = list_files_with_prefix(tmp.path().join("missing"), "0 (1)-Photoroom").unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }

    #[test]
    fn test_list_subdirectories_sorted() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("Z (2)")).unwrap();
        fs::create_dir_all(tmp.path().join("Z (1)")).unwrap();
        write(&tmp.path().join("Z (3)"), "a file, not a folder");

        let names: Vec<_> = list_subdirectories(tmp.path())
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["Z (1)", "Z (2)"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_list_subdirectories_keeps_non_utf8_names() {
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().unwrap();
        let raw = std::ffi::OsStr::from_bytes(b"Z (\xff)");
        fs::create_dir_all(tmp.path().join(raw)).unwrap();

        let dirs = list_subdirectories(tmp.path()).unwrap();
        assert_eq!(dirs.len(), 1);
        assert_eq!(dirs[0].0.as_os_str(), raw);
    }

    #[test]
    fn test_walk_files_sorted_uses_forward_slashes() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join("b.jpg"), "b");
        write(&tmp.path().join("a/c.jpg"), "c");
        fs::create_dir_all(tmp.path().join("empty")).unwrap();

        let relative: Vec<_> = walk_files_sorted(tmp.path())
            .unwrap()
            .into_iter()
            .map(|f| f.relative)
            .collect();
        assert_eq!(relative, vec!["a/c.jpg", "b.jpg"]);
    }

    #[test]
    fn test_remove_tree() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("Z (1)");
        write(&dir.join("inner/photo.jpg"), "p");

        remove_tree(&dir).unwrap();
        assert!(!dir.exists());
    }
}
