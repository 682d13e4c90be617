pub mod digest;
pub mod file_operations;

pub use digest::sha256_file;
pub use file_operations::{
    copy_file_with_metadata, copy_tree, list_files_with_prefix, list_subdirectories, remove_tree,
    to_slash_path, walk_files_sorted, WalkedFile,
};
