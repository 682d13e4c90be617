pub mod item_folder;
pub mod notification;
pub mod paths;

pub use item_folder::{auxiliary_prefix, extract_index, is_item_folder_name, ItemFolder, NO_INDEX};
pub use notification::Notification;
pub use paths::{ensure_existing_dir, ChannelLayout, PathConfig, ALLEGRO_DIR, ARCHIVE_FILE_NAME, VINTED_DIR};
