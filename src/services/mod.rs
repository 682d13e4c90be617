pub mod archiver;
pub mod reorganizer;

pub use archiver::{pack_photos, PackReport};
pub use reorganizer::{reorganize, ProcessedItem, ReorganizeReport};
