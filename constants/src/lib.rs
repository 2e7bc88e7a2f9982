//! Shared limits, classification metadata, and display colours for the
//! point cloud sampling pipeline.

pub mod class;
pub mod colour;
pub mod render_settings;

pub use class::{CLASS_MAP, ClassInfo, SENTINEL_CLASS_CODE, UNASSIGNED_NAME, class_display_name};
pub use colour::{CLASS_PALETTE, Rgba, UNASSIGNED_COLOUR, palette_colour};
pub use render_settings::{DEFAULT_DISPLAY_COUNT_MAX, HARD_MAX_RENDER_COUNT, STREAM_CHUNK_SIZE};
