/// Hard ceiling on points ever rendered for a single class.
pub const HARD_MAX_RENDER_COUNT: usize = 5_000_000;

/// Target visible count per class when the display percent has not been
/// overridden by the user.
pub const DEFAULT_DISPLAY_COUNT_MAX: usize = 100_000;

/// Points per chunk when a dataset is streamed incrementally.
pub const STREAM_CHUNK_SIZE: usize = 65_536;
