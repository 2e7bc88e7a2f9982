/// Collaborator contracts for the storage layer that supplies positions and
/// class codes, plus the cooperative cancellation flag shared with the host.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bytemuck::{Pod, Zeroable};

use crate::error::SamplingError;

/// A single 3D point position.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Cooperative cancellation flag shared between a refresh and its requester.
/// Cancellation is observed between chunks, never mid-chunk.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// One fixed-layout slice of a streamed dataset. Positions and class codes
/// are index-aligned and equally long.
pub struct PointChunk {
    pub positions: Vec<Position>,
    pub class_codes: Vec<u8>,
}

impl PointChunk {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// A class known to the dataset, with its authoritative point count.
#[derive(Debug, Clone)]
pub struct KnownClass {
    pub name: String,
    pub count: u64,
}

/// Source of positions and class codes for one dataset snapshot.
///
/// Class codes in streamed chunks are dense: the code of a known class is
/// its index in the `known_classes` listing, and any code at or beyond that
/// listing's length (the sentinel included) marks an unassigned point.
pub trait PointDataset {
    /// Total number of points in the snapshot, all classes included.
    fn total_count(&self) -> u64;

    /// Known classes in dense code order.
    fn known_classes(&self) -> Vec<KnownClass>;

    /// Makes sure the position and class sections are loaded. Returns false
    /// when the data cannot be supplied right now; the caller then aborts
    /// with prior state intact and may retry later.
    fn ensure_available(&mut self, cancel: &CancelToken) -> Result<bool, SamplingError>;

    /// Streams the snapshot lazily as chunks. The sequence is finite and not
    /// restartable; request it once per refresh.
    fn chunks(&mut self) -> Box<dyn Iterator<Item = Result<PointChunk, SamplingError>> + '_>;
}
