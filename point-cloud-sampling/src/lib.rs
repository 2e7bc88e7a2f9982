//! Per-class random sampling of large point clouds for a 3D chart.
//!
//! A dataset snapshot is partitioned into per-class position buffers in one
//! linear pass, each class is shuffled and capped to a renderable subset,
//! and the set of live per-class controllers is reconciled incrementally as
//! the dataset is reloaded, reclassified, or invalidated. The chart, the
//! dataset storage, and the host lifecycle are reached only through the
//! collaborator traits in [`dataset`] and [`render`].

pub mod class_display;
pub mod dataset;
pub mod error;
pub mod manifest;
pub mod node;
pub mod partition;
pub mod reconcile;
pub mod render;
pub mod shuffle;

#[cfg(test)]
pub(crate) mod test_support;

pub use class_display::ClassDisplay;
pub use dataset::{CancelToken, KnownClass, PointChunk, PointDataset, Position};
pub use error::SamplingError;
pub use manifest::{ClassEntry, ClassManifest};
pub use node::{ChartNode, NodeState, RefreshOutcome};
pub use reconcile::ClassDisplaySet;
pub use render::{
    PointsRenderData, RenderDataFactory, RenderDataHandle, RenderDataSource, RenderDataSwap,
};
