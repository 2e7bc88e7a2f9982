/// Collaborator contracts for the 3D chart: render data creation, the
/// chart's live collection, and the swap records that move handles between
/// the two.
use std::sync::Arc;

use constants::colour::Rgba;

use crate::dataset::Position;

/// Opaque renderable block of points plus display attributes.
///
/// Ownership sits with the chart data source until the handle is superseded
/// or its controller goes away. `release` frees the underlying resources and
/// must be called exactly once, by whoever retires the handle.
pub trait PointsRenderData: Send + Sync {
    fn point_count(&self) -> usize;
    fn set_colour(&self, colour: Rgba);
    fn set_visible(&self, visible: bool);
    fn release(&self);
}

pub type RenderDataHandle = Arc<dyn PointsRenderData>;

/// Creates renderable point blocks for the chart.
pub trait RenderDataFactory {
    fn create_points(
        &self,
        positions: Vec<Position>,
        colour: Rgba,
        name: &str,
        visible: bool,
    ) -> RenderDataHandle;
}

/// The chart's collection of live render data.
pub trait RenderDataSource {
    fn add(&mut self, data: RenderDataHandle);

    /// Removes a handle if present. Unknown handles are ignored so a swap
    /// can retire a handle that never reached the chart.
    fn remove(&mut self, data: &RenderDataHandle) -> bool;
}

/// Record of one published-buffer replacement for a class. The consumer
/// removes and releases `old`, then adds `new`.
pub struct RenderDataSwap {
    pub class_name: String,
    pub old: RenderDataHandle,
    pub new: RenderDataHandle,
}
