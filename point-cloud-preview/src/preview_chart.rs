/// In-memory stand-in for the host 3D chart: a factory producing owned
/// point blocks and a data source tracking which blocks are live.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use constants::colour::Rgba;
use point_cloud_sampling::{
    PointsRenderData, Position, RenderDataFactory, RenderDataHandle, RenderDataSource,
};

pub struct PreviewRenderData {
    name: String,
    positions: Vec<Position>,
    colour: Mutex<Rgba>,
    visible: AtomicBool,
    released: AtomicBool,
}

impl PointsRenderData for PreviewRenderData {
    fn point_count(&self) -> usize {
        self.positions.len()
    }

    fn set_colour(&self, colour: Rgba) {
        *self.colour.lock().unwrap() = colour;
    }

    fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    fn release(&self) {
        if self.released.swap(true, Ordering::SeqCst) {
            tracing::warn!(class = %self.name, "render data released twice");
        }
    }
}

#[derive(Default)]
pub struct PreviewFactory;

impl RenderDataFactory for PreviewFactory {
    fn create_points(
        &self,
        positions: Vec<Position>,
        colour: Rgba,
        name: &str,
        visible: bool,
    ) -> RenderDataHandle {
        Arc::new(PreviewRenderData {
            name: name.to_string(),
            positions,
            colour: Mutex::new(colour),
            visible: AtomicBool::new(visible),
            released: AtomicBool::new(false),
        })
    }
}

/// Clonable view of one shared live collection, so the node can own a copy
/// while the summary still reads the final contents.
#[derive(Clone, Default)]
pub struct PreviewSurface {
    live: Arc<Mutex<Vec<RenderDataHandle>>>,
}

impl PreviewSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    pub fn live_points(&self) -> usize {
        self.live
            .lock()
            .unwrap()
            .iter()
            .map(|handle| handle.point_count())
            .sum()
    }
}

impl RenderDataSource for PreviewSurface {
    fn add(&mut self, data: RenderDataHandle) {
        self.live.lock().unwrap().push(data);
    }

    fn remove(&mut self, data: &RenderDataHandle) -> bool {
        let mut live = self.live.lock().unwrap();
        match live.iter().position(|handle| Arc::ptr_eq(handle, data)) {
            Some(index) => {
                live.remove(index);
                true
            }
            None => false,
        }
    }
}
