//! In-memory stand-ins for the chart and dataset collaborators.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use constants::colour::Rgba;

use crate::dataset::{CancelToken, KnownClass, PointChunk, PointDataset, Position};
use crate::error::SamplingError;
use crate::render::{PointsRenderData, RenderDataFactory, RenderDataHandle, RenderDataSource};

pub(crate) struct TestRenderData {
    pub positions: Vec<Position>,
    pub name: String,
    colour: Mutex<Rgba>,
    visible: AtomicBool,
    released: AtomicBool,
}

impl TestRenderData {
    pub fn colour(&self) -> Rgba {
        *self.colour.lock().unwrap()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

impl PointsRenderData for TestRenderData {
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
        let released_before = self.released.swap(true, Ordering::SeqCst);
        assert!(!released_before, "render data released twice: {}", self.name);
    }
}

/// Factory that keeps every block it ever created so tests can inspect
/// colour, visibility, and release bookkeeping after the fact.
#[derive(Default)]
pub(crate) struct TestFactory {
    created: Mutex<Vec<Arc<TestRenderData>>>,
}

impl TestFactory {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn created(&self) -> Vec<Arc<TestRenderData>> {
        self.created.lock().unwrap().clone()
    }

    /// Most recently created block for a class name.
    pub fn last_named(&self, name: &str) -> Option<Arc<TestRenderData>> {
        self.created
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|data| data.name == name)
            .cloned()
    }
}

impl RenderDataFactory for TestFactory {
    fn create_points(
        &self,
        positions: Vec<Position>,
        colour: Rgba,
        name: &str,
        visible: bool,
    ) -> RenderDataHandle {
        let data = Arc::new(TestRenderData {
            positions,
            name: name.to_string(),
            colour: Mutex::new(colour),
            visible: AtomicBool::new(visible),
            released: AtomicBool::new(false),
        });
        self.created.lock().unwrap().push(data.clone());
        data
    }
}

#[derive(Default)]
struct RecordingState {
    live: Vec<RenderDataHandle>,
}

/// Chart data source double; clones share one live collection so a test can
/// look inside while the node owns the other clone.
#[derive(Clone, Default)]
pub(crate) struct SharedSource {
    state: Arc<Mutex<RecordingState>>,
}

impl SharedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live(&self) -> Vec<RenderDataHandle> {
        self.state.lock().unwrap().live.clone()
    }
}

impl RenderDataSource for SharedSource {
    fn add(&mut self, data: RenderDataHandle) {
        self.state.lock().unwrap().live.push(data);
    }

    fn remove(&mut self, data: &RenderDataHandle) -> bool {
        let mut state = self.state.lock().unwrap();
        match state.live.iter().position(|handle| Arc::ptr_eq(handle, data)) {
            Some(index) => {
                state.live.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Scripted dataset snapshot with raw class codes; dense remapping is the
/// identity here since tests list known classes in code order.
pub(crate) struct TestDataset {
    known: Vec<KnownClass>,
    points: Vec<(Position, u8)>,
    chunk_size: usize,
    available: bool,
    cancel_on_chunk: Option<(usize, CancelToken)>,
}

impl TestDataset {
    pub fn new(known: &[(&str, u64)], points: &[(Position, u8)], chunk_size: usize) -> Self {
        Self {
            known: known
                .iter()
                .map(|(name, count)| KnownClass {
                    name: name.to_string(),
                    count: *count,
                })
                .collect(),
            points: points.to_vec(),
            chunk_size,
            available: true,
            cancel_on_chunk: None,
        }
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Fires the token while producing the given chunk, as an external
    /// cancellation racing the stream would.
    pub fn cancelling_on_chunk(mut self, index: usize, token: CancelToken) -> Self {
        self.cancel_on_chunk = Some((index, token));
        self
    }
}

impl PointDataset for TestDataset {
    fn total_count(&self) -> u64 {
        self.points.len() as u64
    }

    fn known_classes(&self) -> Vec<KnownClass> {
        self.known.clone()
    }

    fn ensure_available(&mut self, cancel: &CancelToken) -> Result<bool, SamplingError> {
        Ok(self.available && !cancel.is_cancelled())
    }

    fn chunks(&mut self) -> Box<dyn Iterator<Item = Result<PointChunk, SamplingError>> + '_> {
        let chunks: Vec<PointChunk> = self
            .points
            .chunks(self.chunk_size.max(1))
            .map(|points| PointChunk {
                positions: points.iter().map(|(position, _)| *position).collect(),
                class_codes: points.iter().map(|(_, code)| *code).collect(),
            })
            .collect();
        let cancel_on_chunk = self.cancel_on_chunk.clone();
        Box::new(chunks.into_iter().enumerate().map(move |(index, chunk)| {
            if let Some((at, token)) = &cancel_on_chunk {
                if index == *at {
                    token.cancel();
                }
            }
            Ok(chunk)
        }))
    }
}
