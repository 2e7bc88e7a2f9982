/// Orchestration of one chart node: activation, cancellable refresh,
/// invalidation, and the swap traffic between controllers and the chart.
use std::sync::Arc;

use crate::dataset::{CancelToken, PointDataset};
use crate::error::SamplingError;
use crate::manifest::ClassManifest;
use crate::partition::partition_by_class;
use crate::reconcile::ClassDisplaySet;
use crate::render::{RenderDataFactory, RenderDataSource, RenderDataSwap};

/// Coarse lifecycle of a chart node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Uninitialized,
    Loading,
    Ready,
    Invalidated,
}

/// How a refresh ended. An aborted refresh (cancellation, data unavailable)
/// leaves the prior state fully intact and is safe to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Completed,
    Aborted,
}

pub struct ChartNode {
    factory: Option<Arc<dyn RenderDataFactory>>,
    surface: Option<Box<dyn RenderDataSource>>,
    displays: ClassDisplaySet,
    state: NodeState,
    global_is_visible: bool,
    random_seed: Option<u64>,
}

impl ChartNode {
    /// A seed makes every shuffle of every class deterministic; production
    /// callers pass `None` and draw fresh entropy per shuffle.
    pub fn new(random_seed: Option<u64>) -> Self {
        Self {
            factory: None,
            surface: None,
            displays: ClassDisplaySet::new(),
            state: NodeState::Uninitialized,
            global_is_visible: true,
            random_seed,
        }
    }

    /// Wires the chart collaborators. A missing collaborator is host
    /// misconfiguration and fatal for this node instance.
    pub fn activate(
        &mut self,
        factory: Option<Arc<dyn RenderDataFactory>>,
        surface: Option<Box<dyn RenderDataSource>>,
    ) -> Result<(), SamplingError> {
        self.factory = Some(factory.ok_or(SamplingError::Unresolved("render data factory"))?);
        self.surface = Some(surface.ok_or(SamplingError::Unresolved("chart data source"))?);
        Ok(())
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    /// True when the current render data no longer reflects a valid dataset
    /// snapshot; the host refreshes on the next interaction.
    pub fn needs_refresh(&self) -> bool {
        self.state != NodeState::Ready
    }

    pub fn global_is_visible(&self) -> bool {
        self.global_is_visible
    }

    /// Stable enumeration of the live per-class controllers.
    pub fn displays(&self) -> &ClassDisplaySet {
        &self.displays
    }

    /// Full reload: ensure sections, build the manifest, partition, then
    /// reconcile and republish. The streaming half observes `cancel`
    /// between chunks; controllers are only mutated once the whole stream
    /// has been partitioned, so an abort never publishes a partial set.
    pub fn refresh(
        &mut self,
        dataset: &mut dyn PointDataset,
        cancel: &CancelToken,
    ) -> Result<RefreshOutcome, SamplingError> {
        let factory = self
            .factory
            .clone()
            .ok_or(SamplingError::Unresolved("render data factory"))?;
        if self.surface.is_none() {
            return Err(SamplingError::Unresolved("chart data source"));
        }

        let prior = self.state;
        self.state = NodeState::Loading;

        let loaded = Self::load(dataset, cancel);
        let (manifest, mut buffers) = match loaded {
            Ok(Some(loaded)) => loaded,
            Ok(None) | Err(SamplingError::Cancelled) => {
                tracing::info!("refresh aborted, prior state kept");
                self.state = prior;
                return Ok(RefreshOutcome::Aborted);
            }
            Err(error) => {
                self.state = prior;
                return Err(error);
            }
        };

        let retired =
            self.displays
                .reconcile(&manifest, &factory, self.global_is_visible, self.random_seed);
        let surface = match self.surface.as_mut() {
            Some(surface) => surface,
            None => return Err(SamplingError::Unresolved("chart data source")),
        };
        for handle in retired {
            surface.remove(&handle);
            handle.release();
        }

        let mut swaps = Vec::with_capacity(self.displays.len());
        for display in self.displays.iter_mut() {
            if let Some(buffer) = buffers.remove(display.name()) {
                swaps.push(display.replace_positions(buffer));
            }
        }
        for swap in swaps {
            apply_swap(surface.as_mut(), swap);
        }

        tracing::info!(
            classes = self.displays.len(),
            total = manifest.total_count(),
            "refresh complete"
        );
        self.state = NodeState::Ready;
        Ok(RefreshOutcome::Completed)
    }

    /// The streaming half of a refresh. `Ok(None)` means the dataset could
    /// not supply the required sections right now.
    #[allow(clippy::type_complexity)]
    fn load(
        dataset: &mut dyn PointDataset,
        cancel: &CancelToken,
    ) -> Result<
        Option<(
            ClassManifest,
            std::collections::HashMap<String, Vec<crate::dataset::Position>>,
        )>,
        SamplingError,
    > {
        if !dataset.ensure_available(cancel)? {
            return Ok(None);
        }
        let manifest = ClassManifest::from_known_classes(
            dataset.total_count(),
            &dataset.known_classes(),
        );
        let buffers = partition_by_class(&manifest, dataset.chunks(), cancel)?;
        Ok(Some((manifest, buffers)))
    }

    /// The dataset signalled that the current snapshot is no longer valid:
    /// every class keeps its controller and attributes but its buffer is
    /// replaced with an empty one.
    pub fn invalidate(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if self.displays.is_empty() {
            self.state = NodeState::Invalidated;
            return;
        }
        tracing::info!(classes = self.displays.len(), "dataset invalidated, clearing buffers");
        let mut swaps = Vec::with_capacity(self.displays.len());
        for display in self.displays.iter_mut() {
            swaps.push(display.replace_positions(Vec::new()));
        }
        for swap in swaps {
            apply_swap(surface.as_mut(), swap);
        }
        self.state = NodeState::Invalidated;
    }

    /// Node-level visibility toggle. Per-class selections are untouched and
    /// come back exactly when the toggle returns.
    pub fn set_global_visible(&mut self, visible: bool) {
        if self.global_is_visible == visible {
            return;
        }
        self.global_is_visible = visible;
        for display in self.displays.iter_mut() {
            display.set_global_visible(visible);
        }
    }

    /// Percent override for one class, routed through the node so the
    /// resulting swap reaches the chart.
    pub fn set_display_percent(&mut self, class_name: &str, percent: f64) -> Result<(), SamplingError> {
        let Some(surface) = self.surface.as_mut() else {
            return Err(SamplingError::Unresolved("chart data source"));
        };
        let Some(display) = self.displays.get_mut(class_name) else {
            return Ok(());
        };
        if let Some(swap) = display.set_display_percent(percent) {
            apply_swap(surface.as_mut(), swap);
        }
        Ok(())
    }

    /// Visibility selection for one class; applied to the published handle
    /// in place.
    pub fn set_class_visible(&mut self, class_name: &str, visible: bool) {
        if let Some(display) = self.displays.get_mut(class_name) {
            display.set_visible(visible);
        }
    }

    /// Detaches every published handle from the chart and releases it.
    pub fn deactivate(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            let displays = std::mem::take(&mut self.displays);
            for display in displays.into_displays() {
                let handle = display.retire();
                surface.remove(&handle);
                handle.release();
            }
        }
        self.factory = None;
        self.state = NodeState::Uninitialized;
    }
}

fn apply_swap(surface: &mut dyn RenderDataSource, swap: RenderDataSwap) {
    surface.remove(&swap.old);
    swap.old.release();
    surface.add(swap.new);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Position;
    use crate::test_support::{SharedSource, TestDataset, TestFactory};
    use constants::class::UNASSIGNED_NAME;

    fn activated_node(factory: &Arc<TestFactory>) -> (ChartNode, SharedSource) {
        let mut node = ChartNode::new(Some(3));
        let source = SharedSource::new();
        node.activate(
            Some(factory.clone()),
            Some(Box::new(source.clone())),
        )
        .unwrap();
        (node, source)
    }

    fn dataset() -> TestDataset {
        // 4 ground, 2 water, 1 point carrying the sentinel code.
        TestDataset::new(
            &[("ground", 4), ("water", 2)],
            &[
                (Position::new(0.0, 0.0, 0.0), 0),
                (Position::new(1.0, 0.0, 0.0), 0),
                (Position::new(2.0, 0.0, 0.0), 1),
                (Position::new(3.0, 0.0, 0.0), 0),
                (Position::new(4.0, 0.0, 0.0), 255),
                (Position::new(5.0, 0.0, 0.0), 1),
                (Position::new(6.0, 0.0, 0.0), 0),
            ],
            3,
        )
    }

    #[test]
    fn activation_requires_both_collaborators() {
        let factory = TestFactory::shared();
        let mut node = ChartNode::new(None);
        let result = node.activate(Some(factory), None);
        assert!(matches!(result, Err(SamplingError::Unresolved(_))));
    }

    #[test]
    fn refresh_publishes_one_buffer_per_class() {
        let factory = TestFactory::shared();
        let (mut node, source) = activated_node(&factory);
        let mut data = dataset();

        let outcome = node.refresh(&mut data, &CancelToken::new()).unwrap();

        assert_eq!(outcome, RefreshOutcome::Completed);
        assert_eq!(node.state(), NodeState::Ready);
        assert!(!node.needs_refresh());

        let live = source.live();
        assert_eq!(live.len(), 3);
        let mut counts: Vec<usize> = live.iter().map(|handle| handle.point_count()).collect();
        counts.sort_unstable();
        assert_eq!(counts, vec![1, 2, 4]);

        let unassigned = node.displays().get(UNASSIGNED_NAME).unwrap();
        assert_eq!(unassigned.position_count(), 1);
        assert!(!unassigned.is_visible());
    }

    #[test]
    fn unavailable_data_aborts_without_side_effects() {
        let factory = TestFactory::shared();
        let (mut node, source) = activated_node(&factory);
        let mut data = dataset().unavailable();

        let outcome = node.refresh(&mut data, &CancelToken::new()).unwrap();

        assert_eq!(outcome, RefreshOutcome::Aborted);
        assert_eq!(node.state(), NodeState::Uninitialized);
        assert!(node.displays().is_empty());
        assert!(source.live().is_empty());
    }

    #[test]
    fn cancellation_keeps_the_ready_state_intact() {
        let factory = TestFactory::shared();
        let (mut node, source) = activated_node(&factory);
        let mut data = dataset();
        node.refresh(&mut data, &CancelToken::new()).unwrap();
        node.set_display_percent("ground", 50.0).unwrap();
        let live_before = source.live();

        let cancel = CancelToken::new();
        let mut slow = dataset().cancelling_on_chunk(1, cancel.clone());
        let outcome = node.refresh(&mut slow, &cancel).unwrap();

        assert_eq!(outcome, RefreshOutcome::Aborted);
        assert_eq!(node.state(), NodeState::Ready);
        // Handles in the chart are exactly the ones from before the attempt.
        let live_after = source.live();
        assert_eq!(live_after.len(), live_before.len());
        for (before, after) in live_before.iter().zip(live_after.iter()) {
            assert!(Arc::ptr_eq(before, after));
        }
        let ground = node.displays().get("ground").unwrap();
        assert_eq!(ground.display_percent(), 50.0);
        assert_eq!(ground.display_count(), 2);
    }

    #[test]
    fn invalidation_clears_buffers_but_keeps_controllers() {
        let factory = TestFactory::shared();
        let (mut node, source) = activated_node(&factory);
        let mut data = dataset();
        node.refresh(&mut data, &CancelToken::new()).unwrap();
        node.set_class_visible("water", false);

        node.invalidate();

        assert_eq!(node.state(), NodeState::Invalidated);
        assert!(node.needs_refresh());
        assert_eq!(node.displays().len(), 3);
        assert!(!node.displays().get("water").unwrap().is_visible());
        assert!(source.live().iter().all(|handle| handle.point_count() == 0));
    }

    #[test]
    fn refresh_after_invalidation_restores_content() {
        let factory = TestFactory::shared();
        let (mut node, source) = activated_node(&factory);
        let mut data = dataset();
        node.refresh(&mut data, &CancelToken::new()).unwrap();
        node.invalidate();

        let mut reloaded = dataset();
        node.refresh(&mut reloaded, &CancelToken::new()).unwrap();

        assert_eq!(node.state(), NodeState::Ready);
        let total: usize = source.live().iter().map(|handle| handle.point_count()).sum();
        assert_eq!(total, 7);
    }

    #[test]
    fn global_visibility_round_trips_per_class_selections() {
        let factory = TestFactory::shared();
        let (mut node, _source) = activated_node(&factory);
        let mut data = dataset();
        node.refresh(&mut data, &CancelToken::new()).unwrap();
        node.set_class_visible("water", false);

        node.set_global_visible(false);
        node.set_global_visible(true);

        assert!(node.displays().get("ground").unwrap().is_visible());
        assert!(!node.displays().get("water").unwrap().is_visible());
        let water = factory.last_named("water").unwrap();
        assert!(!water.is_visible());
        let ground = factory.last_named("ground").unwrap();
        assert!(ground.is_visible());
    }

    #[test]
    fn percent_override_survives_a_reload_and_reaches_the_chart() {
        let factory = TestFactory::shared();
        let (mut node, source) = activated_node(&factory);
        let mut data = dataset();
        node.refresh(&mut data, &CancelToken::new()).unwrap();

        node.set_display_percent("ground", 50.0).unwrap();
        assert_eq!(
            node.displays().get("ground").unwrap().display_count(),
            2
        );

        let mut reloaded = dataset();
        node.refresh(&mut reloaded, &CancelToken::new()).unwrap();

        let ground = node.displays().get("ground").unwrap();
        assert!(ground.is_percent_overridden());
        assert_eq!(ground.display_percent(), 50.0);
        let ground_handle = factory.last_named("ground").unwrap();
        assert_eq!(ground_handle.positions.len(), 2);
        assert_eq!(source.live().len(), 3);
    }

    #[test]
    fn reclassification_retires_stale_classes() {
        let factory = TestFactory::shared();
        let (mut node, source) = activated_node(&factory);
        let mut data = dataset();
        node.refresh(&mut data, &CancelToken::new()).unwrap();

        // Water disappears, rail appears.
        let mut reclassified = TestDataset::new(
            &[("ground", 2), ("rail", 1)],
            &[
                (Position::new(0.0, 0.0, 0.0), 0),
                (Position::new(1.0, 0.0, 0.0), 1),
                (Position::new(2.0, 0.0, 0.0), 0),
            ],
            2,
        );
        node.refresh(&mut reclassified, &CancelToken::new()).unwrap();

        assert!(node.displays().get("water").is_none());
        assert!(node.displays().get("rail").is_some());
        assert_eq!(source.live().len(), 3);
        let water = factory.last_named("water").unwrap();
        assert!(water.is_released());
    }

    #[test]
    fn deactivation_releases_every_live_handle() {
        let factory = TestFactory::shared();
        let (mut node, source) = activated_node(&factory);
        let mut data = dataset();
        node.refresh(&mut data, &CancelToken::new()).unwrap();

        node.deactivate();

        assert!(source.live().is_empty());
        assert_eq!(node.state(), NodeState::Uninitialized);
        assert!(node.displays().is_empty());
        // Everything the factory ever handed out is released by now: the
        // published handles on deactivate, the rest when swaps retired them.
        assert!(factory.created().iter().all(|data| data.is_released()));
    }
}
