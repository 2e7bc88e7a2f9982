/// Incremental reconciliation of the live per-class controllers against a
/// freshly computed manifest.
use std::sync::Arc;

use constants::class::UNASSIGNED_NAME;

use crate::class_display::ClassDisplay;
use crate::manifest::ClassManifest;
use crate::render::{RenderDataFactory, RenderDataHandle};

/// The live set of per-class controllers, in stable first-seen order.
///
/// Classes are few (dozens at most), so lookups are linear over a Vec; the
/// order survives reconciliation for any class present in both the old and
/// the new manifest.
#[derive(Default)]
pub struct ClassDisplaySet {
    displays: Vec<ClassDisplay>,
}

impl ClassDisplaySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.displays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.displays.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassDisplay> {
        self.displays.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ClassDisplay> {
        self.displays.iter_mut()
    }

    pub fn get(&self, name: &str) -> Option<&ClassDisplay> {
        self.displays.iter().find(|display| display.name() == name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut ClassDisplay> {
        self.displays
            .iter_mut()
            .find(|display| display.name() == name)
    }

    pub(crate) fn into_displays(self) -> Vec<ClassDisplay> {
        self.displays
    }

    /// Diffs the live set against the manifest by name. Stale controllers
    /// are dropped and their handles returned for retirement; survivors get
    /// their colour refreshed (buffers are refreshed separately); new
    /// classes are constructed visible by default, the catch-all hidden.
    ///
    /// Reconciling the same manifest twice is a no-op for controller
    /// identity: no handle is republished and no controller recreated.
    pub fn reconcile(
        &mut self,
        manifest: &ClassManifest,
        factory: &Arc<dyn RenderDataFactory>,
        global_is_visible: bool,
        random_seed: Option<u64>,
    ) -> Vec<RenderDataHandle> {
        let mut retired = Vec::new();
        let mut kept = Vec::with_capacity(self.displays.len());
        for display in self.displays.drain(..) {
            let survives = manifest
                .entries()
                .iter()
                .any(|entry| entry.name == display.name());
            if survives {
                kept.push(display);
            } else {
                let display_name = display.name();
                tracing::debug!(class = %display_name, "class left the manifest");
                retired.push(display.retire());
            }
        }
        self.displays = kept;

        for entry in manifest.entries() {
            let existing = self
                .displays
                .iter()
                .position(|display| display.name() == entry.name);
            match existing {
                Some(index) => self.displays[index].set_colour(entry.colour),
                None => {
                    let class_is_visible = entry.name != UNASSIGNED_NAME;
                    tracing::debug!(class = %entry.name, count = entry.count, "class joined the manifest");
                    self.displays.push(ClassDisplay::new(
                        factory.clone(),
                        &entry.name,
                        entry.colour,
                        global_is_visible,
                        class_is_visible,
                        random_seed,
                    ));
                }
            }
        }

        retired
    }
}
