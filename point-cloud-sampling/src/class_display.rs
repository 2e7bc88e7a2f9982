/// Per-class sampling controller: owns the shuffled position buffer, the
/// display percent, and the currently published render data for one class.
use std::sync::Arc;

use constants::colour::Rgba;
use constants::render_settings::{DEFAULT_DISPLAY_COUNT_MAX, HARD_MAX_RENDER_COUNT};

use crate::dataset::Position;
use crate::render::{RenderDataFactory, RenderDataHandle, RenderDataSwap};
use crate::shuffle::{rng_from_seed, shuffle_in_place};

pub struct ClassDisplay {
    name: String,
    colour: Rgba,
    is_visible: bool,
    global_is_visible: bool,
    /// Percent of the class shown, kept clamped below the render ceiling so
    /// readers always observe the effective value.
    display_percent: f64,
    percent_overridden: bool,
    random_seed: Option<u64>,
    shuffled_positions: Vec<Position>,
    render_data: RenderDataHandle,
    factory: Arc<dyn RenderDataFactory>,
}

impl ClassDisplay {
    /// Starts with an empty buffer and a degenerate published handle; the
    /// first `replace_positions` call supplies real content.
    pub fn new(
        factory: Arc<dyn RenderDataFactory>,
        name: &str,
        colour: Rgba,
        global_is_visible: bool,
        class_is_visible: bool,
        random_seed: Option<u64>,
    ) -> Self {
        let render_data = factory.create_points(
            Vec::new(),
            colour,
            name,
            global_is_visible && class_is_visible,
        );
        Self {
            name: name.to_string(),
            colour,
            is_visible: class_is_visible,
            global_is_visible,
            display_percent: 100.0,
            percent_overridden: false,
            random_seed,
            shuffled_positions: Vec::new(),
            render_data,
            factory,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn colour(&self) -> Rgba {
        self.colour
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    pub fn display_percent(&self) -> f64 {
        self.display_percent
    }

    pub fn is_percent_overridden(&self) -> bool {
        self.percent_overridden
    }

    /// Length of the full (unsampled) position buffer.
    pub fn position_count(&self) -> usize {
        self.shuffled_positions.len()
    }

    /// Number of points in the published sample.
    pub fn display_count(&self) -> usize {
        let ratio = self.display_percent / 100.0;
        (self.shuffled_positions.len() as f64 * ratio).round() as usize
    }

    /// Takes ownership of a fresh buffer, shuffles it, re-derives the
    /// display percent against the new length, and republishes. The returned
    /// swap carries the retired and the replacement handle.
    pub fn replace_positions(&mut self, mut positions: Vec<Position>) -> RenderDataSwap {
        let mut rng = rng_from_seed(self.random_seed);
        shuffle_in_place(&mut positions, &mut rng);
        self.shuffled_positions = positions;
        self.refresh_display_percent();
        let old = self.publish();
        tracing::debug!(
            class = %self.name,
            total = self.shuffled_positions.len(),
            percent = self.display_percent,
            sampled = self.display_count(),
            "positions replaced"
        );
        RenderDataSwap {
            class_name: self.name.clone(),
            old,
            new: self.render_data.clone(),
        }
    }

    /// User-facing percent override. Input is clamped to 0-100 before the
    /// ceiling clamp. Republishes only when the effective percent changed.
    pub fn set_display_percent(&mut self, percent: f64) -> Option<RenderDataSwap> {
        self.percent_overridden = true;
        let requested = percent.clamp(0.0, 100.0);
        let effective = match self.shuffled_positions.len() {
            0 => requested,
            len => requested.min(ceiling_percent_for(len)),
        };
        if effective == self.display_percent {
            return None;
        }
        self.display_percent = effective;
        let old = self.publish();
        Some(RenderDataSwap {
            class_name: self.name.clone(),
            old,
            new: self.render_data.clone(),
        })
    }

    /// Colour updates are applied to the published handle in place; a full
    /// republish is reserved for buffer-content changes.
    pub fn set_colour(&mut self, colour: Rgba) {
        if self.colour != colour {
            self.colour = colour;
            self.render_data.set_colour(colour);
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.is_visible != visible {
            self.is_visible = visible;
            self.render_data.set_visible(self.real_visibility());
        }
    }

    /// Turning global visibility off forces invisibility; turning it back on
    /// restores whatever the per-class selection was.
    pub fn set_global_visible(&mut self, global_is_visible: bool) {
        if self.global_is_visible != global_is_visible {
            self.global_is_visible = global_is_visible;
            self.render_data.set_visible(self.real_visibility());
        }
    }

    /// Hands the published handle back for removal and release when this
    /// class leaves the live set.
    pub fn retire(self) -> RenderDataHandle {
        self.render_data
    }

    fn real_visibility(&self) -> bool {
        self.global_is_visible && self.is_visible
    }

    /// Default rule first (unless overridden), ceiling clamp always, both
    /// against the buffer currently held. Zero-length buffers keep the
    /// stored percent; the count is zero either way.
    fn refresh_display_percent(&mut self) {
        let len = self.shuffled_positions.len();
        if len == 0 {
            return;
        }
        if !self.percent_overridden {
            self.display_percent = default_percent_for(len);
        }
        self.display_percent = self.display_percent.min(ceiling_percent_for(len));
    }

    fn publish(&mut self) -> RenderDataHandle {
        let sample = self.shuffled_positions[..self.display_count()].to_vec();
        let new = self
            .factory
            .create_points(sample, self.colour, &self.name, self.real_visibility());
        std::mem::replace(&mut self.render_data, new)
    }
}

/// Keeps small classes fully visible and caps large ones to the default
/// target count.
fn default_percent_for(len: usize) -> f64 {
    (DEFAULT_DISPLAY_COUNT_MAX as f64 / len as f64 * 100.0).min(100.0)
}

/// Percent at which a class of `len` points hits the hard render ceiling.
/// May exceed 100 for small classes, in which case it never binds.
fn ceiling_percent_for(len: usize) -> f64 {
    HARD_MAX_RENDER_COUNT as f64 / len as f64 * 100.0
}
