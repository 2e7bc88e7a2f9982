use serde::{Deserialize, Serialize};

/// Display colour in linear RGBA, components in 0-1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// Colour assigned to the catch-all class.
pub const UNASSIGNED_COLOUR: Rgba = Rgba::opaque(0.66, 0.66, 0.66);

/// Distinct display colours cycled over the known classes of a manifest.
pub const CLASS_PALETTE: &[Rgba] = &[
    Rgba::opaque(0.89, 0.10, 0.11),
    Rgba::opaque(0.22, 0.49, 0.72),
    Rgba::opaque(0.30, 0.69, 0.29),
    Rgba::opaque(1.00, 0.50, 0.00),
    Rgba::opaque(0.60, 0.31, 0.64),
    Rgba::opaque(1.00, 1.00, 0.20),
    Rgba::opaque(0.65, 0.34, 0.16),
    Rgba::opaque(0.97, 0.51, 0.75),
    Rgba::opaque(0.12, 0.74, 0.83),
    Rgba::opaque(0.55, 0.83, 0.78),
    Rgba::opaque(0.75, 0.73, 0.13),
    Rgba::opaque(0.46, 0.44, 0.70),
];

/// Palette colour for the class at `index` within its manifest.
pub fn palette_colour(index: usize) -> Rgba {
    CLASS_PALETTE[index % CLASS_PALETTE.len()]
}
