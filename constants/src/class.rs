/// Reserved class code marking points that belong to no known class.
pub const SENTINEL_CLASS_CODE: u8 = 255;

/// Display name of the catch-all bucket for sentinel and out-of-range codes.
pub const UNASSIGNED_NAME: &str = "unassigned";

pub struct ClassInfo {
    pub id: u8,
    pub name: &'static str,
}

/// Well-known classification codes and their display names.
pub const CLASS_MAP: &[ClassInfo] = &[
    ClassInfo {
        id: 0,
        name: "never classified",
    },
    ClassInfo {
        id: 1,
        name: "unclassified",
    },
    ClassInfo { id: 2, name: "ground" },
    ClassInfo {
        id: 3,
        name: "vegetation - low",
    },
    ClassInfo {
        id: 4,
        name: "vegetation - medium",
    },
    ClassInfo {
        id: 5,
        name: "vegetation - high",
    },
    ClassInfo {
        id: 6,
        name: "building",
    },
    ClassInfo {
        id: 7,
        name: "low noise",
    },
    ClassInfo { id: 9, name: "water" },
    ClassInfo { id: 10, name: "rail" },
    ClassInfo {
        id: 11,
        name: "road surface",
    },
    ClassInfo {
        id: 17,
        name: "bridge deck",
    },
];

/// Display name for a raw class code. Codes without a mapped name get a
/// generated one so names stay unique within a manifest.
pub fn class_display_name(id: u8) -> String {
    CLASS_MAP
        .iter()
        .find(|c| c.id == id)
        .map_or_else(|| format!("class {}", id), |c| c.name.to_string())
}
