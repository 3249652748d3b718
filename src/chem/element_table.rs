//! Element symbol → display radius and color.
//!
//! Radii are van der Waals radii in angstroms (Bondi, with common
//! extensions for ions and metals). Colors follow the RasMol CPK scheme.
//! Keys are uppercase symbols as produced by [`normalize_symbol`]; the
//! table itself never normalizes.

use glam::Vec3;
use rustc_hash::FxHashMap;

/// Radius used for symbols missing from the table, in angstroms.
pub const FALLBACK_RADIUS: f32 = 1.5;

/// Color used for symbols missing from the table.
pub const FALLBACK_COLOR: Vec3 = Vec3::ONE;

/// Visual properties of one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStyle {
    /// Sphere radius in angstroms (before `radius_scale`).
    pub radius: f32,
    /// RGB color, components in `[0, 1]`.
    pub color: Vec3,
}

impl ElementStyle {
    /// Style from a radius and an RGB triple.
    #[must_use]
    pub const fn new(radius: f32, color: [f32; 3]) -> Self {
        Self {
            radius,
            color: Vec3::new(color[0], color[1], color[2]),
        }
    }
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            radius: FALLBACK_RADIUS,
            color: FALLBACK_COLOR,
        }
    }
}

/// Built-in vdW radii and CPK colors.
const CPK_ELEMENTS: &[(&str, f32, [f32; 3])] = &[
    ("H", 1.20, [1.000, 1.000, 1.000]),
    ("HE", 1.40, [1.000, 0.753, 0.796]),
    ("LI", 1.82, [0.698, 0.133, 0.133]),
    ("B", 1.92, [0.000, 1.000, 0.000]),
    ("C", 1.70, [0.784, 0.784, 0.784]),
    ("N", 1.55, [0.561, 0.561, 1.000]),
    ("O", 1.52, [0.941, 0.000, 0.000]),
    ("F", 1.47, [0.855, 0.647, 0.125]),
    ("NA", 2.27, [0.000, 0.000, 1.000]),
    ("MG", 1.73, [0.133, 0.545, 0.133]),
    ("AL", 1.84, [0.502, 0.502, 0.565]),
    ("SI", 2.10, [0.855, 0.647, 0.125]),
    ("P", 1.80, [1.000, 0.647, 0.000]),
    ("S", 1.80, [1.000, 0.784, 0.196]),
    ("CL", 1.75, [0.000, 1.000, 0.000]),
    ("K", 2.75, [1.000, 0.078, 0.576]),
    ("CA", 2.31, [0.502, 0.502, 0.565]),
    ("MN", 2.05, [0.502, 0.502, 0.565]),
    ("FE", 2.04, [1.000, 0.647, 0.000]),
    ("CO", 2.00, [1.000, 0.078, 0.576]),
    ("NI", 1.63, [0.647, 0.165, 0.165]),
    ("CU", 1.40, [0.647, 0.165, 0.165]),
    ("ZN", 1.39, [0.647, 0.165, 0.165]),
    ("SE", 1.90, [1.000, 0.631, 0.000]),
    ("BR", 1.85, [0.647, 0.165, 0.165]),
    ("I", 1.98, [0.627, 0.125, 0.941]),
];

/// Read-only lookup from element symbol to [`ElementStyle`].
///
/// Built once with the consuming `with_*` methods, then shared by reference.
/// Lookups are total: unknown symbols (including `""`) resolve to the
/// fallback style. `radius_scale` converts angstroms to scene units and is
/// applied to table entries and the fallback alike.
#[derive(Debug, Clone)]
pub struct ElementTable {
    entries: FxHashMap<String, ElementStyle>,
    fallback: ElementStyle,
    radius_scale: f32,
}

impl ElementTable {
    /// A table with no entries, white 1.5 Å fallback and unit scale.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: FxHashMap::default(),
            fallback: ElementStyle::default(),
            radius_scale: 1.0,
        }
    }

    /// The built-in CPK table.
    #[must_use]
    pub fn cpk() -> Self {
        CPK_ELEMENTS
            .iter()
            .fold(Self::empty(), |table, &(symbol, radius, color)| {
                table.with_element(symbol, ElementStyle::new(radius, color))
            })
    }

    /// Add or replace the style for `symbol`.
    #[must_use]
    pub fn with_element(
        mut self,
        symbol: impl Into<String>,
        style: ElementStyle,
    ) -> Self {
        let _ = self.entries.insert(symbol.into(), style);
        self
    }

    /// Replace the style returned for unknown symbols.
    #[must_use]
    pub fn with_fallback(mut self, style: ElementStyle) -> Self {
        self.fallback = style;
        self
    }

    /// Set the angstrom → scene-unit factor applied to every radius.
    #[must_use]
    pub fn with_radius_scale(mut self, scale: f32) -> Self {
        self.radius_scale = scale;
        self
    }

    /// Scaled radius for `symbol`.
    #[must_use]
    pub fn radius_of(&self, symbol: &str) -> f32 {
        self.style_of(symbol).radius
    }

    /// Color for `symbol`.
    #[must_use]
    pub fn color_of(&self, symbol: &str) -> Vec3 {
        self.style_of(symbol).color
    }

    /// Style for `symbol` with the radius already scaled.
    #[must_use]
    pub fn style_of(&self, symbol: &str) -> ElementStyle {
        let style = self.entries.get(symbol).unwrap_or(&self.fallback);
        ElementStyle {
            radius: style.radius * self.radius_scale,
            color: style.color,
        }
    }

    /// Whether `symbol` has its own entry.
    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }

    /// Number of explicit entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no explicit entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The current angstrom → scene-unit factor.
    #[must_use]
    pub fn radius_scale(&self) -> f32 {
        self.radius_scale
    }
}

impl Default for ElementTable {
    fn default() -> Self {
        Self::cpk()
    }
}

/// Canonical table key for a raw symbol: whitespace trimmed, uppercased.
#[must_use]
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}
