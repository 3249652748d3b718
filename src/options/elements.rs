use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    chem::{
        element_table::{FALLBACK_COLOR, FALLBACK_RADIUS},
        normalize_symbol, ElementStyle, ElementTable,
    },
    error::MolsphereError,
};

/// Radius and color for one element symbol.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ElementOverride {
    /// Van der Waals radius in angstroms.
    pub radius: f32,
    /// Linear RGB in `[0, 1]`.
    pub color: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Element styling layered on top of the built-in CPK table.
///
/// ```toml
/// [elements]
/// radius_scale = 0.5
///
/// [elements.overrides.FE]
/// radius = 2.0
/// color = [0.9, 0.4, 0.1]
/// ```
pub struct ElementOptions {
    /// Scene units per angstrom, applied to every radius.
    pub radius_scale: f32,
    /// Radius used for symbols missing from the table.
    pub fallback_radius: f32,
    /// Color used for symbols missing from the table.
    pub fallback_color: [f32; 3],
    /// Per-symbol replacements or additions. Keys are normalized.
    pub overrides: BTreeMap<String, ElementOverride>,
}

impl Default for ElementOptions {
    fn default() -> Self {
        Self {
            radius_scale: 1.0,
            fallback_radius: FALLBACK_RADIUS,
            fallback_color: FALLBACK_COLOR.to_array(),
            overrides: BTreeMap::new(),
        }
    }
}

fn check_radius(what: &str, radius: f32) -> Result<(), MolsphereError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(MolsphereError::OptionsParse(format!(
            "{what}: radius must be positive, got {radius}"
        )))
    }
}

fn check_color(what: &str, color: [f32; 3]) -> Result<(), MolsphereError> {
    if color.iter().all(|c| (0.0..=1.0).contains(c)) {
        Ok(())
    } else {
        Err(MolsphereError::OptionsParse(format!(
            "{what}: color components must be in [0, 1], got {color:?}"
        )))
    }
}

impl ElementOptions {
    /// Build the lookup table: CPK entries, then overrides, fallback and
    /// scale.
    ///
    /// # Errors
    ///
    /// [`MolsphereError::OptionsParse`] for a non-positive radius or scale,
    /// a color component outside `[0, 1]`, or a blank override symbol.
    pub fn build_table(&self) -> Result<ElementTable, MolsphereError> {
        check_radius("elements.radius_scale", self.radius_scale)?;
        check_radius("elements.fallback_radius", self.fallback_radius)?;
        check_color("elements.fallback_color", self.fallback_color)?;

        let mut table = ElementTable::cpk()
            .with_fallback(ElementStyle::new(
                self.fallback_radius,
                self.fallback_color,
            ))
            .with_radius_scale(self.radius_scale);

        for (raw, style) in &self.overrides {
            let symbol = normalize_symbol(raw);
            if symbol.is_empty() {
                return Err(MolsphereError::OptionsParse(
                    "elements.overrides: blank element symbol".into(),
                ));
            }
            let what = format!("elements.overrides.{symbol}");
            check_radius(&what, style.radius)?;
            check_color(&what, style.color)?;
            table = table.with_element(
                symbol,
                ElementStyle::new(style.radius, style.color),
            );
        }

        log::debug!(
            "element table: {} entries, {} overrides, scale {}",
            table.len(),
            self.overrides.len(),
            table.radius_scale()
        );
        Ok(table)
    }
}
