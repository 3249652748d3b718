//! Viewer and rendering options with TOML file support.
//!
//! Every section uses `#[serde(default)]` so partial files (e.g. only
//! overriding `[mesh]`) work. The element section is turned into an
//! [`ElementTable`](crate::chem::ElementTable) by
//! [`ElementOptions::build_table`].

mod camera;
mod display;
mod elements;
mod keybindings;
mod mesh;

use std::path::Path;

pub use camera::CameraOptions;
pub use display::DisplayOptions;
pub use elements::{ElementOptions, ElementOverride};
pub use keybindings::KeybindingOptions;
pub use mesh::MeshOptions;
use serde::{Deserialize, Serialize};

use crate::error::MolsphereError;

/// Top-level options container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Projection and fly-control parameters.
    pub camera: CameraOptions,
    /// Sphere tessellation.
    pub mesh: MeshOptions,
    /// Element radii, colors and scale.
    pub elements: ElementOptions,
    /// Background and shading.
    pub display: DisplayOptions,
    /// Keyboard binding options.
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`MolsphereError::OptionsParse`] for malformed TOML.
    pub fn from_toml(content: &str) -> Result<Self, MolsphereError> {
        let mut options: Self = toml::from_str(content)
            .map_err(|e| MolsphereError::OptionsParse(e.to_string()))?;
        options.keybindings.rebuild_reverse_map();
        Ok(options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`MolsphereError::Io`] if the file cannot be read,
    /// [`MolsphereError::OptionsParse`] for malformed TOML.
    pub fn load(path: &Path) -> Result<Self, MolsphereError> {
        let content = std::fs::read_to_string(path)?;
        let options = Self::from_toml(&content)?;
        log::info!("Loaded options from {}", path.display());
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// [`MolsphereError::OptionsParse`] if serialization fails,
    /// [`MolsphereError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), MolsphereError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MolsphereError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::input::KeyAction;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed = Options::from_toml(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[mesh]
sector_count = 12
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.mesh.sector_count, 12);
        // Everything else should be default
        assert_eq!(opts.mesh.stack_count, 18);
        assert_eq!(opts.camera.fovy, 45.0);
        assert_eq!(opts.elements.radius_scale, 1.0);
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[mesh]\nsector_count = \"many\"")
            .unwrap_err();
        assert!(matches!(err, MolsphereError::OptionsParse(_)));
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("KeyW"),
            Some(KeyAction::MoveForward)
        );
        assert_eq!(opts.keybindings.lookup("Escape"), Some(KeyAction::Quit));
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn loaded_keybindings_rebuild_lookup() {
        let toml_str = r#"
[keybindings.bindings]
move_forward = "ArrowUp"
quit = "KeyQ"
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(
            opts.keybindings.lookup("ArrowUp"),
            Some(KeyAction::MoveForward)
        );
        assert_eq!(opts.keybindings.lookup("KeyQ"), Some(KeyAction::Quit));
        assert_eq!(opts.keybindings.lookup("KeyW"), None);
    }

    #[test]
    fn element_overrides_flow_into_table() {
        let toml_str = r"
[elements]
radius_scale = 0.5
fallback_radius = 2.0

[elements.overrides.fe]
radius = 2.4
color = [0.9, 0.4, 0.1]
";
        let table = Options::from_toml(toml_str)
            .unwrap()
            .elements
            .build_table()
            .unwrap();
        assert_eq!(table.radius_of("FE"), 1.2);
        assert_eq!(table.color_of("FE"), Vec3::new(0.9, 0.4, 0.1));
        assert_eq!(table.radius_of("C"), 0.85);
        assert_eq!(table.radius_of("XX"), 1.0);
        assert_eq!(table.color_of("XX"), Vec3::ONE);
    }

    #[test]
    fn invalid_element_options_are_rejected() {
        let mut elements = ElementOptions::default();
        elements.radius_scale = 0.0;
        assert!(elements.build_table().is_err());

        let mut elements = ElementOptions::default();
        let _ = elements.overrides.insert(
            "C".into(),
            ElementOverride {
                radius: -1.0,
                color: [0.5; 3],
            },
        );
        assert!(elements.build_table().is_err());

        let mut elements = ElementOptions::default();
        let _ = elements.overrides.insert(
            "O".into(),
            ElementOverride {
                radius: 1.5,
                color: [1.2, 0.0, 0.0],
            },
        );
        let err = elements.build_table().unwrap_err();
        assert!(err.to_string().contains("elements.overrides.O"));

        let mut elements = ElementOptions::default();
        let _ = elements.overrides.insert(
            "  ".into(),
            ElementOverride {
                radius: 1.0,
                color: [0.5; 3],
            },
        );
        assert!(elements.build_table().is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir()
            .join(format!("molsphere-options-{}", std::process::id()));
        let path = dir.join("view.toml");
        let mut opts = Options::default();
        opts.display.ambient = 0.4;
        opts.save(&path).unwrap();
        let loaded = Options::load(&path).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
        assert_eq!(loaded, opts);
    }
}
