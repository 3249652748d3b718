use serde::{Deserialize, Serialize};

use crate::mesh::sphere::{DEFAULT_SECTORS, DEFAULT_STACKS};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Sphere tessellation.
pub struct MeshOptions {
    /// Longitude subdivisions.
    pub sector_count: u32,
    /// Latitude subdivisions.
    pub stack_count: u32,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            sector_count: DEFAULT_SECTORS,
            stack_count: DEFAULT_STACKS,
        }
    }
}
