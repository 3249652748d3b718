//! CPU-side triangle meshes shared by every instance.

/// UV-sphere tessellation.
pub mod sphere;

use std::fmt;

/// Vertex of a shared mesh. Must match the per-vertex inputs at locations
/// 0–2 of `instanced_sphere.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Unit outward normal.
    pub normal: [f32; 3],
    /// Texture coordinate in `[0, 1]²`.
    pub tex_coord: [f32; 2],
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGeometry {
    /// Vertices in emission order.
    pub vertices: Vec<Vertex>,
    /// Triangle indices, three per triangle, each `< vertices.len()`.
    pub indices: Vec<u32>,
}

impl MeshGeometry {
    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of indices (three per triangle).
    #[must_use]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Iterate triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

/// Rejected mesh parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshError {
    /// A UV sphere needs at least 3 sectors and 2 stacks.
    InvalidTessellation {
        /// Requested longitude divisions.
        sector_count: u32,
        /// Requested latitude divisions.
        stack_count: u32,
    },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTessellation {
                sector_count,
                stack_count,
            } => write!(
                f,
                "invalid sphere tessellation {sector_count}x{stack_count} \
                 (need sectors >= {} and stacks >= {})",
                sphere::MIN_SECTORS,
                sphere::MIN_STACKS
            ),
        }
    }
}

impl std::error::Error for MeshError {}
