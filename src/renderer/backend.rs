//! The seam between the instanced renderer and a graphics API.
//!
//! The renderer decides *what* lives in which buffer and when it is drawn;
//! a [`RenderBackend`] only allocates, overwrites, draws and frees. Buffer
//! layouts are described by the attribute tables below so every backend
//! (and the shader) agrees on the same slots and offsets.

use std::mem::{offset_of, size_of};

use super::{instanced::InstanceRaw, RenderError};
use crate::mesh::Vertex;

/// What a buffer holds, which also fixes its update policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferRole {
    /// Mesh vertices; written once.
    Vertex,
    /// Mesh triangle indices (`u32`); written once.
    Index,
    /// Per-instance attributes; fully rewritten every frame.
    Instance,
}

impl BufferRole {
    /// Whether the contents are replaced after creation.
    #[must_use]
    pub const fn is_dynamic(self) -> bool {
        matches!(self, Self::Instance)
    }

    /// Debug label for GPU tooling.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vertex => "Sphere Vertex Buffer",
            Self::Index => "Sphere Index Buffer",
            Self::Instance => "Sphere Instance Buffer",
        }
    }
}

/// One float attribute inside an interleaved buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSlot {
    /// Shader input location.
    pub location: u32,
    /// Number of `f32` components (1–4).
    pub components: u32,
    /// Byte offset inside one element.
    pub offset: u64,
}

/// Byte stride of one [`Vertex`].
pub const VERTEX_STRIDE: u64 = size_of::<Vertex>() as u64;

/// Per-vertex inputs: position, normal, texture coordinate.
pub const VERTEX_ATTRIBUTES: [AttributeSlot; 3] = [
    AttributeSlot {
        location: 0,
        components: 3,
        offset: offset_of!(Vertex, position) as u64,
    },
    AttributeSlot {
        location: 1,
        components: 3,
        offset: offset_of!(Vertex, normal) as u64,
    },
    AttributeSlot {
        location: 2,
        components: 2,
        offset: offset_of!(Vertex, tex_coord) as u64,
    },
];

/// Byte stride of one [`InstanceRaw`] (7 floats).
pub const INSTANCE_STRIDE: u64 = size_of::<InstanceRaw>() as u64;

/// Per-instance inputs: center, radius, color. Advance once per instance.
pub const INSTANCE_ATTRIBUTES: [AttributeSlot; 3] = [
    AttributeSlot {
        location: 3,
        components: 3,
        offset: offset_of!(InstanceRaw, position) as u64,
    },
    AttributeSlot {
        location: 4,
        components: 1,
        offset: offset_of!(InstanceRaw, radius) as u64,
    },
    AttributeSlot {
        location: 5,
        components: 3,
        offset: offset_of!(InstanceRaw, color) as u64,
    },
];

/// Everything one indexed, instanced draw needs.
pub struct DrawCall<'a, B> {
    /// Buffer bound with [`VERTEX_ATTRIBUTES`].
    pub vertices: &'a B,
    /// `u32` triangle indices.
    pub indices: &'a B,
    /// Buffer bound with [`INSTANCE_ATTRIBUTES`].
    pub instances: &'a B,
    /// Indices drawn per instance.
    pub index_count: u32,
    /// Number of instances; never zero.
    pub instance_count: u32,
}

/// Minimal buffer and draw API the instanced renderer is written against.
pub trait RenderBackend {
    /// Backend-owned buffer handle.
    type Buffer;

    /// Allocate a buffer for `role` holding `contents`.
    ///
    /// # Errors
    ///
    /// [`RenderError::BufferAllocation`] when the backend cannot provide
    /// the buffer.
    fn create_buffer(
        &mut self,
        role: BufferRole,
        contents: &[u8],
    ) -> Result<Self::Buffer, RenderError>;

    /// Overwrite the whole contents of `buffer`; nothing of the previous
    /// contents survives. May reallocate.
    ///
    /// # Errors
    ///
    /// [`RenderError::BufferAllocation`] when growing the buffer fails.
    fn replace_buffer(
        &mut self,
        buffer: &mut Self::Buffer,
        contents: &[u8],
    ) -> Result<(), RenderError>;

    /// Submit one indexed, instanced draw.
    ///
    /// # Errors
    ///
    /// Backend-specific, e.g. [`RenderError::NoActiveFrame`].
    fn draw_indexed_instanced(
        &mut self,
        call: &DrawCall<'_, Self::Buffer>,
    ) -> Result<(), RenderError>;

    /// Free a buffer.
    fn release_buffer(&mut self, buffer: Self::Buffer);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(VERTEX_STRIDE, 32);
        let offsets: Vec<u64> =
            VERTEX_ATTRIBUTES.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
        let locations: Vec<u32> =
            VERTEX_ATTRIBUTES.iter().map(|a| a.location).collect();
        assert_eq!(locations, vec![0, 1, 2]);
    }

    #[test]
    fn instance_layout_is_seven_floats() {
        assert_eq!(INSTANCE_STRIDE, 7 * 4);
        assert_eq!(
            INSTANCE_ATTRIBUTES,
            [
                AttributeSlot {
                    location: 3,
                    components: 3,
                    offset: 0
                },
                AttributeSlot {
                    location: 4,
                    components: 1,
                    offset: 12
                },
                AttributeSlot {
                    location: 5,
                    components: 3,
                    offset: 16
                },
            ]
        );
        let floats: u32 =
            INSTANCE_ATTRIBUTES.iter().map(|a| a.components).sum();
        assert_eq!(u64::from(floats) * 4, INSTANCE_STRIDE);
    }

    #[test]
    fn only_instances_are_dynamic() {
        assert!(!BufferRole::Vertex.is_dynamic());
        assert!(!BufferRole::Index.is_dynamic());
        assert!(BufferRole::Instance.is_dynamic());
    }
}
