//! Instanced sphere rendering.
//!
//! [`instanced::InstancedSphereRenderer`] holds the lifecycle and buffer
//! policy and is written against [`backend::RenderBackend`];
//! [`wgpu_backend::WgpuBackend`] is the implementation used by the viewer.

/// Buffer roles, attribute layouts, and the backend trait.
pub mod backend;
/// The instanced sphere renderer and its instance serialization.
pub mod instanced;
/// wgpu implementation of the backend trait.
pub mod wgpu_backend;

use std::fmt;

pub use backend::{BufferRole, RenderBackend};
pub use instanced::{InstanceRaw, InstancedSphereRenderer, RendererPhase};
pub use wgpu_backend::WgpuBackend;

/// Errors raised by the instanced renderer and its backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// `draw_instances` before `initialize`.
    NotInitialized,
    /// `initialize` while buffers are already live.
    AlreadyInitialized,
    /// Use after `shutdown`.
    Released,
    /// The backend could not allocate or grow a buffer.
    BufferAllocation {
        /// Which buffer failed.
        role: BufferRole,
        /// Backend-provided detail.
        reason: String,
    },
    /// A draw was issued outside `begin_frame`/`end_frame`.
    NoActiveFrame,
    /// Instance count does not fit the draw call's `u32`.
    TooManyInstances(usize),
    /// Index count does not fit the draw call's `u32`.
    TooManyIndices(usize),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => {
                write!(f, "renderer used before initialize")
            }
            Self::AlreadyInitialized => {
                write!(f, "renderer is already initialized")
            }
            Self::Released => write!(f, "renderer used after shutdown"),
            Self::BufferAllocation { role, reason } => {
                write!(f, "failed to allocate {}: {reason}", role.label())
            }
            Self::NoActiveFrame => write!(f, "draw issued outside a frame"),
            Self::TooManyInstances(n) => {
                write!(f, "{n} instances exceed the per-draw limit")
            }
            Self::TooManyIndices(n) => {
                write!(f, "{n} indices exceed the per-draw limit")
            }
        }
    }
}

impl std::error::Error for RenderError {}
