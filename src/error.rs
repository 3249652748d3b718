//! Crate-level error types.

use std::fmt;

use crate::{
    gpu::render_context::RenderContextError, mesh::MeshError,
    renderer::RenderError,
};

/// Errors produced by the molsphere crate.
#[derive(Debug)]
pub enum MolsphereError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Sphere mesh generation rejected its parameters.
    Mesh(MeshError),
    /// Instanced renderer misuse or GPU buffer failure.
    Render(RenderError),
    /// Failed to load a molecular structure file.
    StructureLoad(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization or validation failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for MolsphereError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Mesh(e) => write!(f, "mesh error: {e}"),
            Self::Render(e) => write!(f, "render error: {e}"),
            Self::StructureLoad(msg) => {
                write!(f, "structure load error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for MolsphereError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Mesh(e) => Some(e),
            Self::Render(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for MolsphereError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<MeshError> for MolsphereError {
    fn from(e: MeshError) -> Self {
        Self::Mesh(e)
    }
}

impl From<RenderError> for MolsphereError {
    fn from(e: RenderError) -> Self {
        Self::Render(e)
    }
}

impl From<std::io::Error> for MolsphereError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
