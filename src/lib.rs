// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Instanced sphere rendering of molecular structures on wgpu.
//!
//! Every atom is drawn as a copy of one shared UV-sphere mesh, translated
//! to the atom position, scaled by its element radius and tinted by its
//! element color, all in a single indexed instanced draw call per frame.
//!
//! # Key entry points
//!
//! - [`chem::ElementTable`] - element symbol → radius and color
//! - [`chem::InstanceBuilder`] - atoms → per-instance draw descriptors
//! - [`mesh::sphere::generate`] - the shared unit sphere
//! - [`renderer::InstancedSphereRenderer`] - buffer lifecycle and drawing,
//!   written against the [`renderer::RenderBackend`] trait
//! - [`options::Options`] - TOML configuration
//!
//! # Data flow
//!
//! A PDB file is parsed into [`chem::Atom`]s, the instance builder turns
//! them into [`chem::InstanceDescriptor`]s using the element table, and the
//! renderer uploads those into the instance buffer and issues one draw each
//! frame. The sphere mesh is generated once and uploaded at
//! initialization.

pub mod camera;
pub mod chem;
pub mod error;
pub mod gpu;
pub mod input;
pub mod mesh;
pub mod options;
pub mod renderer;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use chem::{
    Atom, ElementStyle, ElementTable, InstanceBuilder, InstanceDescriptor,
};
pub use error::MolsphereError;
pub use mesh::{MeshError, MeshGeometry};
pub use renderer::{InstancedSphereRenderer, RenderBackend, RenderError};
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
