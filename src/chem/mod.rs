//! Chemistry-side data: element styles, atoms, and structure-file input.
//!
//! Everything here is CPU-only and independent of the GPU backend.

/// Atom records and the atom → sphere instance builder.
pub mod atom;
/// Element symbol → radius/color lookup with fallbacks.
pub mod element_table;
/// PDB `ATOM`/`HETATM` column parser.
pub mod pdb;

pub use atom::{Atom, InstanceBuilder, InstanceDescriptor};
pub use element_table::{normalize_symbol, ElementStyle, ElementTable};
