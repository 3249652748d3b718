//! Atom records and their conversion into sphere instances.

use glam::Vec3;

use super::element_table::ElementTable;

/// One atom as read from a structure file.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Normalized element symbol (e.g. `"C"`, `"NA"`).
    pub element: String,
    /// Position in model space.
    pub position: Vec3,
}

impl Atom {
    /// Atom with the given symbol and position.
    pub fn new(element: impl Into<String>, position: Vec3) -> Self {
        Self {
            element: element.into(),
            position,
        }
    }
}

/// Renderable description of one sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceDescriptor {
    /// Sphere center.
    pub position: Vec3,
    /// Sphere radius in scene units.
    pub radius: f32,
    /// RGB color.
    pub color: Vec3,
}

impl InstanceDescriptor {
    /// Instance from its three attributes.
    #[must_use]
    pub const fn new(position: Vec3, radius: f32, color: Vec3) -> Self {
        Self {
            position,
            radius,
            color,
        }
    }
}

/// Maps atoms to [`InstanceDescriptor`]s through an injected [`ElementTable`].
#[derive(Debug, Clone, Default)]
pub struct InstanceBuilder {
    table: ElementTable,
}

impl InstanceBuilder {
    /// Builder backed by `table`.
    #[must_use]
    pub fn new(table: ElementTable) -> Self {
        Self { table }
    }

    /// Instance for a single atom. Position passes through untouched.
    #[must_use]
    pub fn build(&self, atom: &Atom) -> InstanceDescriptor {
        let style = self.table.style_of(&atom.element);
        InstanceDescriptor {
            position: atom.position,
            radius: style.radius,
            color: style.color,
        }
    }

    /// Instances for every atom, in input order.
    #[must_use]
    pub fn build_all(&self, atoms: &[Atom]) -> Vec<InstanceDescriptor> {
        atoms.iter().map(|atom| self.build(atom)).collect()
    }
}
