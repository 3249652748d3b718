//! Latitude/longitude (UV) sphere of unit radius centred at the origin.
//!
//! Rings run from the north pole (+Z) to the south pole; each ring repeats
//! its first column at the end so texture coordinates can wrap. Pole rings
//! collapse to a point, so only one triangle per column is emitted next to
//! each pole.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec3;

use super::{MeshError, MeshGeometry, Vertex};

/// Fewest longitude divisions that still enclose a volume.
pub const MIN_SECTORS: u32 = 3;
/// Fewest latitude divisions that still enclose a volume.
pub const MIN_STACKS: u32 = 2;

/// Default tessellation used by the viewer.
pub const DEFAULT_SECTORS: u32 = 36;
/// Default tessellation used by the viewer.
pub const DEFAULT_STACKS: u32 = 18;

/// Number of vertices produced by [`generate`].
#[must_use]
pub const fn vertex_count(sector_count: u32, stack_count: u32) -> usize {
    (stack_count as usize + 1) * (sector_count as usize + 1)
}

/// Number of indices produced by [`generate`].
#[must_use]
pub const fn index_count(sector_count: u32, stack_count: u32) -> usize {
    6 * sector_count as usize * (stack_count as usize).saturating_sub(1)
}

/// Tessellate a unit sphere.
///
/// Vertex `(i, j)` (ring `i`, column `j`) lives at index
/// `i * (sector_count + 1) + j`. Triangles wind counter-clockwise when seen
/// from outside.
///
/// # Errors
///
/// Returns [`MeshError::InvalidTessellation`] when
/// `sector_count < MIN_SECTORS` or `stack_count < MIN_STACKS`.
pub fn generate(
    sector_count: u32,
    stack_count: u32,
) -> Result<MeshGeometry, MeshError> {
    if sector_count < MIN_SECTORS || stack_count < MIN_STACKS {
        return Err(MeshError::InvalidTessellation {
            sector_count,
            stack_count,
        });
    }

    let mesh = MeshGeometry {
        vertices: vertices(sector_count, stack_count),
        indices: indices(sector_count, stack_count),
    };
    log::debug!(
        "sphere mesh {sector_count}x{stack_count}: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.index_count() / 3
    );
    Ok(mesh)
}

fn vertices(sector_count: u32, stack_count: u32) -> Vec<Vertex> {
    let sector_step = TAU / sector_count as f32;
    let stack_step = PI / stack_count as f32;
    let mut vertices =
        Vec::with_capacity(vertex_count(sector_count, stack_count));

    for i in 0..=stack_count {
        let stack_angle = FRAC_PI_2 - i as f32 * stack_step;
        let (z, xy) = stack_angle.sin_cos();

        for j in 0..=sector_count {
            let (sin_sector, cos_sector) = (j as f32 * sector_step).sin_cos();
            let position = Vec3::new(xy * cos_sector, xy * sin_sector, z);
            vertices.push(Vertex {
                position: position.to_array(),
                normal: position.normalize().to_array(),
                tex_coord: [
                    j as f32 / sector_count as f32,
                    i as f32 / stack_count as f32,
                ],
            });
        }
    }
    vertices
}

fn indices(sector_count: u32, stack_count: u32) -> Vec<u32> {
    let mut indices =
        Vec::with_capacity(index_count(sector_count, stack_count));

    for i in 0..stack_count {
        for j in 0..sector_count {
            let k1 = i * (sector_count + 1) + j;
            let k2 = k1 + sector_count + 1;

            // The north pole ring is a single point.
            if i != 0 {
                indices.extend_from_slice(&[k1, k2, k1 + 1]);
            }
            // Likewise the south pole ring.
            if i != stack_count - 1 {
                indices.extend_from_slice(&[k1 + 1, k2, k2 + 1]);
            }
        }
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-5;

    #[test]
    fn counts_match_formula() {
        for (sectors, stacks) in [(3, 2), (4, 2), (8, 5), (36, 18), (64, 3)] {
            let mesh = generate(sectors, stacks).unwrap();
            assert_eq!(
                mesh.vertex_count(),
                ((stacks + 1) * (sectors + 1)) as usize
            );
            assert_eq!(
                mesh.index_count(),
                (6 * sectors * (stacks - 1)) as usize
            );
            assert_eq!(mesh.vertex_count(), vertex_count(sectors, stacks));
            assert_eq!(mesh.index_count(), index_count(sectors, stacks));
        }
    }

    #[test]
    fn four_by_two_sphere() {
        let mesh = generate(4, 2).unwrap();
        assert_eq!(mesh.vertex_count(), 15);
        assert_eq!(mesh.index_count(), 24);
    }

    #[test]
    fn normals_equal_unit_positions() {
        let mesh = generate(36, 18).unwrap();
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            let n = Vec3::from_array(v.normal);
            assert!((p.length() - 1.0).abs() < TOLERANCE);
            assert!((p - n).length() < TOLERANCE, "{p} vs {n}");
        }
    }

    #[test]
    fn indices_in_range() {
        let mesh = generate(17, 9).unwrap();
        let count = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
        assert_eq!(mesh.index_count() % 3, 0);
    }

    #[test]
    fn ring_major_layout_and_tex_coords() {
        let (sectors, stacks) = (6, 4);
        let mesh = generate(sectors, stacks).unwrap();
        let north = Vec3::from_array(mesh.vertices[0].position);
        assert!((north - Vec3::Z).length() < TOLERANCE);
        let south = Vec3::from_array(mesh.vertices.last().unwrap().position);
        assert!((south + Vec3::Z).length() < TOLERANCE);

        let row = (sectors + 1) as usize;
        // Seam column duplicates the first column of each ring.
        for ring in mesh.vertices.chunks_exact(row) {
            let first = Vec3::from_array(ring[0].position);
            let last = Vec3::from_array(ring[row - 1].position);
            assert!((first - last).length() < TOLERANCE);
            assert_eq!(ring[0].tex_coord[0], 0.0);
            assert_eq!(ring[row - 1].tex_coord[0], 1.0);
        }
        assert_eq!(mesh.vertices[row].tex_coord, [0.0, 0.25]);
    }

    #[test]
    fn triangles_face_outward() {
        let mesh = generate(12, 7).unwrap();
        for [a, b, c] in mesh.triangles() {
            let pa = Vec3::from_array(mesh.vertices[a as usize].position);
            let pb = Vec3::from_array(mesh.vertices[b as usize].position);
            let pc = Vec3::from_array(mesh.vertices[c as usize].position);
            let normal = (pb - pa).cross(pc - pa);
            assert!(normal.length() > 1e-6, "degenerate triangle {a} {b} {c}");
            let centroid = (pa + pb + pc) / 3.0;
            assert!(normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn pole_rows_emit_one_triangle_per_sector() {
        let (sectors, stacks) = (5, 4);
        let mesh = generate(sectors, stacks).unwrap();
        let triangles: Vec<[u32; 3]> = mesh.triangles().collect();
        let row = sectors + 1;
        let touching_north =
            triangles.iter().filter(|t| t.iter().any(|&i| i < row)).count();
        let last_ring_start = stacks * row;
        let touching_south = triangles
            .iter()
            .filter(|t| t.iter().any(|&i| i >= last_ring_start))
            .count();
        assert_eq!(touching_north, sectors as usize);
        assert_eq!(touching_south, sectors as usize);
    }

    #[test]
    fn rejects_degenerate_parameters() {
        for (sectors, stacks) in [(2, 18), (36, 1), (0, 0)] {
            assert_eq!(
                generate(sectors, stacks),
                Err(MeshError::InvalidTessellation {
                    sector_count: sectors,
                    stack_count: stacks,
                })
            );
        }
    }

    #[test]
    fn index_count_is_zero_without_interior_rings() {
        assert_eq!(index_count(3, 0), 0);
        assert_eq!(index_count(3, 1), 0);
        assert_eq!(index_count(0, 0), 0);
    }
}
