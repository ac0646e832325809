//! Random-height terrain shared by the heightfield collider and the render mesh.
//!
//! Grid convention (same as the physics heightfield):
//! - `heights[(row, col)]`, rows run along +Z, columns along +X,
//! - the grid is centered on the body origin and spans `scale.x` by `scale.z`,
//! - a unit height of 1.0 is `scale.y` meters.

use nalgebra::{DMatrix, Vector3};

use crate::{error::SetupError, shapes::ColliderShapeDef};

/// CPU-side terrain mesh, ready to upload.
#[derive(Clone, Debug, Default)]
pub struct TerrainMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

#[derive(Clone, Debug)]
pub struct Terrain {
    nsubdivs: usize,
    scale: Vector3<f32>,
    heights: DMatrix<f32>,
}

impl Terrain {
    /// Square terrain with `nsubdivs` cells per side and heights in `[0, 1)`.
    ///
    /// Heights come from a seeded integer hash, so the same seed always yields the same
    /// terrain.
    pub fn generate(nsubdivs: usize, scale: Vector3<f32>, seed: u32) -> Result<Self, SetupError> {
        if nsubdivs == 0 {
            return Err(SetupError::InvalidTerrain(nsubdivs));
        }
        let side = nsubdivs + 1;
        let heights = DMatrix::from_fn(side, side, |row, col| hash01(row as i32, col as i32, seed));
        Ok(Self {
            nsubdivs,
            scale,
            heights,
        })
    }

    /// Unit heights, `(nsubdivs + 1)` square.
    pub fn heights(&self) -> &DMatrix<f32> {
        &self.heights
    }

    pub fn collider_shape(&self) -> ColliderShapeDef {
        ColliderShapeDef::Heightfield {
            heights: self.heights.clone(),
            scale: self.scale,
        }
    }

    /// Grid vertex in the terrain's local space.
    pub fn vertex(&self, row: usize, col: usize) -> Vector3<f32> {
        let n = self.nsubdivs as f32;
        Vector3::new(
            (-0.5 + col as f32 / n) * self.scale.x,
            self.heights[(row, col)] * self.scale.y,
            (-0.5 + row as f32 / n) * self.scale.z,
        )
    }

    /// Triangulated mesh matching the collider, wound counter-clockwise seen from +Y.
    ///
    /// `uv_repeat` tiles the texture coordinates across the whole terrain.
    pub fn mesh(&self, uv_repeat: f32) -> TerrainMesh {
        let side = self.nsubdivs + 1;
        let index = |row: usize, col: usize| (row * side + col) as u32;

        let mut mesh = TerrainMesh::default();
        let mut normals = vec![Vector3::<f32>::zeros(); side * side];

        for row in 0..side {
            for col in 0..side {
                mesh.positions.push(self.vertex(row, col).into());
                let n = self.nsubdivs as f32;
                mesh.uvs
                    .push([col as f32 / n * uv_repeat, row as f32 / n * uv_repeat]);
            }
        }

        for row in 0..self.nsubdivs {
            for col in 0..self.nsubdivs {
                let p00 = index(row, col);
                let p10 = index(row + 1, col);
                let p01 = index(row, col + 1);
                let p11 = index(row + 1, col + 1);

                for tri in [[p00, p10, p01], [p01, p10, p11]] {
                    let [a, b, c] = tri.map(|i| Vector3::from(mesh.positions[i as usize]));
                    let face = (b - a).cross(&(c - a));
                    for i in tri {
                        normals[i as usize] += face;
                    }
                    mesh.indices.extend_from_slice(&tri);
                }
            }
        }

        mesh.normals = normals
            .into_iter()
            .map(|n| n.try_normalize(1.0e-12).unwrap_or_else(Vector3::y).into())
            .collect();
        mesh
    }
}

/// 2D integer hash mapped to `[0, 1)`.
fn hash01(i: i32, j: i32, seed: u32) -> f32 {
    let mut x = (i as u64).wrapping_mul(0x27d4_eb2d);
    x ^= (j as u64).wrapping_mul(0x1656_6791_9E37_79F9);
    x ^= (seed as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^= x >> 31;
    // Top 24 bits keep the result strictly below 1.0 in f32.
    (x >> 40) as f32 / (1u64 << 24) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terrain(seed: u32) -> Terrain {
        Terrain::generate(4, Vector3::new(8.0, 2.0, 8.0), seed).expect("valid terrain")
    }

    #[test]
    fn zero_subdivisions_is_rejected() {
        let result = Terrain::generate(0, Vector3::new(1.0, 1.0, 1.0), 1);
        assert!(matches!(result, Err(SetupError::InvalidTerrain(0))));
    }

    #[test]
    fn heights_are_deterministic_and_in_unit_range() {
        let a = terrain(7);
        let b = terrain(7);
        assert_eq!(a.heights(), b.heights());
        assert!(a.heights().iter().all(|h| (0.0..1.0).contains(h)));
        assert_ne!(a.heights(), terrain(8).heights());
    }

    #[test]
    fn corner_vertices_span_the_scale() {
        let t = terrain(1);
        let first = t.vertex(0, 0);
        let last = t.vertex(4, 4);
        assert!((first.x + 4.0).abs() < 1.0e-6 && (first.z + 4.0).abs() < 1.0e-6);
        assert!((last.x - 4.0).abs() < 1.0e-6 && (last.z - 4.0).abs() < 1.0e-6);
        assert!((first.y - t.heights()[(0, 0)] * 2.0).abs() < 1.0e-6);
    }

    #[test]
    fn mesh_has_two_upward_triangles_per_cell() {
        let mesh = terrain(3).mesh(10.0);
        assert_eq!(mesh.positions.len(), 25);
        assert_eq!(mesh.indices.len(), 4 * 4 * 6);
        assert!(mesh.normals.iter().all(|n| n[1] > 0.0));
        assert_eq!(mesh.uvs[24], [10.0, 10.0]);
    }
}
