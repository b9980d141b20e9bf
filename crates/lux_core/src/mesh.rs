//! Triangle mesh geometry.
//!
//! Meshes are stored flat: every three consecutive vertices form one
//! triangle. Indexed formats (OBJ) are expanded on load, so the renderer
//! never chases indices.

use lux_math::{Mat4, Vec2, Vec3};
use rayon::prelude::*;

/// Twice the area below which a triangle counts as degenerate.
const DEGENERATE_AREA: f64 = 1e-12;

/// A mesh vertex: position plus texture coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub pos: Vec3,
    /// Texture coordinate. Carried through loading but not used for shading yet.
    pub tex: Vec2,
}

impl Vertex {
    pub fn new(pos: Vec3, tex: Vec2) -> Self {
        Self { pos, tex }
    }
}

impl From<Vec3> for Vertex {
    fn from(pos: Vec3) -> Self {
        Self {
            pos,
            tex: Vec2::ZERO,
        }
    }
}

/// A triangle soup in flat vertex-triple layout.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
}

impl Mesh {
    /// Create a mesh from a flat vertex list.
    ///
    /// The list is not validated here; [`Scene::add`](crate::Scene::add)
    /// rejects meshes whose length is not a multiple of three.
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    /// Create a mesh from bare positions (texture coordinates zeroed).
    pub fn from_positions(positions: &[Vec3]) -> Self {
        Self::new(positions.iter().copied().map(Vertex::from).collect())
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Iterate over the triangles, three vertices each.
    ///
    /// A trailing partial triangle is ignored.
    pub fn triangles(&self) -> impl Iterator<Item = &[Vertex]> + '_ {
        self.vertices.chunks_exact(3)
    }

    /// Apply a transform to every vertex position.
    pub fn transform(&mut self, matrix: &Mat4) {
        self.vertices
            .par_iter_mut()
            .for_each(|v| v.pos = matrix.transform_point3(v.pos));
    }

    /// Drop zero-area triangles, returning how many were removed.
    pub fn remove_degenerate(&mut self) -> usize {
        let before = self.triangle_count();
        let kept: Vec<Vertex> = self
            .triangles()
            .filter(|tri| !is_degenerate(tri[0].pos, tri[1].pos, tri[2].pos))
            .flatten()
            .copied()
            .collect();
        self.vertices = kept;
        before - self.triangle_count()
    }

    /// Total surface area.
    pub fn area(&self) -> f64 {
        self.triangles()
            .map(|tri| (tri[1].pos - tri[0].pos).cross(tri[2].pos - tri[0].pos).length() * 0.5)
            .sum()
    }
}

/// True if the triangle has (numerically) zero area.
pub fn is_degenerate(v0: Vec3, v1: Vec3, v2: Vec3) -> bool {
    let doubled_area = (v1 - v0).cross(v2 - v0).length();
    !doubled_area.is_finite() || doubled_area < DEGENERATE_AREA
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        Mesh::from_positions(&[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ])
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = quad();

        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.triangles().count(), 2);
        assert!((mesh.area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_triangles_ignore_partial() {
        let mut mesh = quad();
        mesh.vertices.push(Vertex::default());

        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.triangles().count(), 2);
    }

    #[test]
    fn test_transform() {
        let mut mesh = quad();
        mesh.transform(&Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)));

        assert!(mesh.vertices.iter().all(|v| v.pos.z == -5.0));
        assert_eq!(mesh.vertices[4].pos, Vec3::new(1.0, 1.0, -5.0));
    }

    #[test]
    fn test_remove_degenerate() {
        let mut mesh = quad();
        // Collinear triangle
        mesh.vertices.extend([
            Vertex::from(Vec3::ZERO),
            Vertex::from(Vec3::X),
            Vertex::from(Vec3::X * 2.0),
        ]);

        assert_eq!(mesh.remove_degenerate(), 1);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn test_is_degenerate() {
        assert!(is_degenerate(Vec3::ZERO, Vec3::ZERO, Vec3::X));
        assert!(!is_degenerate(Vec3::ZERO, Vec3::X, Vec3::Y));
        assert!(is_degenerate(Vec3::ZERO, Vec3::X, Vec3::splat(f64::NAN)));
    }
}
