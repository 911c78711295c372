// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh statistics

use super::{BBox3, Mesh};
use crate::utils::EPSILON;
use ahash::AHashMap;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary measurements of a tessellated solid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryStats {
    /// Enclosed volume in cubic units
    pub volume: f64,
    /// Total surface area in square units
    pub surface_area: f64,
    pub bounds: BBox3,
    /// Area-weighted center of the surface
    pub centroid: Point3<f64>,
    pub vertex_count: usize,
    pub triangle_count: usize,
    /// Every edge is shared by exactly two triangles once coincident vertices are welded
    pub is_watertight: bool,
}

impl GeometryStats {
    pub fn empty() -> Self {
        Self {
            volume: 0.0,
            surface_area: 0.0,
            bounds: BBox3::empty(),
            centroid: Point3::origin(),
            vertex_count: 0,
            triangle_count: 0,
            is_watertight: false,
        }
    }
}

impl fmt::Display for GeometryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Volume:       {:>12.4}", self.volume)?;
        writeln!(f, "Surface area: {:>12.4}", self.surface_area)?;
        writeln!(
            f,
            "Centroid:     ({:.3}, {:.3}, {:.3})",
            self.centroid.x, self.centroid.y, self.centroid.z
        )?;
        let size = self.bounds.size();
        writeln!(f, "Size:         {:.3} x {:.3} x {:.3}", size.x, size.y, size.z)?;
        writeln!(f, "Vertices:     {:>12}", self.vertex_count)?;
        writeln!(f, "Triangles:    {:>12}", self.triangle_count)?;
        write!(f, "Watertight:   {:>12}", if self.is_watertight { "yes" } else { "no" })
    }
}

/// Analyze mesh geometry and compute statistics
pub fn analyze(mesh: &Mesh) -> GeometryStats {
    if mesh.vertices.is_empty() || mesh.triangles.is_empty() {
        return GeometryStats::empty();
    }

    GeometryStats {
        volume: mesh.volume(),
        surface_area: mesh.surface_area(),
        bounds: mesh.bounding_box(),
        centroid: surface_centroid(mesh),
        vertex_count: mesh.vertex_count(),
        triangle_count: mesh.triangle_count(),
        is_watertight: is_watertight(mesh),
    }
}

fn surface_centroid(mesh: &Mesh) -> Point3<f64> {
    let mut weighted = Vector3::zeros();
    let mut total = 0.0;
    for triangle in &mesh.triangles {
        let [a, b, c] = mesh.corners(triangle);
        let area = (b - a).cross(&(c - a)).norm() / 2.0;
        weighted += (a.coords + b.coords + c.coords) / 3.0 * area;
        total += area;
    }
    if total > 0.0 {
        Point3::from(weighted / total)
    } else {
        Point3::origin()
    }
}

/// Check that every edge is shared by exactly two triangles.
///
/// Tessellation emits one vertex per face corner, so a welded copy is inspected.
fn is_watertight(mesh: &Mesh) -> bool {
    let mut welded = mesh.clone();
    welded.weld_vertices(EPSILON);

    let mut edge_count: AHashMap<(usize, usize), usize> = AHashMap::new();
    for triangle in &welded.triangles {
        let indices = &triangle.indices;
        for i in 0..3 {
            let (a, b) = (indices[i], indices[(i + 1) % 3]);
            let edge = if a < b { (a, b) } else { (b, a) };
            *edge_count.entry(edge).or_insert(0) += 1;
        }
    }

    !edge_count.is_empty() && edge_count.values().all(|&count| count == 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Triangle, Vertex};
    use approx::assert_relative_eq;

    /// Axis-aligned cube from the origin to (size, size, size), one vertex per corner use
    fn cube_soup(size: f64) -> Mesh {
        let p = |x: f64, y: f64, z: f64| Point3::new(x * size, y * size, z * size);
        let quads = [
            [p(0., 0., 0.), p(0., 1., 0.), p(1., 1., 0.), p(1., 0., 0.)],
            [p(0., 0., 1.), p(1., 0., 1.), p(1., 1., 1.), p(0., 1., 1.)],
            [p(0., 0., 0.), p(1., 0., 0.), p(1., 0., 1.), p(0., 0., 1.)],
            [p(0., 1., 0.), p(0., 1., 1.), p(1., 1., 1.), p(1., 1., 0.)],
            [p(0., 0., 0.), p(0., 0., 1.), p(0., 1., 1.), p(0., 1., 0.)],
            [p(1., 0., 0.), p(1., 1., 0.), p(1., 1., 1.), p(1., 0., 1.)],
        ];
        let mut mesh = Mesh::new();
        for quad in quads {
            let base = mesh.vertex_count();
            for corner in quad {
                mesh.add_vertex(Vertex::new(corner, Vector3::zeros()));
            }
            mesh.add_triangle(Triangle::new([base, base + 1, base + 2]));
            mesh.add_triangle(Triangle::new([base, base + 2, base + 3]));
        }
        mesh
    }

    #[test]
    fn test_analyze_cube() {
        let stats = analyze(&cube_soup(10.0));
        assert_relative_eq!(stats.volume, 1000.0, epsilon = 1e-9);
        assert_relative_eq!(stats.surface_area, 600.0, epsilon = 1e-9);
        assert_relative_eq!(stats.centroid, Point3::new(5.0, 5.0, 5.0), epsilon = 1e-9);
        assert_eq!(stats.vertex_count, 24);
        assert_eq!(stats.triangle_count, 12);
        assert!(stats.is_watertight);
    }

    #[test]
    fn test_open_box_is_not_watertight() {
        let mut mesh = cube_soup(1.0);
        mesh.triangles.truncate(10);
        assert!(!analyze(&mesh).is_watertight);
    }

    #[test]
    fn test_empty_mesh() {
        let stats = analyze(&Mesh::new());
        assert_eq!(stats.triangle_count, 0);
        assert!(!stats.is_watertight);
        assert!(stats.to_string().contains("Watertight"));
    }
}
