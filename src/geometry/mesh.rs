// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Indexed triangle meshes

use super::{BBox3, Transform};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3<f64>,
    pub normal: Vector3<f64>,
}

impl Vertex {
    pub fn new(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { position, normal }
    }

    pub fn transform(&mut self, transform: &Transform) {
        self.position = transform.of_point(&self.position);
        // Frames are orthonormal, so normals rotate like any other vector.
        self.normal = transform.of_vector(&self.normal);
    }
}

/// Triangle defined by three vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(indices: [usize; 3]) -> Self {
        Self { indices }
    }
}

/// Append-only buffer of vertices and triangles.
///
/// Several solids can be tessellated into the same mesh; each call adds its own
/// vertices and never touches what is already there.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, vertex: Vertex) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn transform(&mut self, transform: &Transform) {
        for vertex in &mut self.vertices {
            vertex.transform(transform);
        }
    }

    pub fn bounding_box(&self) -> BBox3 {
        BBox3::from_points(self.vertices.iter().map(|v| &v.position))
    }

    /// Positions of the three corners of a triangle
    pub fn corners(&self, triangle: &Triangle) -> [Point3<f64>; 3] {
        triangle.indices.map(|i| self.vertices[i].position)
    }

    /// Append another mesh, offsetting its indices
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);
        self.triangles.extend(
            other
                .triangles
                .iter()
                .map(|t| Triangle::new(t.indices.map(|i| i + offset))),
        );
    }

    /// Enclosed volume by the divergence theorem; positive for outward-facing triangles
    pub fn volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|t| {
                let [a, b, c] = self.corners(t);
                a.coords.dot(&b.coords.cross(&c.coords)) / 6.0
            })
            .sum()
    }

    pub fn surface_area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|t| {
                let [a, b, c] = self.corners(t);
                (b - a).cross(&(c - a)).norm() / 2.0
            })
            .sum()
    }

    /// Weld vertices that are within epsilon distance of each other.
    /// Returns the number of vertices removed.
    pub fn weld_vertices(&mut self, epsilon: f64) -> usize {
        let original_count = self.vertices.len();
        let mut welded: Vec<Vertex> = Vec::new();
        let mut remap = vec![0; original_count];

        for (i, vertex) in self.vertices.iter().enumerate() {
            match welded
                .iter()
                .position(|w| (w.position - vertex.position).norm() < epsilon)
            {
                Some(j) => remap[i] = j,
                None => {
                    remap[i] = welded.len();
                    welded.push(*vertex);
                }
            }
        }

        for triangle in &mut self.triangles {
            triangle.indices = triangle.indices.map(|i| remap[i]);
        }
        // Triangles that collapsed onto an edge or a point carry no area.
        self.triangles.retain(|t| {
            let [a, b, c] = t.indices;
            a != b && b != c && a != c
        });

        self.vertices = welded;
        original_count - self.vertices.len()
    }

    /// Remove vertices not referenced by any triangle.
    /// Returns the number of vertices removed.
    pub fn remove_orphaned_vertices(&mut self) -> usize {
        let mut used = vec![false; self.vertices.len()];
        for triangle in &self.triangles {
            for &i in &triangle.indices {
                used[i] = true;
            }
        }

        let mut remap = vec![0; self.vertices.len()];
        let mut kept = Vec::new();
        for (i, vertex) in self.vertices.iter().enumerate() {
            if used[i] {
                remap[i] = kept.len();
                kept.push(*vertex);
            }
        }

        for triangle in &mut self.triangles {
            triangle.indices = triangle.indices.map(|i| remap[i]);
        }

        let removed = self.vertices.len() - kept.len();
        self.vertices = kept;
        removed
    }

    /// Recompute vertex normals as area-weighted averages of the adjacent face normals
    pub fn recompute_normals(&mut self) {
        let mut sums = vec![Vector3::zeros(); self.vertices.len()];
        for triangle in &self.triangles {
            let [a, b, c] = self.corners(triangle);
            let weighted = (b - a).cross(&(c - a));
            if weighted.norm() > 1e-10 {
                for &i in &triangle.indices {
                    sums[i] += weighted;
                }
            }
        }

        for (vertex, sum) in self.vertices.iter_mut().zip(sums) {
            vertex.normal = if sum.norm() > 1e-10 {
                sum.normalize()
            } else {
                Vector3::z()
            };
        }
    }
}
