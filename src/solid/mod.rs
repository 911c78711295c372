// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Solids bounded by planar convex faces, and boolean operations on them

mod bsp;
mod producers;
mod tessellate;

pub use producers::{Extrude, Sweep};
pub use tessellate::tessellate;

use crate::geometry::{triangulate, BBox3, Transform};
use crate::utils::{newell_normal, EPSILON};
use nalgebra::{Point3, Vector3};

/// A planar convex polygon, wound counter-clockwise about its outward normal
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    vertices: Vec<Point3<f64>>,
    normal: Vector3<f64>,
    /// Distance of the face plane from the origin along the normal
    w: f64,
}

impl Face {
    /// Create a face, or `None` if the loop encloses no area
    pub fn new(vertices: Vec<Point3<f64>>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let normal = newell_normal(&vertices);
        if normal.norm() < EPSILON * EPSILON {
            return None;
        }
        let normal = normal.normalize();
        let w = normal.dot(&vertices[0].coords);
        Some(Self {
            vertices,
            normal,
            w,
        })
    }

    /// Split a simple, possibly concave loop into convex faces.
    /// Convex loops come back as a single face.
    pub fn from_loop(vertices: &[Point3<f64>]) -> Vec<Face> {
        let normal = newell_normal(vertices);
        if vertices.len() < 3 || normal.norm() < EPSILON * EPSILON {
            return Vec::new();
        }
        if is_convex(vertices, &normal) {
            return Face::new(vertices.to_vec()).into_iter().collect();
        }
        triangulate(vertices, &normal)
            .into_iter()
            .filter_map(|[a, b, c]| Face::new(vec![vertices[a], vertices[b], vertices[c]]))
            .collect()
    }

    /// A piece of this face, sharing its plane
    pub(crate) fn with_vertices(&self, vertices: Vec<Point3<f64>>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        Some(Self {
            vertices,
            normal: self.normal,
            w: self.w,
        })
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    pub(crate) fn plane_offset(&self) -> f64 {
        self.w
    }

    pub fn area(&self) -> f64 {
        newell_normal(&self.vertices).norm() / 2.0
    }

    /// Reverse the winding so the face points the other way
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.normal = -self.normal;
        self.w = -self.w;
    }

    pub fn transformed(&self, transform: &Transform) -> Self {
        let vertices: Vec<Point3<f64>> =
            self.vertices.iter().map(|v| transform.of_point(v)).collect();
        let normal = transform.of_vector(&self.normal);
        let w = normal.dot(&vertices[0].coords);
        Self {
            vertices,
            normal,
            w,
        }
    }
}

fn is_convex(vertices: &[Point3<f64>], normal: &Vector3<f64>) -> bool {
    let n = vertices.len();
    (0..n).all(|i| {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let c = vertices[(i + 2) % n];
        (b - a).cross(&(c - b)).dot(normal) >= -EPSILON
    })
}

/// A closed solid described by its boundary faces.
///
/// Solids are values: booleans and transforms return new solids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solid {
    faces: Vec<Face>,
}

impl Solid {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_faces(faces: Vec<Face>) -> Self {
        Self { faces }
    }

    /// Build a solid from boundary loops, each wound counter-clockwise about its
    /// outward normal. Concave loops are split into triangles.
    pub fn from_loops<L: AsRef<[Point3<f64>]>>(loops: &[L]) -> Self {
        Self {
            faces: loops.iter().flat_map(|l| Face::from_loop(l.as_ref())).collect(),
        }
    }

    /// Axis-aligned box spanning two corners
    pub fn cuboid(min: Point3<f64>, max: Point3<f64>) -> Self {
        let p = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
        let (a, b) = (min, max);
        Self::from_loops(&[
            [p(a.x, a.y, a.z), p(a.x, b.y, a.z), p(b.x, b.y, a.z), p(b.x, a.y, a.z)],
            [p(a.x, a.y, b.z), p(b.x, a.y, b.z), p(b.x, b.y, b.z), p(a.x, b.y, b.z)],
            [p(a.x, a.y, a.z), p(b.x, a.y, a.z), p(b.x, a.y, b.z), p(a.x, a.y, b.z)],
            [p(a.x, b.y, a.z), p(a.x, b.y, b.z), p(b.x, b.y, b.z), p(b.x, b.y, a.z)],
            [p(a.x, a.y, a.z), p(a.x, a.y, b.z), p(a.x, b.y, b.z), p(a.x, b.y, a.z)],
            [p(b.x, a.y, a.z), p(b.x, b.y, a.z), p(b.x, b.y, b.z), p(b.x, a.y, b.z)],
        ])
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn transformed(&self, transform: &Transform) -> Self {
        Self {
            faces: self.faces.iter().map(|f| f.transformed(transform)).collect(),
        }
    }

    /// Inside out
    pub fn flipped(&self) -> Self {
        let mut faces = self.faces.clone();
        for face in &mut faces {
            face.flip();
        }
        Self { faces }
    }

    /// Enclosed volume; negative when the faces point inward
    pub fn signed_volume(&self) -> f64 {
        self.faces
            .iter()
            .map(|face| {
                let v = face.vertices();
                (1..v.len() - 1)
                    .map(|i| v[0].coords.dot(&v[i].coords.cross(&v[i + 1].coords)) / 6.0)
                    .sum::<f64>()
            })
            .sum()
    }

    pub fn bounds(&self) -> BBox3 {
        BBox3::from_points(self.faces.iter().flat_map(|f| f.vertices.iter()))
    }

    pub fn union(&self, other: &Solid) -> Solid {
        Self::from_faces(bsp::union(self.faces.clone(), other.faces.clone()))
    }

    /// This solid with `other` removed. Not commutative.
    pub fn difference(&self, other: &Solid) -> Solid {
        Self::from_faces(bsp::difference(self.faces.clone(), other.faces.clone()))
    }
}
