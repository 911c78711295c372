// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Binary space partitioning of solid faces, used to evaluate booleans.
//!
//! A node splits space by the plane of its first face. Faces in front of the plane
//! go to the front subtree, faces behind it to the back subtree, and coplanar faces
//! stay at the node. Clipping a face set against a tree keeps only the parts outside
//! the solid the tree encloses.

use super::Face;
use nalgebra::{Point3, Vector3};

/// Distance within which a vertex counts as lying on a splitting plane
const PLANE_EPSILON: f64 = 1e-5;

const COPLANAR: u8 = 0;
const FRONT: u8 = 1;
const BACK: u8 = 2;
const SPANNING: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SplitPlane {
    pub normal: Vector3<f64>,
    pub w: f64,
}

/// Where a face ended up relative to a plane
enum Split {
    CoplanarFront(Face),
    CoplanarBack(Face),
    Front(Face),
    Back(Face),
    Spanning {
        front: Option<Face>,
        back: Option<Face>,
    },
}

impl SplitPlane {
    pub fn of(face: &Face) -> Self {
        Self {
            normal: face.normal(),
            w: face.plane_offset(),
        }
    }

    fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    fn classify(&self, point: &Point3<f64>) -> u8 {
        let distance = self.normal.dot(&point.coords) - self.w;
        if distance < -PLANE_EPSILON {
            BACK
        } else if distance > PLANE_EPSILON {
            FRONT
        } else {
            COPLANAR
        }
    }

    fn split(&self, face: Face) -> Split {
        let types: Vec<u8> = face.vertices().iter().map(|v| self.classify(v)).collect();
        let face_type = types.iter().fold(COPLANAR, |acc, t| acc | t);

        match face_type {
            COPLANAR => {
                if self.normal.dot(&face.normal()) > 0.0 {
                    Split::CoplanarFront(face)
                } else {
                    Split::CoplanarBack(face)
                }
            }
            FRONT => Split::Front(face),
            BACK => Split::Back(face),
            _ => {
                let vertices = face.vertices();
                let n = vertices.len();
                let mut front = Vec::with_capacity(n + 1);
                let mut back = Vec::with_capacity(n + 1);

                for i in 0..n {
                    let j = (i + 1) % n;
                    let (ti, tj) = (types[i], types[j]);
                    let (vi, vj) = (vertices[i], vertices[j]);
                    if ti != BACK {
                        front.push(vi);
                    }
                    if ti != FRONT {
                        back.push(vi);
                    }
                    if ti | tj == SPANNING {
                        let t = (self.w - self.normal.dot(&vi.coords))
                            / self.normal.dot(&(vj - vi));
                        let cut = vi + (vj - vi) * t;
                        front.push(cut);
                        back.push(cut);
                    }
                }

                Split::Spanning {
                    front: face.with_vertices(front),
                    back: face.with_vertices(back),
                }
            }
        }
    }
}

/// BSP tree node
#[derive(Debug, Clone, Default)]
pub(crate) struct BspNode {
    plane: Option<SplitPlane>,
    front: Option<Box<BspNode>>,
    back: Option<Box<BspNode>>,
    faces: Vec<Face>,
}

impl BspNode {
    pub fn new(faces: Vec<Face>) -> Self {
        let mut node = Self::default();
        node.build(faces);
        node
    }

    /// Insert faces, splitting them by the planes already in the tree
    pub fn build(&mut self, faces: Vec<Face>) {
        if faces.is_empty() {
            return;
        }
        let plane = *self.plane.get_or_insert_with(|| SplitPlane::of(&faces[0]));

        let mut front = Vec::new();
        let mut back = Vec::new();
        for face in faces {
            match plane.split(face) {
                Split::CoplanarFront(f) | Split::CoplanarBack(f) => self.faces.push(f),
                Split::Front(f) => front.push(f),
                Split::Back(f) => back.push(f),
                Split::Spanning { front: f, back: b } => {
                    front.extend(f);
                    back.extend(b);
                }
            }
        }

        if !front.is_empty() {
            self.front.get_or_insert_with(Default::default).build(front);
        }
        if !back.is_empty() {
            self.back.get_or_insert_with(Default::default).build(back);
        }
    }

    /// Swap inside and outside
    pub fn invert(&mut self) {
        for face in &mut self.faces {
            face.flip();
        }
        if let Some(plane) = &mut self.plane {
            plane.flip();
        }
        if let Some(front) = &mut self.front {
            front.invert();
        }
        if let Some(back) = &mut self.back {
            back.invert();
        }
        std::mem::swap(&mut self.front, &mut self.back);
    }

    /// Remove the parts of `faces` that lie inside the solid this tree encloses
    pub fn clip_faces(&self, faces: Vec<Face>) -> Vec<Face> {
        let plane = match self.plane {
            Some(plane) => plane,
            None => return faces,
        };

        let mut front = Vec::new();
        let mut back = Vec::new();
        for face in faces {
            match plane.split(face) {
                Split::CoplanarFront(f) | Split::Front(f) => front.push(f),
                Split::CoplanarBack(f) | Split::Back(f) => back.push(f),
                Split::Spanning { front: f, back: b } => {
                    front.extend(f);
                    back.extend(b);
                }
            }
        }

        let mut result = match &self.front {
            Some(node) => node.clip_faces(front),
            None => front,
        };
        if let Some(node) = &self.back {
            result.extend(node.clip_faces(back));
        }
        result
    }

    /// Remove the parts of this tree's faces that lie inside `other`
    pub fn clip_to(&mut self, other: &BspNode) {
        self.faces = other.clip_faces(std::mem::take(&mut self.faces));
        if let Some(front) = &mut self.front {
            front.clip_to(other);
        }
        if let Some(back) = &mut self.back {
            back.clip_to(other);
        }
    }

    pub fn all_faces(&self) -> Vec<Face> {
        let mut result = self.faces.clone();
        if let Some(front) = &self.front {
            result.extend(front.all_faces());
        }
        if let Some(back) = &self.back {
            result.extend(back.all_faces());
        }
        result
    }
}

/// Faces bounding the union of two closed face sets
pub(crate) fn union(a: Vec<Face>, b: Vec<Face>) -> Vec<Face> {
    let mut a = BspNode::new(a);
    let mut b = BspNode::new(b);
    a.clip_to(&b);
    b.clip_to(&a);
    b.invert();
    b.clip_to(&a);
    b.invert();
    a.build(b.all_faces());
    a.all_faces()
}

/// Faces bounding `a` with `b` removed
pub(crate) fn difference(a: Vec<Face>, b: Vec<Face>) -> Vec<Face> {
    let mut a = BspNode::new(a);
    let mut b = BspNode::new(b);
    a.invert();
    a.clip_to(&b);
    b.clip_to(&a);
    b.invert();
    b.clip_to(&a);
    b.invert();
    a.build(b.all_faces());
    a.invert();
    a.all_faces()
}
