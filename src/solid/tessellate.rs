// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Flattening solids into triangle meshes

use super::Solid;
use crate::geometry::{Mesh, Triangle, Vertex};
use tracing::debug;

/// Append a triangulation of `solid` to `mesh`.
///
/// Each face gets its own vertices carrying the face normal, so sharp edges stay
/// sharp. Existing mesh content is left untouched; use [`Mesh::weld_vertices`] to
/// share coincident vertices afterwards.
pub fn tessellate(solid: &Solid, mesh: &mut Mesh) {
    let vertices_before = mesh.vertex_count();
    let triangles_before = mesh.triangle_count();

    for face in solid.faces() {
        let normal = face.normal();
        let base = mesh.vertex_count();
        for position in face.vertices() {
            mesh.add_vertex(Vertex::new(*position, normal));
        }
        // Faces are convex, so a fan from the first corner covers them.
        for i in 1..face.vertices().len() - 1 {
            mesh.add_triangle(Triangle::new([base, base + i, base + i + 1]));
        }
    }

    debug!(
        faces = solid.faces().len(),
        vertices = mesh.vertex_count() - vertices_before,
        triangles = mesh.triangle_count() - triangles_before,
        "tessellated solid"
    );
}
