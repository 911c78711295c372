// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - frames, primitives and mesh representation

mod analytics;
mod bbox;
mod line;
mod mesh;
mod plane;
mod transform;
mod triangulate;

pub use analytics::{analyze, GeometryStats};
pub use bbox::BBox3;
pub use line::Line;
pub use mesh::{Mesh, Triangle, Vertex};
pub use plane::Plane;
pub use transform::Transform;
pub use triangulate::triangulate;
