// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Elements geometry kernel
//!
//! Piecewise-linear curves with validated construction, per-vertex frames, planar
//! offsets and path reconstruction, plus boolean composition of solids and their
//! tessellation into triangle meshes.
//!
//! All operations are synchronous and free of I/O apart from configuration loading.
//! Values are owned by a single caller; mutating methods take `&mut self`.

pub mod config;
pub mod csg;
pub mod curve;
pub mod error;
pub mod geometry;
pub mod solid;
pub mod utils;

pub use config::KernelConfig;
pub use csg::{BooleanOp, Csg, CsgOperation};
pub use curve::{
    offset_path, reconstruct_paths, shared_segments, Curve, EndType, OffsetOptions, Polygon,
    Polyline, PolylineOptions, TracedPath,
};
pub use error::{ErrorKind, GeometryError, Result};
pub use geometry::{analyze, BBox3, GeometryStats, Line, Mesh, Plane, Transform, Triangle, Vertex};
pub use solid::{Extrude, Face, Solid, Sweep};

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_extrude_tessellate() {
        let solid = Extrude::new(Polygon::rectangle(10.0, 10.0).unwrap(), 10.0)
            .solid()
            .unwrap();
        let mut mesh = Mesh::new();
        Csg::new(solid).tessellate(&mut mesh);
        let stats = analyze(&mesh);
        assert!((stats.volume - 1000.0).abs() < 1e-6);
        assert!(stats.is_watertight);
        assert!(stats.bounds.contains(&Point3::new(0.0, 0.0, 5.0)));
    }
}
