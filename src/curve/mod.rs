// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Curves - the shared curve contract and its piecewise-linear realizations

pub mod frames;
mod offset;
mod polygon;
mod polyline;
pub mod segment_graph;
pub mod validation;

pub use offset::{offset_path, EndType, OffsetOptions};
pub use polygon::Polygon;
pub use polyline::{shared_segments, Polyline, PolylineOptions};
pub use segment_graph::{reconstruct_paths, SegmentGraph, TracedPath};

use crate::error::Result;
use crate::geometry::{BBox3, Line, Transform};
use nalgebra::Point3;

/// Operations every curve supports.
///
/// Parameters `u` are normalized arc-length positions in `[0, 1]`.
pub trait Curve {
    /// Total arc length
    fn length(&self) -> f64;

    fn start(&self) -> Point3<f64>;

    fn end(&self) -> Point3<f64>;

    /// Point at normalized arc length `u`
    fn point_at(&self, u: f64) -> Result<Point3<f64>>;

    /// Local frame at normalized arc length `u`, Z axis tangent to the curve
    fn transform_at(&self, u: f64) -> Result<Transform>;

    /// One frame per vertex, with the end frames moved inward by the setbacks
    fn frames(&self, start_setback: f64, end_setback: f64) -> Result<Vec<Transform>>;

    fn bounds(&self) -> BBox3;

    /// A copy of this curve with `transform` applied to every vertex
    fn transformed(&self, transform: &Transform) -> Self
    where
        Self: Sized;
}

/// Segments of a vertex sequence, including the closing edge when `closed`
pub(crate) fn segments_of(vertices: &[Point3<f64>], closed: bool) -> Vec<Line> {
    let n = vertices.len();
    if n < 2 {
        return Vec::new();
    }
    let count = if closed { n } else { n - 1 };
    (0..count)
        .map(|i| Line::new(vertices[i], vertices[(i + 1) % n]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_of() {
        let vertices = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        assert_eq!(segments_of(&vertices, false).len(), 2);
        let closed = segments_of(&vertices, true);
        assert_eq!(closed.len(), 3);
        assert_eq!(closed[2].end, vertices[0]);
        assert!(segments_of(&vertices[..1], true).is_empty());
    }
}
