// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Straight line segments

use super::{BBox3, Transform};
use crate::curve::{Curve, Polyline};
use crate::error::{GeometryError, Result};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Orientation values smaller than this are treated as collinear
const ORIENTATION_EPSILON: f64 = 1e-12;

/// A segment between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl Line {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Unit vector from start to end
    pub fn direction(&self) -> Vector3<f64> {
        (self.end - self.start).normalize()
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    pub fn transformed(&self, transform: &Transform) -> Self {
        Self::new(transform.of_point(&self.start), transform.of_point(&self.end))
    }

    /// Point at a normalized parameter without range checking
    pub(crate) fn lerp(&self, t: f64) -> Point3<f64> {
        self.start + (self.end - self.start) * t
    }

    /// Check whether the XY projections of two segments properly cross.
    ///
    /// Segments that only touch at an endpoint, or that are collinear, do not count.
    pub fn intersects_2d(&self, other: &Line) -> bool {
        let a = orientation(&self.start, &self.end, &other.start)
            * orientation(&self.start, &self.end, &other.end);
        let b = orientation(&other.start, &other.end, &self.start)
            * orientation(&other.start, &other.end, &self.end);
        a < 0.0 && b < 0.0
    }

    /// Check whether the XY projections of two collinear segments share more than
    /// an endpoint.
    pub fn overlaps_2d(&self, other: &Line) -> bool {
        if orientation(&self.start, &self.end, &other.start) != 0.0
            || orientation(&self.start, &self.end, &other.end) != 0.0
        {
            return false;
        }
        let (dx, dy) = (self.end.x - self.start.x, self.end.y - self.start.y);
        let length_squared = dx * dx + dy * dy;
        if length_squared < ORIENTATION_EPSILON {
            return false;
        }
        let along = |p: &Point3<f64>| ((p.x - self.start.x) * dx + (p.y - self.start.y) * dy) / length_squared;
        let (t0, t1) = (along(&other.start), along(&other.end));
        let shared = t0.max(t1).min(1.0) - t0.min(t1).max(0.0);
        shared * length_squared.sqrt() > ORIENTATION_EPSILON.sqrt()
    }

    pub fn to_polyline(&self) -> Result<Polyline> {
        Polyline::new(vec![self.start, self.end])
    }
}

/// Sign of the XY turn a → b → c: 1 for counter-clockwise, -1 for clockwise, 0 for collinear
fn orientation(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    if cross.abs() < ORIENTATION_EPSILON {
        0.0
    } else {
        cross.signum()
    }
}

impl Curve for Line {
    fn length(&self) -> f64 {
        Line::length(self)
    }

    fn start(&self) -> Point3<f64> {
        self.start
    }

    fn end(&self) -> Point3<f64> {
        self.end
    }

    fn point_at(&self, u: f64) -> Result<Point3<f64>> {
        if !(0.0..=1.0).contains(&u) {
            return Err(GeometryError::ParameterOutOfRange { u });
        }
        Ok(self.lerp(u))
    }

    fn transform_at(&self, u: f64) -> Result<Transform> {
        self.to_polyline()?.transform_at(u)
    }

    fn frames(&self, start_setback: f64, end_setback: f64) -> Result<Vec<Transform>> {
        self.to_polyline()?.frames(start_setback, end_setback)
    }

    fn bounds(&self) -> BBox3 {
        BBox3::from_points([&self.start, &self.end])
    }

    fn transformed(&self, transform: &Transform) -> Self {
        Line::transformed(self, transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(ax: f64, ay: f64, bx: f64, by: f64) -> Line {
        Line::new(Point3::new(ax, ay, 0.0), Point3::new(bx, by, 0.0))
    }

    #[test]
    fn test_crossing_segments_intersect() {
        assert!(line(0.0, 0.0, 2.0, 2.0).intersects_2d(&line(0.0, 2.0, 2.0, 0.0)));
    }

    #[test]
    fn test_touching_segments_do_not_intersect() {
        assert!(!line(0.0, 0.0, 1.0, 0.0).intersects_2d(&line(1.0, 0.0, 1.0, 1.0)));
        assert!(!line(0.0, 0.0, 1.0, 0.0).intersects_2d(&line(2.0, 0.0, 3.0, 0.0)));
    }

    #[test]
    fn test_point_at_range() {
        let l = line(0.0, 0.0, 4.0, 0.0);
        assert_eq!(l.point_at(0.25).unwrap(), Point3::new(1.0, 0.0, 0.0));
        assert!(matches!(
            l.point_at(1.5),
            Err(GeometryError::ParameterOutOfRange { .. })
        ));
    }

    #[test]
    fn test_line_frames_follow_polyline_convention() {
        let l = Line::new(Point3::origin(), Point3::new(0.0, 0.0, 3.0));
        let frames = Curve::frames(&l, 0.0, 0.0).unwrap();
        assert_eq!(frames.len(), 2);
        assert!((frames[0].z_axis - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-9);
    }
}
