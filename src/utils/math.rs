// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Math utilities

use nalgebra::{Point3, Vector3};

/// Default tolerance for "almost equal" comparisons of lengths and coordinates
pub const EPSILON: f64 = 1e-5;

/// Check if two floats are approximately equal
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Tolerance-based equality for points and vectors.
///
/// Two values are almost equal when every component differs by less than the tolerance.
pub trait AlmostEqual {
    fn almost_eq_within(&self, other: &Self, tolerance: f64) -> bool;

    fn almost_eq(&self, other: &Self) -> bool {
        self.almost_eq_within(other, EPSILON)
    }
}

impl AlmostEqual for Point3<f64> {
    fn almost_eq_within(&self, other: &Self, tolerance: f64) -> bool {
        approx_eq(self.x, other.x, tolerance)
            && approx_eq(self.y, other.y, tolerance)
            && approx_eq(self.z, other.z, tolerance)
    }
}

impl AlmostEqual for Vector3<f64> {
    fn almost_eq_within(&self, other: &Self, tolerance: f64) -> bool {
        approx_eq(self.x, other.x, tolerance)
            && approx_eq(self.y, other.y, tolerance)
            && approx_eq(self.z, other.z, tolerance)
    }
}

/// Average of two vectors
pub fn average(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    (a + b) * 0.5
}

/// Area-weighted normal of a closed loop of points (Newell's method).
///
/// The result is not unitized; a zero vector means the loop encloses no area.
pub fn newell_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let mut normal = Vector3::zeros();
    for (i, current) in points.iter().enumerate() {
        let next = &points[(i + 1) % points.len()];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal
}

/// Check whether every point lies on the line through the first two distinct points
pub fn are_collinear(points: &[Point3<f64>]) -> bool {
    if points.len() < 3 {
        return true;
    }

    let origin = points[0];
    let direction = match points
        .iter()
        .map(|p| p - origin)
        .find(|d| d.norm() > EPSILON)
    {
        Some(d) => d.normalize(),
        None => return true,
    };

    points.iter().all(|p| {
        let offset = p - origin;
        (offset - direction * offset.dot(&direction)).norm() < EPSILON
    })
}

/// Check whether every point lies in one plane
pub fn are_coplanar(points: &[Point3<f64>]) -> bool {
    if points.len() < 4 || are_collinear(points) {
        return true;
    }

    let normal = newell_normal(points);
    let length = normal.norm();
    if length < EPSILON * EPSILON {
        // Self-cancelling loops (e.g. a bow tie) have no Newell area; fall back to the
        // first non-degenerate corner.
        return match corner_normal(points) {
            Some(n) => points.iter().all(|p| (p - points[0]).dot(&n).abs() < EPSILON),
            None => true,
        };
    }

    let unit = normal / length;
    let centroid = centroid(points);
    points
        .iter()
        .all(|p| (p - centroid).dot(&unit).abs() < EPSILON)
}

/// Arithmetic mean of a set of points
pub fn centroid(points: &[Point3<f64>]) -> Point3<f64> {
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum / points.len().max(1) as f64)
}

/// Unit normal of the first non-degenerate triangle fanned from the first point
pub fn corner_normal(points: &[Point3<f64>]) -> Option<Vector3<f64>> {
    let a = *points.first()?;
    for i in 1..points.len() {
        for j in (i + 1)..points.len() {
            let n = (points[i] - a).cross(&(points[j] - a));
            if n.norm() > EPSILON {
                return Some(n.normalize());
            }
        }
    }
    None
}
