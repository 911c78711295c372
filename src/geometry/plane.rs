// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Infinite planes

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A plane through `origin` with unit `normal`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3<f64>,
    pub normal: Vector3<f64>,
}

impl Plane {
    pub fn new(origin: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            origin,
            normal: normal.normalize(),
        }
    }

    /// Signed distance of a point, positive on the side the normal points to
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        (point - self.origin).dot(&self.normal)
    }

    /// Closest point on the plane
    pub fn project(&self, point: &Point3<f64>) -> Point3<f64> {
        point - self.normal * self.signed_distance(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_distance_and_projection() {
        let plane = Plane::new(Point3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, 3.0));
        let p = Point3::new(2.0, 3.0, 4.0);
        assert_eq!(plane.signed_distance(&p), 3.0);
        assert_eq!(plane.project(&p), Point3::new(2.0, 3.0, 1.0));
    }
}
