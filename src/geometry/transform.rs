// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Rigid local coordinate frames

use super::Plane;
use crate::utils::{centroid, corner_normal, newell_normal, EPSILON};
use nalgebra::{Matrix4, Point3, Rotation3, Unit, Vector3};
use serde::{Deserialize, Serialize};

/// An origin plus an orthonormal, right-handed basis.
///
/// Points are mapped from local to world coordinates with [`Transform::of_point`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub origin: Point3<f64>,
    pub x_axis: Vector3<f64>,
    pub y_axis: Vector3<f64>,
    pub z_axis: Vector3<f64>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            origin: Point3::origin(),
            x_axis: Vector3::x(),
            y_axis: Vector3::y(),
            z_axis: Vector3::z(),
        }
    }

    /// Build a frame from an X direction and a Z direction.
    ///
    /// Z is kept as given (unitized); X is made perpendicular to it and Y = Z × X.
    pub fn new(origin: Point3<f64>, x_axis: Vector3<f64>, z_axis: Vector3<f64>) -> Self {
        let z = z_axis.normalize();
        let x = (x_axis - z * x_axis.dot(&z)).normalize();
        let y = z.cross(&x);
        Self {
            origin,
            x_axis: x,
            y_axis: y,
            z_axis: z,
        }
    }

    /// Build a frame from three explicit axes, unitizing each
    pub fn from_axes(
        origin: Point3<f64>,
        x_axis: Vector3<f64>,
        y_axis: Vector3<f64>,
        z_axis: Vector3<f64>,
    ) -> Self {
        Self {
            origin,
            x_axis: x_axis.normalize(),
            y_axis: y_axis.normalize(),
            z_axis: z_axis.normalize(),
        }
    }

    /// Build a frame whose Z axis is `normal`, choosing X from the world axes
    pub fn from_normal(origin: Point3<f64>, normal: Vector3<f64>) -> Self {
        let z = normal.normalize();
        let x = if z.dot(&Vector3::z()).abs() > 1.0 - EPSILON {
            Vector3::x()
        } else {
            Vector3::z().cross(&z)
        };
        Self::new(origin, x, z)
    }

    pub fn translation(offset: Vector3<f64>) -> Self {
        Self {
            origin: Point3::from(offset),
            ..Self::identity()
        }
    }

    /// Rotation about an axis through the world origin
    pub fn rotation(axis: Vector3<f64>, degrees: f64) -> Self {
        let rotation = Rotation3::from_axis_angle(&Unit::new_normalize(axis), degrees.to_radians());
        Self {
            origin: Point3::origin(),
            x_axis: rotation * Vector3::x(),
            y_axis: rotation * Vector3::y(),
            z_axis: rotation * Vector3::z(),
        }
    }

    /// Frame lying in the best-fit plane of a vertex set, with Z along the plane normal
    pub fn from_points_plane(points: &[Point3<f64>]) -> Self {
        let origin = centroid(points);
        let normal = newell_normal(points);
        if normal.norm() > EPSILON * EPSILON {
            return Self::from_normal(origin, normal);
        }
        // Self-cancelling loops such as a bow tie have no Newell area.
        if let Some(normal) = corner_normal(points) {
            return Self::from_normal(origin, normal);
        }

        // Collinear input: any plane containing the line will do.
        let direction = points
            .iter()
            .map(|p| p - points[0])
            .find(|d| d.norm() > EPSILON)
            .map(|d| d.normalize())
            .unwrap_or_else(Vector3::x);
        let seed = if direction.dot(&Vector3::z()).abs() < 1.0 - EPSILON {
            Vector3::z()
        } else {
            Vector3::y()
        };
        let normal = direction.cross(&seed).cross(&direction);
        Self::new(origin, direction, normal)
    }

    /// Map a local point into world coordinates
    pub fn of_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.origin + self.of_vector(&point.coords)
    }

    /// Rotate a local vector into world coordinates
    pub fn of_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.x_axis * vector.x + self.y_axis * vector.y + self.z_axis * vector.z
    }

    /// Express a world point in this frame's coordinates
    pub fn to_local(&self, point: &Point3<f64>) -> Point3<f64> {
        let d = point - self.origin;
        Point3::new(d.dot(&self.x_axis), d.dot(&self.y_axis), d.dot(&self.z_axis))
    }

    pub fn inverted(&self) -> Self {
        let x_axis = Vector3::new(self.x_axis.x, self.y_axis.x, self.z_axis.x);
        let y_axis = Vector3::new(self.x_axis.y, self.y_axis.y, self.z_axis.y);
        let z_axis = Vector3::new(self.x_axis.z, self.y_axis.z, self.z_axis.z);
        let o = -self.origin.coords;
        Self {
            origin: Point3::from(x_axis * o.x + y_axis * o.y + z_axis * o.z),
            x_axis,
            y_axis,
            z_axis,
        }
    }

    /// Transform that applies `self` first and then `other`
    pub fn concatenated(&self, other: &Transform) -> Self {
        Self {
            origin: other.of_point(&self.origin),
            x_axis: other.of_vector(&self.x_axis),
            y_axis: other.of_vector(&self.y_axis),
            z_axis: other.of_vector(&self.z_axis),
        }
    }

    /// The XY plane of this frame
    pub fn xy_plane(&self) -> Plane {
        Plane::new(self.origin, self.z_axis)
    }

    pub fn to_matrix(&self) -> Matrix4<f64> {
        Matrix4::new(
            self.x_axis.x, self.y_axis.x, self.z_axis.x, self.origin.x,
            self.x_axis.y, self.y_axis.y, self.z_axis.y, self.origin.y,
            self.x_axis.z, self.y_axis.z, self.z_axis.z, self.origin.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_is_orthonormal() {
        let t = Transform::new(
            Point3::new(1.0, 2.0, 3.0),
            Vector3::new(1.0, 0.3, 0.0),
            Vector3::new(0.0, 0.0, 2.0),
        );
        assert_relative_eq!(t.x_axis.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(t.x_axis.dot(&t.z_axis), 0.0, epsilon = 1e-12);
        assert_relative_eq!(t.y_axis, t.z_axis.cross(&t.x_axis), epsilon = 1e-12);
    }

    #[test]
    fn test_inverse_round_trip() {
        let t = Transform::rotation(Vector3::new(1.0, 1.0, 0.0), 37.0)
            .concatenated(&Transform::translation(Vector3::new(4.0, -2.0, 1.0)));
        let p = Point3::new(0.5, 7.0, -3.0);
        let back = t.inverted().of_point(&t.of_point(&p));
        assert_relative_eq!(back, p, epsilon = 1e-9);
        assert_relative_eq!(t.to_local(&t.of_point(&p)), p, epsilon = 1e-9);
    }

    #[test]
    fn test_rotation_about_z() {
        let t = Transform::rotation(Vector3::z(), 90.0);
        assert_relative_eq!(
            t.of_point(&Point3::new(1.0, 0.0, 0.0)),
            Point3::new(0.0, 1.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_matrix_matches_of_point() {
        let t = Transform::new(
            Point3::new(1.0, 0.0, 2.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
        );
        let p = Point3::new(0.25, -1.0, 3.0);
        assert_relative_eq!(t.to_matrix().transform_point(&p), t.of_point(&p), epsilon = 1e-12);
    }

    #[test]
    fn test_plane_frame_of_collinear_points() {
        let points = [Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 5.0)];
        let t = Transform::from_points_plane(&points);
        assert_relative_eq!(t.z_axis.dot(&Vector3::z()), 0.0, epsilon = 1e-12);
        assert_relative_eq!(t.to_local(&points[1]).z, 0.0, epsilon = 1e-12);
    }
}
