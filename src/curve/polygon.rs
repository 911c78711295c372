// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Closed piecewise-linear curves

use super::frames;
use super::offset::{offset_path, EndType, OffsetOptions};
use super::polyline::{moved_segment, validate_vertices};
use super::{segments_of, Curve, Polyline, PolylineOptions};
use crate::error::{GeometryError, Result};
use crate::geometry::{BBox3, Line, Plane, Transform};
use crate::utils::{corner_normal, newell_normal, AlmostEqual, EPSILON};
use nalgebra::{Point3, Vector3};
use std::f64::consts::TAU;
use std::fmt;

/// A closed loop of vertices with an implicit edge from the last vertex back to the first
#[derive(Debug, Clone)]
pub struct Polygon {
    vertices: Vec<Point3<f64>>,
    options: PolylineOptions,
}

impl Polygon {
    /// Create a polygon. Unlike polylines, crossing edges are rejected by default.
    pub fn new(vertices: Vec<Point3<f64>>) -> Result<Self> {
        Self::with_options(
            vertices,
            PolylineOptions {
                check_self_intersection: true,
                ..PolylineOptions::default()
            },
        )
    }

    pub fn with_options(vertices: Vec<Point3<f64>>, options: PolylineOptions) -> Result<Self> {
        validate_vertices(&vertices, &options, true)?;
        Ok(Self { vertices, options })
    }

    /// Wrap loops produced by the clipping engine, which are simple by construction
    pub(crate) fn from_trusted(vertices: Vec<Point3<f64>>, options: PolylineOptions) -> Self {
        Self { vertices, options }
    }

    /// Axis-aligned rectangle centered on the origin
    pub fn rectangle(width: f64, height: f64) -> Result<Self> {
        let (hw, hh) = (width / 2.0, height / 2.0);
        Self::new(vec![
            Point3::new(-hw, -hh, 0.0),
            Point3::new(hw, -hh, 0.0),
            Point3::new(hw, hh, 0.0),
            Point3::new(-hw, hh, 0.0),
        ])
    }

    /// Axis-aligned rectangle spanning two corners in the XY plane of `min`
    pub fn rectangle_from_corners(min: Point3<f64>, max: Point3<f64>) -> Result<Self> {
        Self::new(vec![
            min,
            Point3::new(max.x, min.y, min.z),
            Point3::new(max.x, max.y, min.z),
            Point3::new(min.x, max.y, min.z),
        ])
    }

    /// L-shaped profile with its corner at the origin
    pub fn l_shape(width: f64, length: f64, thickness: f64) -> Result<Self> {
        if thickness >= width || thickness >= length {
            return Err(GeometryError::DegenerateProfile {
                reason: format!(
                    "an L of thickness {} does not fit in {} x {}",
                    thickness, width, length
                ),
            });
        }
        Self::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(width, 0.0, 0.0),
            Point3::new(width, thickness, 0.0),
            Point3::new(thickness, thickness, 0.0),
            Point3::new(thickness, length, 0.0),
            Point3::new(0.0, length, 0.0),
        ])
    }

    /// Regular polygon inscribed in a circle of `radius` about the origin
    pub fn ngon(radius: f64, sides: usize) -> Result<Self> {
        let vertices = (0..sides)
            .map(|i| {
                let angle = TAU * i as f64 / sides as f64;
                Point3::new(radius * angle.cos(), radius * angle.sin(), 0.0)
            })
            .collect();
        Self::new(vertices)
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn options(&self) -> &PolylineOptions {
        &self.options
    }

    /// Replace the whole vertex sequence, keeping the current one on failure
    pub fn set_vertices(&mut self, vertices: Vec<Point3<f64>>) -> Result<()> {
        validate_vertices(&vertices, &self.options, true)?;
        self.vertices = vertices;
        Ok(())
    }

    /// Transform edge `index` in place; the closing edge has index `len - 1`
    pub fn transform_segment(&mut self, transform: &Transform, index: usize, is_planar: bool) -> Result<()> {
        if let Some(candidate) = moved_segment(&self.vertices, transform, index, true, is_planar)? {
            self.set_vertices(candidate)?;
        }
        Ok(())
    }

    /// Edges including the closing edge
    pub fn segments(&self) -> Vec<Line> {
        segments_of(&self.vertices, true)
    }

    /// Unit normal by the right-hand rule over the vertex order
    pub fn normal(&self) -> Vector3<f64> {
        let n = newell_normal(&self.vertices);
        if n.norm() > EPSILON * EPSILON {
            n.normalize()
        } else {
            corner_normal(&self.vertices).unwrap_or_else(Vector3::z)
        }
    }

    pub fn plane(&self) -> Plane {
        Plane::new(self.vertices[0], self.normal())
    }

    /// Enclosed area
    pub fn area(&self) -> f64 {
        newell_normal(&self.vertices).norm() / 2.0
    }

    /// The same loop traversed in the opposite direction
    pub fn reversed(&self) -> Self {
        let mut vertices = self.vertices.clone();
        vertices.reverse();
        Self {
            vertices,
            options: self.options,
        }
    }

    /// Open polyline through the same vertices, without the closing edge
    pub fn to_polyline(&self) -> Result<Polyline> {
        Polyline::with_options(self.vertices.clone(), self.options)
    }

    /// Offset loops at `distance`; positive distances grow the loop.
    ///
    /// The loop is projected onto the XY plane and the results lie at z = 0, so a
    /// polygon in a vertical plane yields no loops.
    pub fn offset(&self, distance: f64, tolerance: f64) -> Result<Vec<Polygon>> {
        let options = OffsetOptions {
            tolerance,
            ..OffsetOptions::default()
        };
        offset_path(&self.vertices, distance, EndType::ClosedPolygon, &options)
    }

    pub fn offset_with(&self, distance: f64, options: &OffsetOptions) -> Result<Vec<Polygon>> {
        offset_path(&self.vertices, distance, EndType::ClosedPolygon, options)
    }

    /// One copy of the plane normal per vertex
    fn normals(&self) -> Vec<Vector3<f64>> {
        vec![self.normal(); self.vertices.len()]
    }
}

impl Curve for Polygon {
    fn length(&self) -> f64 {
        self.segments().iter().map(|s| s.length()).sum()
    }

    fn start(&self) -> Point3<f64> {
        self.vertices[0]
    }

    /// A polygon ends where it starts
    fn end(&self) -> Point3<f64> {
        self.vertices[0]
    }

    fn point_at(&self, u: f64) -> Result<Point3<f64>> {
        Ok(frames::locate(&self.vertices, true, u)?.point)
    }

    fn transform_at(&self, u: f64) -> Result<Transform> {
        frames::frame_at(&self.vertices, &self.normals(), true, u, self.options.tolerance)
    }

    /// Mitered frames at every vertex. Setbacks are range-checked but not applied,
    /// since a loop has no free ends to set back.
    fn frames(&self, start_setback: f64, end_setback: f64) -> Result<Vec<Transform>> {
        let length = self.length();
        if start_setback < 0.0 || end_setback < 0.0 || (start_setback + end_setback > 0.0 && start_setback + end_setback >= length) {
            return Err(GeometryError::SetbackOutOfRange {
                start: start_setback,
                end: end_setback,
                length,
            });
        }
        Ok(frames::vertex_frames(&self.vertices, &self.normals(), true))
    }

    fn bounds(&self) -> BBox3 {
        BBox3::from_points(&self.vertices)
    }

    fn transformed(&self, transform: &Transform) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| transform.of_point(v)).collect(),
            options: self.options,
        }
    }
}

impl PartialEq for Polygon {
    fn eq(&self, other: &Self) -> bool {
        self.vertices.len() == other.vertices.len()
            && self
                .vertices
                .iter()
                .zip(&other.vertices)
                .all(|(a, b)| a.almost_eq_within(b, self.options.tolerance))
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.vertices.iter().map(|v| v.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Polygon {
        Polygon::rectangle_from_corners(Point3::origin(), Point3::new(1.0, 1.0, 0.0)).unwrap()
    }

    #[test]
    fn test_closing_edge_counts() {
        let square = unit_square();
        assert_eq!(square.segments().len(), 4);
        assert_relative_eq!(square.length(), 4.0);
        assert_relative_eq!(square.point_at(0.875).unwrap(), Point3::new(0.0, 0.5, 0.0), epsilon = 1e-12);
        assert_relative_eq!(square.point_at(1.0).unwrap(), Point3::origin(), epsilon = 1e-12);
    }

    #[test]
    fn test_bow_tie_rejected() {
        let result = Polygon::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ]);
        assert!(matches!(result, Err(GeometryError::SelfIntersection { .. })));
    }

    #[test]
    fn test_two_vertices_rejected() {
        let result = Polygon::new(vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)]);
        assert_eq!(
            result.unwrap_err(),
            GeometryError::TooFewVertices { required: 3, found: 2 }
        );
    }

    #[test]
    fn test_normal_and_area() {
        let square = unit_square();
        assert_relative_eq!(square.normal(), Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(square.reversed().normal(), -Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(square.area(), 1.0, epsilon = 1e-12);

        let l = Polygon::l_shape(4.0, 3.0, 1.0).unwrap();
        assert_relative_eq!(l.area(), 4.0 + 2.0, epsilon = 1e-12);
        assert!(Polygon::l_shape(1.0, 3.0, 1.0).is_err());
    }

    #[test]
    fn test_ngon() {
        let hexagon = Polygon::ngon(1.0, 6).unwrap();
        assert_eq!(hexagon.vertices().len(), 6);
        assert_relative_eq!(hexagon.length(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_every_frame_is_mitered() {
        let square = unit_square();
        let frames = square.frames(0.0, 0.0).unwrap();
        assert_eq!(frames.len(), 4);
        for (frame, vertex) in frames.iter().zip(square.vertices()) {
            assert_relative_eq!(frame.origin, *vertex);
            assert_relative_eq!(frame.y_axis, Vector3::z(), epsilon = 1e-12);
            // The corner bisector points away from the center.
            let outward = vertex - Point3::new(0.5, 0.5, 0.0);
            assert!(frame.x_axis.dot(&outward) > 0.0);
        }
        assert!(square.frames(-1.0, 0.0).is_err());
    }

    #[test]
    fn test_transform_closing_segment() {
        let mut square = unit_square();
        let shift = Transform::translation(Vector3::new(-0.5, 0.0, 0.0));
        square.transform_segment(&shift, 3, true).unwrap();
        assert_relative_eq!(square.vertices()[3], Point3::new(-0.5, 1.0, 0.0));
        assert_relative_eq!(square.vertices()[0], Point3::new(-0.5, 0.0, 0.0));
        assert_relative_eq!(square.area(), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_transform_at_vertex_uses_vertex_frame() {
        let square = unit_square();
        let at_corner = square.transform_at(0.25).unwrap();
        let frames = square.frames(0.0, 0.0).unwrap();
        assert_relative_eq!(at_corner.x_axis, frames[1].x_axis, epsilon = 1e-12);
    }
}
