// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Open piecewise-linear curves

use super::frames;
use super::offset::{offset_path, EndType, OffsetOptions};
use super::validation::{
    check_coincidence, check_segment_lengths, check_self_intersection, check_vertex_count,
};
use super::{segments_of, Curve, Polygon};
use crate::config::KernelConfig;
use crate::error::{GeometryError, Result};
use crate::geometry::{BBox3, Line, Plane, Transform};
use crate::utils::{are_coplanar, AlmostEqual, EPSILON};
use nalgebra::Point3;
use std::fmt;
use tracing::warn;

/// Validation settings applied whenever a curve's vertices are set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolylineOptions {
    /// Distance below which two coordinates are considered equal
    pub tolerance: f64,
    /// Reject vertex sequences whose segments cross in the best-fit plane
    pub check_self_intersection: bool,
}

impl PolylineOptions {
    pub fn from_config(config: &KernelConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            check_self_intersection: config.check_self_intersection,
        }
    }
}

impl Default for PolylineOptions {
    fn default() -> Self {
        Self {
            tolerance: EPSILON,
            check_self_intersection: false,
        }
    }
}

/// Run every guard a vertex sequence must pass before a curve accepts it
pub(crate) fn validate_vertices(
    vertices: &[Point3<f64>],
    options: &PolylineOptions,
    closed: bool,
) -> Result<()> {
    check_vertex_count(vertices, if closed { 3 } else { 2 })?;
    check_coincidence(vertices, options.tolerance)?;
    let segments = segments_of(vertices, closed);
    check_segment_lengths(&segments, options.tolerance)?;
    if options.check_self_intersection {
        check_self_intersection(&Transform::from_points_plane(vertices), &segments)?;
    }
    Ok(())
}

/// Transformed copy of the vertices with segment `index` moved, or `None` when no
/// such segment exists
pub(crate) fn moved_segment(
    vertices: &[Point3<f64>],
    transform: &Transform,
    index: usize,
    closed: bool,
    planar: bool,
) -> Result<Option<Vec<Point3<f64>>>> {
    let n = vertices.len();
    let segment_count = if closed { n } else { n - 1 };
    if index >= segment_count {
        warn!(segment = index, segment_count, "segment transform ignored, no such segment");
        return Ok(None);
    }

    let mut candidate = vertices.to_vec();
    let end = (index + 1) % n;
    candidate[index] = transform.of_point(&vertices[index]);
    candidate[end] = transform.of_point(&vertices[end]);

    // Any motion of a triangle's vertices stays planar.
    if planar && n != 3 && !are_coplanar(&candidate) {
        return Err(GeometryError::NonPlanarSegmentTransform { segment: index });
    }
    Ok(Some(candidate))
}

/// A continuous, open set of line segments
#[derive(Debug, Clone)]
pub struct Polyline {
    vertices: Vec<Point3<f64>>,
    options: PolylineOptions,
}

impl Polyline {
    /// Create a polyline, rejecting coincident vertices and zero-length segments
    pub fn new(vertices: Vec<Point3<f64>>) -> Result<Self> {
        Self::with_options(vertices, PolylineOptions::default())
    }

    pub fn with_options(vertices: Vec<Point3<f64>>, options: PolylineOptions) -> Result<Self> {
        validate_vertices(&vertices, &options, false)?;
        Ok(Self { vertices, options })
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn options(&self) -> &PolylineOptions {
        &self.options
    }

    /// Replace the whole vertex sequence. The current vertices are kept if the
    /// new ones fail validation.
    pub fn set_vertices(&mut self, vertices: Vec<Point3<f64>>) -> Result<()> {
        validate_vertices(&vertices, &self.options, false)?;
        self.vertices = vertices;
        Ok(())
    }

    /// Transform segment `index` in place.
    ///
    /// With `is_closed` the segment from the last vertex back to the first is a valid
    /// target. With `is_planar` the move is rejected if the result is no longer planar.
    /// An index with no matching segment leaves the polyline untouched.
    pub fn transform_segment(
        &mut self,
        transform: &Transform,
        index: usize,
        is_closed: bool,
        is_planar: bool,
    ) -> Result<()> {
        if let Some(candidate) =
            moved_segment(&self.vertices, transform, index, is_closed, is_planar)?
        {
            self.set_vertices(candidate)?;
        }
        Ok(())
    }

    pub fn segments(&self) -> Vec<Line> {
        segments_of(&self.vertices, false)
    }

    /// The same vertices in opposite order
    pub fn reversed(&self) -> Self {
        let mut vertices = self.vertices.clone();
        vertices.reverse();
        Self {
            vertices,
            options: self.options,
        }
    }

    /// Plane through the vertices' centroid, normal from their best fit
    pub fn plane(&self) -> Plane {
        Transform::from_points_plane(&self.vertices).xy_plane()
    }

    /// Close into a polygon, dropping a final vertex that repeats the first
    pub fn closed(&self) -> Result<Polygon> {
        let mut vertices = self.vertices.clone();
        let first = vertices[0];
        if vertices.len() > 1 && vertices[vertices.len() - 1].almost_eq_within(&first, self.options.tolerance) {
            vertices.pop();
        }
        Polygon::with_options(vertices, self.options)
    }

    /// Segments shared with another polyline; see [`shared_segments`]
    pub fn shared_segments(a: &Polyline, b: &Polyline, is_closed: bool) -> Vec<(usize, usize)> {
        shared_segments(&a.vertices, &b.vertices, is_closed, a.options.tolerance)
    }

    /// Offset curves at `distance`, computed by the polygon-clipping engine.
    ///
    /// The offset is taken in the XY plane; see [`offset_path`].
    pub fn offset(&self, distance: f64, end_type: EndType, tolerance: f64) -> Result<Vec<Polygon>> {
        let options = OffsetOptions {
            tolerance,
            ..OffsetOptions::default()
        };
        offset_path(&self.vertices, distance, end_type, &options)
    }

    pub fn offset_with(
        &self,
        distance: f64,
        end_type: EndType,
        options: &OffsetOptions,
    ) -> Result<Vec<Polygon>> {
        offset_path(&self.vertices, distance, end_type, options)
    }

    fn normals(&self) -> Vec<nalgebra::Vector3<f64>> {
        frames::normals_at_vertices(&self.vertices)
    }
}

/// Index pairs of edges that coincide between two vertex sequences.
///
/// Edges match in the same or in opposite direction. With `is_closed` each sequence
/// also contributes its closing edge from the last vertex to the first.
pub fn shared_segments(
    a: &[Point3<f64>],
    b: &[Point3<f64>],
    is_closed: bool,
    tolerance: f64,
) -> Vec<(usize, usize)> {
    let mut result = Vec::new();
    if a.len() < 2 || b.len() < 2 {
        return result;
    }

    let a_edges = if is_closed { a.len() } else { a.len() - 1 };
    let b_edges = if is_closed { b.len() } else { b.len() - 1 };

    for i in 0..a_edges {
        let ia = a[i];
        let ib = a[(i + 1) % a.len()];

        for (j, jb) in b.iter().enumerate() {
            if !ia.almost_eq_within(jb, tolerance) {
                continue;
            }

            // Same direction: edge j runs from b[j] to b[j + 1].
            if j < b_edges && ib.almost_eq_within(&b[(j + 1) % b.len()], tolerance) {
                result.push((i, j));
            }

            // Opposite direction: edge j - 1 runs from b[j - 1] to b[j].
            let previous = match j {
                0 if is_closed => Some(b.len() - 1),
                0 => None,
                _ => Some(j - 1),
            };
            if let Some(p) = previous {
                if ib.almost_eq_within(&b[p], tolerance) {
                    result.push((i, p));
                }
            }
        }
    }

    result
}

impl Curve for Polyline {
    fn length(&self) -> f64 {
        self.segments().iter().map(|s| s.length()).sum()
    }

    fn start(&self) -> Point3<f64> {
        self.vertices[0]
    }

    fn end(&self) -> Point3<f64> {
        self.vertices[self.vertices.len() - 1]
    }

    fn point_at(&self, u: f64) -> Result<Point3<f64>> {
        Ok(frames::locate(&self.vertices, false, u)?.point)
    }

    fn transform_at(&self, u: f64) -> Result<Transform> {
        frames::frame_at(&self.vertices, &self.normals(), false, u, self.options.tolerance)
    }

    fn frames(&self, start_setback: f64, end_setback: f64) -> Result<Vec<Transform>> {
        let mut result = frames::vertex_frames(&self.vertices, &self.normals(), false);
        frames::apply_setbacks(&mut result, &self.vertices, start_setback, end_setback)?;
        Ok(result)
    }

    fn bounds(&self) -> BBox3 {
        BBox3::from_points(&self.vertices)
    }

    fn transformed(&self, transform: &Transform) -> Self {
        // Rigid transforms preserve every invariant checked at construction.
        Self {
            vertices: self.vertices.iter().map(|v| transform.of_point(v)).collect(),
            options: self.options,
        }
    }
}

impl PartialEq for Polyline {
    fn eq(&self, other: &Self) -> bool {
        self.vertices.len() == other.vertices.len()
            && self
                .vertices
                .iter()
                .zip(&other.vertices)
                .all(|(a, b)| a.almost_eq_within(b, self.options.tolerance))
    }
}

impl fmt::Display for Polyline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.vertices.iter().map(|v| v.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}
