// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Per-vertex normals and local frames along piecewise-linear paths.
//!
//! These are free functions over a vertex slice so that open polylines and closed
//! polygons share one implementation. Frames follow a single convention:
//!
//! - Y is the vertex normal ("up"),
//! - X is `direction × up` (the transverse axis, bisecting the corner at bends),
//! - Z points back along the path, towards the previous vertex.

use super::segments_of;
use crate::error::{GeometryError, Result};
use crate::geometry::Transform;
use crate::utils::{are_collinear, average, AlmostEqual, EPSILON};
use nalgebra::{Point3, Vector3};

/// A point on a path and where it falls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub point: Point3<f64>,
    /// Index of the segment containing the point
    pub segment: usize,
    /// Parameter of the point within that segment
    pub t: f64,
}

/// Compute one unit normal per vertex of an open path.
///
/// Each bend gets the cross product of its outgoing and incoming directions; vertices
/// without a bend reuse the normal of the previous bend. Normals are flipped as needed
/// so that consecutive normals never point away from each other.
pub fn normals_at_vertices(vertices: &[Point3<f64>]) -> Vec<Vector3<f64>> {
    let n = vertices.len();
    if n < 2 {
        return vec![Vector3::z(); n];
    }

    let mut next_direction = (vertices[1] - vertices[0]).normalize();

    let mut previous_direction = if are_collinear(vertices) {
        // A straight path has no bends; pick a world axis that is not along it.
        if next_direction.dot(&Vector3::y()).abs() < 1.0 - EPSILON {
            Vector3::y()
        } else {
            Vector3::x()
        }
    } else {
        vertices[2..]
            .iter()
            .map(|v| (v - vertices[1]).normalize())
            .find(|d| d.dot(&next_direction).abs() < 1.0 - EPSILON)
            .unwrap_or_else(Vector3::y)
    };

    let mut result = Vec::with_capacity(n);
    let mut previous_normal: Option<Vector3<f64>> = None;
    for i in 0..n {
        if i < n - 1 {
            let direction = (vertices[i + 1] - vertices[i]).normalize();
            if next_direction.dot(&direction).abs() < 1.0 - EPSILON {
                previous_direction = next_direction;
                next_direction = direction;
            }
        }

        let mut normal = next_direction.cross(&previous_direction).normalize();
        if let Some(previous) = previous_normal {
            if previous.dot(&normal) < 0.0 {
                normal = -normal;
            }
        }
        result.push(normal);
        previous_normal = Some(normal);
    }
    result
}

/// Frame at a path end, Z along the single neighboring segment.
///
/// For interior vertices the X axis bisects the two neighbors instead.
pub fn orthogonal_frame(vertices: &[Point3<f64>], index: usize, up: &Vector3<f64>) -> Transform {
    let a = vertices[index];
    let last = vertices.len() - 1;

    if index == 0 {
        let z = (a - vertices[1]).normalize();
        Transform::new(a, up.cross(&z), z)
    } else if index == last {
        let z = (vertices[index - 1] - a).normalize();
        Transform::new(a, up.cross(&z), z)
    } else {
        let v1 = (vertices[index - 1] - a).normalize();
        let v2 = (vertices[index + 1] - a).normalize();
        let x = -average(&v1, &v2);
        Transform::new(a, x, x.cross(up))
    }
}

/// Frame whose X axis bisects the corner at `index`.
///
/// On closed paths the first and last vertices wrap around to each other.
pub fn miter_frame(
    vertices: &[Point3<f64>],
    index: usize,
    up: &Vector3<f64>,
    closed: bool,
) -> Transform {
    let (previous, next) = neighbors(vertices, index, closed);
    let a = vertices[index];
    let l1 = (a - previous).normalize();
    let l2 = (next - a).normalize();
    let x1 = l1.cross(up);
    let x2 = l2.cross(up);
    let mut x = average(&x1, &x2);
    if x.norm() < EPSILON {
        // The path doubles back on itself; there is no corner to bisect.
        x = x1;
    }
    Transform::new(a, x, x.cross(up))
}

/// Factor by which a section placed on the miter frame at `index` must be stretched
/// along X to keep the width it has perpendicular to the adjoining segments.
pub fn miter_scale(vertices: &[Point3<f64>], index: usize, closed: bool) -> f64 {
    let n = vertices.len();
    if !closed && (index == 0 || index == n - 1) {
        return 1.0;
    }
    let (previous, next) = neighbors(vertices, index, closed);
    let a = vertices[index];
    let half = average(&(a - previous).normalize(), &(next - a).normalize()).norm();
    if half < EPSILON {
        1.0
    } else {
        1.0 / half
    }
}

fn neighbors(vertices: &[Point3<f64>], index: usize, closed: bool) -> (Point3<f64>, Point3<f64>) {
    let n = vertices.len();
    let previous = if index == 0 {
        if closed {
            vertices[n - 1]
        } else {
            vertices[1]
        }
    } else {
        vertices[index - 1]
    };
    let next = if index == n - 1 {
        if closed {
            vertices[0]
        } else {
            vertices[n - 2]
        }
    } else {
        vertices[index + 1]
    };
    (previous, next)
}

/// The frame at a vertex: orthogonal at the ends of open paths, mitered elsewhere
pub fn vertex_frame(
    vertices: &[Point3<f64>],
    normals: &[Vector3<f64>],
    index: usize,
    closed: bool,
) -> Transform {
    let last = vertices.len() - 1;
    if !closed && (index == 0 || index == last) {
        orthogonal_frame(vertices, index, &normals[index])
    } else {
        miter_frame(vertices, index, &normals[index], closed)
    }
}

/// One frame per vertex
pub fn vertex_frames(
    vertices: &[Point3<f64>],
    normals: &[Vector3<f64>],
    closed: bool,
) -> Vec<Transform> {
    (0..vertices.len())
        .map(|i| vertex_frame(vertices, normals, i, closed))
        .collect()
}

/// Find the point at normalized arc length `u`
pub fn locate(vertices: &[Point3<f64>], closed: bool, u: f64) -> Result<Location> {
    if !(0.0..=1.0).contains(&u) {
        return Err(GeometryError::ParameterOutOfRange { u });
    }

    let segments = segments_of(vertices, closed);
    let total: f64 = segments.iter().map(|s| s.length()).sum();
    let d = total * u;

    let mut accumulated = 0.0;
    for (i, segment) in segments.iter().enumerate() {
        let length = segment.length();
        if accumulated <= d && accumulated + length >= d {
            let t = if length > 0.0 {
                (d - accumulated) / length
            } else {
                0.0
            };
            return Ok(Location {
                point: segment.lerp(t),
                segment: i,
                t,
            });
        }
        accumulated += length;
    }

    // Rounding can leave d a hair past the accumulated total.
    let last = segments.len() - 1;
    Ok(Location {
        point: segments[last].end,
        segment: last,
        t: 1.0,
    })
}

/// Frame at normalized arc length `u`.
///
/// At a vertex this is the vertex frame. Between vertices the normal is interpolated
/// linearly between the two bounding vertex normals.
pub fn frame_at(
    vertices: &[Point3<f64>],
    normals: &[Vector3<f64>],
    closed: bool,
    u: f64,
    tolerance: f64,
) -> Result<Transform> {
    let location = locate(vertices, closed, u)?;

    if let Some(index) = vertices
        .iter()
        .position(|v| v.almost_eq_within(&location.point, tolerance))
    {
        return Ok(vertex_frame(vertices, normals, index, closed));
    }

    let n = vertices.len();
    let start = location.segment;
    let end = (start + 1) % n;
    let previous_normal = normals[start];
    let next_normal = normals[end];
    let normal = ((next_normal - previous_normal) * location.t + previous_normal).normalize();
    let x = (vertices[end] - vertices[start]).normalize().cross(&normal);
    Ok(Transform::from_axes(location.point, x, normal, x.cross(&normal)))
}

/// Move the first and last frame origins inward along an open path.
///
/// A setback must stay within its end segment, so the moved frame keeps the
/// orientation of that segment and the frames stay in path order.
pub fn apply_setbacks(
    frames: &mut [Transform],
    vertices: &[Point3<f64>],
    start_setback: f64,
    end_setback: f64,
) -> Result<()> {
    let segments = segments_of(vertices, false);
    let length: f64 = segments.iter().map(|s| s.length()).sum();
    let first = segments.first().map_or(0.0, |s| s.length());
    let last = segments.last().map_or(0.0, |s| s.length());
    let out_of_range = !(start_setback >= 0.0 && end_setback >= 0.0)
        || (start_setback + end_setback > 0.0 && start_setback + end_setback >= length)
        || (start_setback > 0.0 && start_setback >= first)
        || (end_setback > 0.0 && end_setback >= last);
    if out_of_range {
        return Err(GeometryError::SetbackOutOfRange {
            start: start_setback,
            end: end_setback,
            length,
        });
    }

    if start_setback > 0.0 {
        frames[0].origin = locate(vertices, false, start_setback / length)?.point;
    }
    if end_setback > 0.0 {
        let last = frames.len() - 1;
        frames[last].origin = locate(vertices, false, 1.0 - end_setback / length)?.point;
    }
    Ok(())
}
