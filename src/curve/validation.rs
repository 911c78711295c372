// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Guards run over candidate vertex sequences before a curve accepts them.
//!
//! Each guard comes as a predicate returning the offending indices and as an
//! assertion returning a [`GeometryError`]. Nothing here repairs its input.

use crate::error::{GeometryError, Result};
use crate::geometry::{Line, Transform};
use crate::utils::AlmostEqual;
use nalgebra::Point3;

/// Find the first pair of vertices that are almost equal
pub fn find_coincident_vertices(vertices: &[Point3<f64>], tolerance: f64) -> Option<(usize, usize)> {
    for i in 0..vertices.len() {
        for j in (i + 1)..vertices.len() {
            if vertices[i].almost_eq_within(&vertices[j], tolerance) {
                return Some((i, j));
            }
        }
    }
    None
}

/// Fail if any two vertices are almost equal
pub fn check_coincidence(vertices: &[Point3<f64>], tolerance: f64) -> Result<()> {
    match find_coincident_vertices(vertices, tolerance) {
        Some((first, second)) => Err(GeometryError::CoincidentVertices {
            first,
            second,
            first_position: vertices[first],
            second_position: vertices[second],
        }),
        None => Ok(()),
    }
}

/// Fail if any segment is shorter than the tolerance
pub fn check_segment_lengths(segments: &[Line], tolerance: f64) -> Result<()> {
    match segments.iter().position(|s| s.length() < tolerance) {
        Some(index) => Err(GeometryError::ZeroLengthSegment { index }),
        None => Ok(()),
    }
}

/// Find the first pair of segments whose projections onto the XY plane of
/// `plane` cross or overlap. Every pair of distinct indices is compared; segments
/// that only touch at an endpoint do not count.
pub fn find_self_intersection(plane: &Transform, segments: &[Line]) -> Option<(usize, usize)> {
    let local: Vec<Line> = segments
        .iter()
        .map(|s| Line::new(plane.to_local(&s.start), plane.to_local(&s.end)))
        .collect();

    for i in 0..local.len() {
        for j in 0..local.len() {
            if i == j {
                continue;
            }
            if local[i].intersects_2d(&local[j]) || local[i].overlaps_2d(&local[j]) {
                return Some((i, j));
            }
        }
    }
    None
}

/// Fail if any two segments cross in the plane
pub fn check_self_intersection(plane: &Transform, segments: &[Line]) -> Result<()> {
    match find_self_intersection(plane, segments) {
        Some((first, second)) => Err(GeometryError::SelfIntersection { first, second }),
        None => Ok(()),
    }
}

pub fn check_vertex_count(vertices: &[Point3<f64>], required: usize) -> Result<()> {
    if vertices.len() < required {
        return Err(GeometryError::TooFewVertices {
            required,
            found: vertices.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::segments_of;

    #[test]
    fn test_coincidence_names_both_indices() {
        let vertices = [Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 0.0000001)];
        match check_coincidence(&vertices, 1e-6) {
            Err(GeometryError::CoincidentVertices { first, second, .. }) => {
                assert_eq!((first, second), (0, 1));
            }
            other => panic!("expected coincident vertices, got {:?}", other),
        }
    }

    #[test]
    fn test_coincidence_non_adjacent() {
        let vertices = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
        ];
        assert_eq!(find_coincident_vertices(&vertices, 1e-5), Some((0, 3)));
    }

    #[test]
    fn test_zero_length_segment() {
        let segments = [
            Line::new(Point3::origin(), Point3::new(1.0, 0.0, 0.0)),
            Line::new(Point3::new(1.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)),
        ];
        assert_eq!(
            check_segment_lengths(&segments, 1e-5),
            Err(GeometryError::ZeroLengthSegment { index: 1 })
        );
    }

    #[test]
    fn test_bow_tie_intersects() {
        let vertices = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ];
        let plane = Transform::from_points_plane(&vertices);
        let result = check_self_intersection(&plane, &segments_of(&vertices, true));
        assert!(matches!(result, Err(GeometryError::SelfIntersection { .. })));
    }

    #[test]
    fn test_adjacent_segments_are_not_intersections() {
        let vertices = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let plane = Transform::from_points_plane(&vertices);
        assert!(check_self_intersection(&plane, &segments_of(&vertices, true)).is_ok());
    }

    #[test]
    fn test_doubling_back_overlaps() {
        let vertices = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ];
        let plane = Transform::from_points_plane(&vertices);
        assert_eq!(
            find_self_intersection(&plane, &segments_of(&vertices, false)),
            Some((0, 1))
        );

        let straight = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let plane = Transform::from_points_plane(&straight);
        assert!(find_self_intersection(&plane, &segments_of(&straight, false)).is_none());
    }

    #[test]
    fn test_vertical_polygon_is_projected_into_its_plane() {
        // Lies in the XZ plane; a plain XY projection would collapse it.
        let vertices = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 2.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 2.0),
        ];
        let plane = Transform::from_points_plane(&vertices);
        assert!(find_self_intersection(&plane, &segments_of(&vertices, true)).is_some());
    }
}
