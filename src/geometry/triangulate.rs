// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Ear-clipping triangulation of simple planar loops

use super::Transform;
use nalgebra::{Point2, Point3, Vector3};

/// Triangulate a simple planar loop.
///
/// Returned index triples wind counter-clockwise about `normal`. Loops that are
/// clockwise about `normal` come back reversed, so the caller's normal always wins.
pub fn triangulate(points: &[Point3<f64>], normal: &Vector3<f64>) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let frame = Transform::from_normal(points[0], *normal);
    let flat: Vec<Point2<f64>> = points
        .iter()
        .map(|p| {
            let local = frame.to_local(p);
            Point2::new(local.x, local.y)
        })
        .collect();

    let mut remaining: Vec<usize> = (0..n).collect();
    if signed_area(&flat) < 0.0 {
        remaining.reverse();
    }

    let mut result = Vec::with_capacity(n - 2);
    while remaining.len() > 3 {
        let len = remaining.len();
        let ear = (0..len).find(|&i| {
            is_ear(
                &flat,
                &remaining,
                remaining[(i + len - 1) % len],
                remaining[i],
                remaining[(i + 1) % len],
            )
        });

        match ear {
            Some(i) => {
                result.push([
                    remaining[(i + len - 1) % len],
                    remaining[i],
                    remaining[(i + 1) % len],
                ]);
                remaining.remove(i);
            }
            None => {
                // Degenerate input with no clean ear; fan out what is left.
                for i in 1..len - 1 {
                    result.push([remaining[0], remaining[i], remaining[i + 1]]);
                }
                return result;
            }
        }
    }

    result.push([remaining[0], remaining[1], remaining[2]]);
    result
}

fn signed_area(polygon: &[Point2<f64>]) -> f64 {
    let n = polygon.len();
    (0..n)
        .map(|i| {
            let (a, b) = (polygon[i], polygon[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        * 0.5
}

fn cross(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn is_ear(polygon: &[Point2<f64>], indices: &[usize], prev: usize, curr: usize, next: usize) -> bool {
    let (a, b, c) = (&polygon[prev], &polygon[curr], &polygon[next]);
    if cross(a, b, c) <= 0.0 {
        return false;
    }

    indices
        .iter()
        .filter(|&&i| i != prev && i != curr && i != next)
        .all(|&i| !point_in_triangle(&polygon[i], a, b, c))
}

fn point_in_triangle(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> bool {
    let d1 = cross(a, b, p);
    let d2 = cross(b, c, p);
    let d3 = cross(c, a, p);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn area(points: &[Point3<f64>], triangles: &[[usize; 3]], normal: &Vector3<f64>) -> f64 {
        triangles
            .iter()
            .map(|[a, b, c]| (points[*b] - points[*a]).cross(&(points[*c] - points[*a])).dot(normal) / 2.0)
            .sum()
    }

    #[test]
    fn test_square() {
        let square = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let triangles = triangulate(&square, &Vector3::z());
        assert_eq!(triangles.len(), 2);
        assert_relative_eq!(area(&square, &triangles, &Vector3::z()), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_concave_l() {
        let l = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(4.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 3.0, 0.0),
            Point3::new(0.0, 3.0, 0.0),
        ];
        let triangles = triangulate(&l, &Vector3::z());
        assert_eq!(triangles.len(), 4);
        // Every triangle is counter-clockwise, so the areas add up exactly.
        assert_relative_eq!(area(&l, &triangles, &Vector3::z()), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_clockwise_loop_follows_normal() {
        let square = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ];
        let triangles = triangulate(&square, &Vector3::z());
        assert_relative_eq!(area(&square, &triangles, &Vector3::z()), 1.0, epsilon = 1e-12);
    }
}
