// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Planar offsets through the Clipper polygon-clipping engine.
//!
//! Clipper works on integer coordinates, so vertices are scaled by `1 / tolerance`,
//! rounded onto that grid, offset, and scaled back. Offsets are computed in the XY
//! plane; resulting loops lie at z = 0.

use super::{Polygon, PolylineOptions};
use crate::config::KernelConfig;
use crate::error::{GeometryError, Result};
use geo_clipper::{ClipperInt, ClipperOpenInt, EndType as ClipperEndType, JoinType};
use geo_types::{Coord, LineString, MultiLineString, MultiPolygon};
use nalgebra::Point3;
use tracing::debug;

/// Largest magnitude Clipper accepts for a coordinate
const CLIPPER_HI_RANGE: i64 = 0x3FFF_FFFF_FFFF_FFFF;

/// How the ends of a path are treated when offsetting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndType {
    /// Open ends are extended by the offset distance and squared off
    Square,
    /// Open ends are squared off without extension
    Butt,
    /// The path is treated as a closed loop
    ClosedPolygon,
}

impl From<EndType> for ClipperEndType {
    fn from(end_type: EndType) -> Self {
        match end_type {
            EndType::Square => ClipperEndType::OpenSquare,
            EndType::Butt => ClipperEndType::OpenButt,
            EndType::ClosedPolygon => ClipperEndType::ClosedPolygon,
        }
    }
}

/// Precision and join settings for an offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetOptions {
    /// Grid spacing of the integer representation
    pub tolerance: f64,
    /// Miter joins longer than this multiple of the distance are squared off
    pub miter_limit: f64,
}

impl OffsetOptions {
    pub fn from_config(config: &KernelConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            miter_limit: config.miter_limit,
        }
    }

    /// Factor that maps model units onto the integer grid
    pub fn scale(&self) -> Result<f64> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(GeometryError::InvalidTolerance {
                tolerance: self.tolerance,
            });
        }
        let scale = (1.0 / self.tolerance).round();
        if scale < 1.0 || !scale.is_finite() {
            return Err(GeometryError::InvalidTolerance {
                tolerance: self.tolerance,
            });
        }
        Ok(scale)
    }
}

impl Default for OffsetOptions {
    fn default() -> Self {
        Self {
            tolerance: crate::utils::EPSILON,
            miter_limit: 2.0,
        }
    }
}

fn to_grid(value: f64, scale: f64) -> Result<i64> {
    let scaled = (value * scale).round();
    if !scaled.is_finite() || scaled.abs() > CLIPPER_HI_RANGE as f64 {
        return Err(GeometryError::OffsetOverflow {
            coordinate: value,
            scale,
        });
    }
    Ok(scaled as i64)
}

fn to_line_string(vertices: &[Point3<f64>], scale: f64) -> Result<LineString<i64>> {
    let coords = vertices
        .iter()
        .map(|v| {
            Ok(Coord {
                x: to_grid(v.x, scale)?,
                y: to_grid(v.y, scale)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(LineString::new(coords))
}

/// Ring back in model units, without the repeated closing coordinate
fn from_ring(ring: &LineString<i64>, scale: f64) -> Vec<Point3<f64>> {
    let mut points: Vec<Point3<f64>> = ring
        .0
        .iter()
        .map(|c| Point3::new(c.x as f64 / scale, c.y as f64 / scale, 0.0))
        .collect();
    if points.len() > 1 && ring.0.first() == ring.0.last() {
        points.pop();
    }
    points
}

/// Offset a vertex path by `distance`.
///
/// Only the X and Y coordinates are used: the path is projected onto the XY plane
/// and the resulting loops lie at z = 0. A path in a vertical plane projects to a
/// line and yields no loops when treated as closed.
///
/// Returns no loops when the shape erodes away entirely and several when an inward
/// offset splits it. Holes in the result are returned as loops of their own. A
/// two-vertex path treated as closed encloses nothing and yields no loops.
pub fn offset_path(
    vertices: &[Point3<f64>],
    distance: f64,
    end_type: EndType,
    options: &OffsetOptions,
) -> Result<Vec<Polygon>> {
    let scale = options.scale()?;
    let delta = to_grid(distance, scale)? as f64;

    let join = JoinType::Miter(options.miter_limit);
    let solution: MultiPolygon<i64> = match end_type {
        EndType::ClosedPolygon => {
            let path = to_line_string(vertices, scale)?;
            geo_types::Polygon::new(path, vec![]).offset(delta, join, end_type.into())
        }
        EndType::Square | EndType::Butt => {
            // Clipper drops open paths of two points; a midpoint keeps the segment.
            let path = if vertices.len() == 2 {
                let middle = Point3::from((vertices[0].coords + vertices[1].coords) * 0.5);
                to_line_string(&[vertices[0], middle, vertices[1]], scale)?
            } else {
                to_line_string(vertices, scale)?
            };
            MultiLineString::new(vec![path]).offset(delta, join, end_type.into())
        }
    };

    let curve_options = PolylineOptions {
        tolerance: options.tolerance,
        check_self_intersection: false,
    };
    let loops: Vec<Polygon> = solution
        .0
        .iter()
        .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors()))
        .map(|ring| from_ring(ring, scale))
        .filter(|points| points.len() >= 3)
        .map(|points| Polygon::from_trusted(points, curve_options))
        .collect();

    debug!(
        scale,
        distance,
        ?end_type,
        input_vertices = vertices.len(),
        loops = loops.len(),
        "offset path"
    );
    Ok(loops)
}
