// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Solids generated from curves

use super::{Face, Solid};
use crate::curve::{frames, Curve, Polygon, Polyline};
use crate::error::{GeometryError, Result};
use crate::utils::{newell_normal, EPSILON};
use nalgebra::{Point3, Vector3};

/// A profile pushed along a straight direction
#[derive(Debug, Clone)]
pub struct Extrude {
    pub profile: Polygon,
    pub height: f64,
    pub direction: Vector3<f64>,
}

impl Extrude {
    /// Extrude along the profile's normal
    pub fn new(profile: Polygon, height: f64) -> Self {
        let direction = profile.normal();
        Self {
            profile,
            height,
            direction,
        }
    }

    pub fn with_direction(profile: Polygon, height: f64, direction: Vector3<f64>) -> Self {
        Self {
            profile,
            height,
            direction,
        }
    }

    pub fn solid(&self) -> Result<Solid> {
        if self.height.is_nan() || self.height <= 0.0 || self.direction.norm() < EPSILON {
            return Err(GeometryError::DegenerateProfile {
                reason: format!(
                    "extrusion of height {} along {} is empty",
                    self.height, self.direction
                ),
            });
        }
        let direction = self.direction.normalize();
        let alignment = self.profile.normal().dot(&direction);
        if alignment.abs() < EPSILON {
            return Err(GeometryError::DegenerateProfile {
                reason: "extrusion direction lies in the profile plane".to_string(),
            });
        }

        // Walk the profile counter-clockwise about the direction.
        let mut bottom = self.profile.vertices().to_vec();
        if alignment < 0.0 {
            bottom.reverse();
        }
        let offset = direction * self.height;
        let top: Vec<Point3<f64>> = bottom.iter().map(|p| p + offset).collect();

        let mut faces = Vec::new();
        let mut bottom_cap = bottom.clone();
        bottom_cap.reverse();
        faces.extend(Face::from_loop(&bottom_cap));
        faces.extend(Face::from_loop(&top));

        let n = bottom.len();
        for k in 0..n {
            let next = (k + 1) % n;
            faces.extend(Face::new(vec![bottom[k], bottom[next], top[next], top[k]]));
        }

        Ok(Solid::from_faces(faces))
    }
}

/// A profile carried along an open path.
///
/// The profile's XY coordinates are placed in each vertex frame of the path, X across
/// the path and Y along the vertex normal. Sections at bends are stretched across the
/// miter so the walls keep the profile's width.
#[derive(Debug, Clone)]
pub struct Sweep {
    pub profile: Polygon,
    pub path: Polyline,
    pub start_setback: f64,
    pub end_setback: f64,
}

impl Sweep {
    pub fn new(profile: Polygon, path: Polyline) -> Self {
        Self {
            profile,
            path,
            start_setback: 0.0,
            end_setback: 0.0,
        }
    }

    pub fn with_setbacks(mut self, start: f64, end: f64) -> Self {
        self.start_setback = start;
        self.end_setback = end;
        self
    }

    pub fn solid(&self) -> Result<Solid> {
        let frames = self.path.frames(self.start_setback, self.end_setback)?;
        let profile = self.profile.vertices();
        let path = self.path.vertices();

        let sections: Vec<Vec<Point3<f64>>> = frames
            .iter()
            .enumerate()
            .map(|(i, frame)| {
                let stretch = frames::miter_scale(path, i, false);
                profile
                    .iter()
                    .map(|p| frame.of_point(&Point3::new(p.x * stretch, p.y, 0.0)))
                    .collect()
            })
            .collect();

        let mut faces = Vec::new();
        let first = &frames[0];
        let last = &frames[frames.len() - 1];
        faces.extend(cap(&sections[0], &first.z_axis));
        faces.extend(cap(&sections[sections.len() - 1], &-last.z_axis));

        // Counter-clockwise profiles run clockwise about the path direction.
        let counter_clockwise = newell_normal(profile).z > 0.0;
        let m = profile.len();
        for pair in sections.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            for k in 0..m {
                let next = (k + 1) % m;
                let quad = if counter_clockwise {
                    [a[k], b[k], b[next], a[next]]
                } else {
                    [a[k], a[next], b[next], b[k]]
                };
                faces.extend(Face::new(vec![quad[0], quad[1], quad[2]]));
                faces.extend(Face::new(vec![quad[0], quad[2], quad[3]]));
            }
        }

        let solid = Solid::from_faces(faces);
        if solid.signed_volume() <= 0.0 {
            return Err(GeometryError::DegenerateProfile {
                reason: "sweep encloses no volume".to_string(),
            });
        }
        Ok(solid)
    }
}

/// End cap facing `outward`
fn cap(section: &[Point3<f64>], outward: &Vector3<f64>) -> Vec<Face> {
    let mut points = section.to_vec();
    if newell_normal(&points).dot(outward) < 0.0 {
        points.reverse();
    }
    Face::from_loop(&points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_extrude_rectangle() {
        let solid = Extrude::new(Polygon::rectangle(2.0, 3.0).unwrap(), 4.0)
            .solid()
            .unwrap();
        assert_eq!(solid.faces().len(), 6);
        assert_relative_eq!(solid.signed_volume(), 24.0, epsilon = 1e-9);
        assert_relative_eq!(solid.bounds().max.z, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_extrude_clockwise_profile_is_outward() {
        let profile = Polygon::rectangle(2.0, 3.0).unwrap().reversed();
        let solid = Extrude::with_direction(profile, 1.0, Vector3::z()).solid().unwrap();
        assert_relative_eq!(solid.signed_volume(), 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_extrude_concave_profile() {
        let solid = Extrude::new(Polygon::l_shape(4.0, 3.0, 1.0).unwrap(), 2.0)
            .solid()
            .unwrap();
        assert_relative_eq!(solid.signed_volume(), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_extrude_in_plane_rejected() {
        let extrude = Extrude::with_direction(Polygon::rectangle(1.0, 1.0).unwrap(), 1.0, Vector3::x());
        assert!(extrude.solid().is_err());
    }

    #[test]
    fn test_sweep_straight() {
        let path = Polyline::new(vec![Point3::origin(), Point3::new(10.0, 0.0, 0.0)]).unwrap();
        let solid = Sweep::new(Polygon::rectangle(1.0, 1.0).unwrap(), path)
            .solid()
            .unwrap();
        assert_relative_eq!(solid.signed_volume(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sweep_around_corner_keeps_section() {
        let path = Polyline::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 10.0, 0.0),
        ])
        .unwrap();
        let solid = Sweep::new(Polygon::rectangle(1.0, 1.0).unwrap(), path)
            .solid()
            .unwrap();
        assert_relative_eq!(solid.signed_volume(), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sweep_setbacks_shorten() {
        let path = Polyline::new(vec![Point3::origin(), Point3::new(10.0, 0.0, 0.0)]).unwrap();
        let solid = Sweep::new(Polygon::rectangle(1.0, 1.0).unwrap(), path)
            .with_setbacks(1.0, 2.0)
            .solid()
            .unwrap();
        assert_relative_eq!(solid.signed_volume(), 7.0, epsilon = 1e-9);
        assert_relative_eq!(solid.bounds().min.x, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sweep_setback_stays_on_end_segment() {
        let path = Polyline::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 10.0, 0.0),
        ])
        .unwrap();
        let profile = Polygon::rectangle(1.0, 1.0).unwrap();

        let folded = Sweep::new(profile.clone(), path.clone()).with_setbacks(3.0, 0.0);
        assert!(matches!(
            folded.solid(),
            Err(GeometryError::SetbackOutOfRange { .. })
        ));

        let solid = Sweep::new(profile, path).with_setbacks(1.0, 0.0).solid().unwrap();
        assert_relative_eq!(solid.signed_volume(), 11.0, epsilon = 1e-9);
    }
}
