// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for curve construction, evaluation and reconstruction

use nalgebra::Point3;
use thiserror::Error;

/// Result alias used throughout the kernel
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Broad failure category of a [`GeometryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid input to a constructor or validated mutation
    Construction,
    /// A curve parameter or distance outside its valid range
    Range,
    /// Segment-graph input the reconstructor cannot represent
    UnsupportedTopology,
}

/// Errors raised by the geometry kernel.
///
/// Every error is a deterministic function of its input; none are transient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("The curve could not be created. At least {required} vertices are required, but {found} were supplied.")]
    TooFewVertices { required: usize, found: usize },

    #[error("The polyline could not be created. Two vertices were almost equal: {first} {first_position} {second} {second_position}.")]
    CoincidentVertices {
        first: usize,
        second: usize,
        first_position: Point3<f64>,
        second_position: Point3<f64>,
    },

    #[error("The polyline could not be created. Segment {index} has zero length.")]
    ZeroLengthSegment { index: usize },

    #[error("The polyline could not be created. Segments {first} and {second} intersect.")]
    SelfIntersection { first: usize, second: usize },

    #[error("Transforming segment {segment} moves it out of the polyline's plane.")]
    NonPlanarSegmentTransform { segment: usize },

    #[error("The value of u ({u}) must be between 0.0 and 1.0.")]
    ParameterOutOfRange { u: f64 },

    #[error("Setbacks of {start} and {end} do not fit on a curve of length {length}.")]
    SetbackOutOfRange { start: f64, end: f64, length: f64 },

    #[error("A node at {position} has {degree} incident segments; at most 2 are supported.")]
    UnsupportedTopology { position: Point3<f64>, degree: usize },

    #[error("Coordinate {coordinate} cannot be scaled by {scale} without overflowing the clipping grid.")]
    OffsetOverflow { coordinate: f64, scale: f64 },

    #[error("Tolerance {tolerance} must be finite and greater than zero.")]
    InvalidTolerance { tolerance: f64 },

    #[error("The profile could not be used to build a solid: {reason}")]
    DegenerateProfile { reason: String },
}

impl GeometryError {
    /// The taxonomy bucket this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ParameterOutOfRange { .. } | Self::SetbackOutOfRange { .. } => ErrorKind::Range,
            Self::UnsupportedTopology { .. } => ErrorKind::UnsupportedTopology,
            _ => ErrorKind::Construction,
        }
    }
}
