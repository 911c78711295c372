// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Reconstruction of connected paths from an unordered set of segments.
//!
//! Endpoints that are almost equal are merged into one node. Nodes live in an arena and
//! refer to each other by index through two neighbor slots, so every node may join at
//! most two segments.

use super::{Polygon, Polyline, PolylineOptions};
use crate::error::{GeometryError, Result};
use crate::geometry::Line;
use crate::utils::AlmostEqual;
use nalgebra::Point3;
use tracing::debug;

#[derive(Debug, Clone)]
struct Node {
    position: Point3<f64>,
    neighbors: [Option<usize>; 2],
}

impl Node {
    fn degree(&self) -> usize {
        self.neighbors.iter().filter(|n| n.is_some()).count()
    }

    fn is_linked_to(&self, other: usize) -> bool {
        self.neighbors.contains(&Some(other))
    }
}

/// A path recovered from the segment set
#[derive(Debug, Clone, PartialEq)]
pub enum TracedPath {
    Open(Polyline),
    /// A loop; the start vertex is not repeated at the end
    Closed(Polygon),
}

impl TracedPath {
    pub fn vertices(&self) -> &[Point3<f64>] {
        match self {
            TracedPath::Open(p) => p.vertices(),
            TracedPath::Closed(p) => p.vertices(),
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, TracedPath::Closed(_))
    }
}

/// Node graph built from segments
#[derive(Debug, Clone)]
pub struct SegmentGraph {
    nodes: Vec<Node>,
    tolerance: f64,
}

impl SegmentGraph {
    /// Build the graph, failing on zero-length segments and on nodes joining more than
    /// two distinct segments. Repeated segments are counted once.
    pub fn new(segments: &[Line], tolerance: f64) -> Result<Self> {
        let mut graph = Self {
            nodes: Vec::new(),
            tolerance,
        };

        for (index, segment) in segments.iter().enumerate() {
            let a = graph.node_at(segment.start);
            let b = graph.node_at(segment.end);
            if a == b {
                return Err(GeometryError::ZeroLengthSegment { index });
            }
            if graph.nodes[a].is_linked_to(b) {
                continue;
            }
            graph.link(a, b)?;
            graph.link(b, a)?;
        }

        Ok(graph)
    }

    /// Index of the node at `position`, creating it if none exists
    fn node_at(&mut self, position: Point3<f64>) -> usize {
        if let Some(index) = self
            .nodes
            .iter()
            .position(|n| n.position.almost_eq_within(&position, self.tolerance))
        {
            return index;
        }
        self.nodes.push(Node {
            position,
            neighbors: [None, None],
        });
        self.nodes.len() - 1
    }

    fn link(&mut self, from: usize, to: usize) -> Result<()> {
        let node = &mut self.nodes[from];
        match node.neighbors.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(to);
                Ok(())
            }
            None => Err(GeometryError::UnsupportedTopology {
                position: node.position,
                degree: 3,
            }),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Walk every connected component once.
    ///
    /// Components with a dead end are walked from that end so that open paths come out
    /// whole; the remaining components are loops.
    pub fn trace(&self) -> Vec<(Vec<Point3<f64>>, bool)> {
        let mut visited = vec![false; self.nodes.len()];
        let mut paths = Vec::new();

        let ends = (0..self.nodes.len()).filter(|&i| self.nodes[i].degree() <= 1);
        let rest = 0..self.nodes.len();
        for start in ends.chain(rest) {
            if visited[start] {
                continue;
            }

            let mut positions = Vec::new();
            let mut current = start;
            loop {
                visited[current] = true;
                positions.push(self.nodes[current].position);
                match self.nodes[current]
                    .neighbors
                    .iter()
                    .flatten()
                    .find(|&&n| !visited[n])
                {
                    Some(&next) => current = next,
                    None => break,
                }
            }

            let closed = positions.len() > 2 && self.nodes[current].is_linked_to(start);
            paths.push((positions, closed));
        }

        paths
    }
}

/// Rebuild polylines and loops from unordered segments
pub fn reconstruct_paths(segments: &[Line], tolerance: f64) -> Result<Vec<TracedPath>> {
    let graph = SegmentGraph::new(segments, tolerance)?;
    let options = PolylineOptions {
        tolerance,
        check_self_intersection: false,
    };

    let mut result = Vec::new();
    for (positions, closed) in graph.trace() {
        if positions.len() < 2 {
            continue;
        }
        result.push(if closed {
            TracedPath::Closed(Polygon::with_options(positions, options)?)
        } else {
            TracedPath::Open(Polyline::with_options(positions, options)?)
        });
    }

    debug!(
        segments = segments.len(),
        nodes = graph.node_count(),
        paths = result.len(),
        "reconstructed paths"
    );
    Ok(result)
}
