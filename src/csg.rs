// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Ordered boolean composition of solids

use crate::geometry::{Mesh, Transform};
use crate::solid::{tessellate, Solid};
use tracing::debug;

/// Boolean operator applied to the current solid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Difference,
}

/// One entry of the operation log
#[derive(Debug, Clone)]
pub struct CsgOperation {
    pub op: BooleanOp,
    /// The operand as supplied, before `transform` is applied
    pub operand: Solid,
    pub transform: Transform,
}

impl CsgOperation {
    fn apply(&self, current: &Solid) -> Solid {
        let operand = self.operand.transformed(&self.transform);
        match self.op {
            BooleanOp::Union => current.union(&operand),
            BooleanOp::Difference => current.difference(&operand),
        }
    }
}

/// A solid built by applying unions and differences to a base solid, in call order.
///
/// The base is kept unchanged next to the log of applied operations, so the result
/// can be rebuilt with [`Csg::replay`]. Operations cannot be undone.
#[derive(Debug, Clone)]
pub struct Csg {
    base: Solid,
    current: Solid,
    operations: Vec<CsgOperation>,
}

impl Csg {
    pub fn new(base: Solid) -> Self {
        Self {
            current: base.clone(),
            base,
            operations: Vec::new(),
        }
    }

    /// Union `other` into the current solid
    pub fn union(&mut self, other: &Solid) -> &mut Self {
        self.union_with(other, &Transform::identity())
    }

    /// Union `other`, placed by `transform`, into the current solid
    pub fn union_with(&mut self, other: &Solid, transform: &Transform) -> &mut Self {
        self.push(BooleanOp::Union, other, transform)
    }

    /// Subtract `other` from the current solid
    pub fn difference(&mut self, other: &Solid) -> &mut Self {
        self.difference_with(other, &Transform::identity())
    }

    /// Subtract `other`, placed by `transform`, from the current solid
    pub fn difference_with(&mut self, other: &Solid, transform: &Transform) -> &mut Self {
        self.push(BooleanOp::Difference, other, transform)
    }

    fn push(&mut self, op: BooleanOp, operand: &Solid, transform: &Transform) -> &mut Self {
        let operation = CsgOperation {
            op,
            operand: operand.clone(),
            transform: *transform,
        };
        let faces_before = self.current.faces().len();
        self.current = operation.apply(&self.current);
        debug!(
            ?op,
            step = self.operations.len() + 1,
            operand_faces = operand.faces().len(),
            faces_before,
            faces_after = self.current.faces().len(),
            "applied boolean operation"
        );
        self.operations.push(operation);
        self
    }

    /// The current solid
    pub fn solid(&self) -> &Solid {
        &self.current
    }

    /// The solid the composition started from
    pub fn base(&self) -> &Solid {
        &self.base
    }

    /// Applied operations, oldest first
    pub fn operations(&self) -> &[CsgOperation] {
        &self.operations
    }

    /// Rebuild the current solid from the base and the log
    pub fn replay(&self) -> Solid {
        self.operations
            .iter()
            .fold(self.base.clone(), |solid, operation| operation.apply(&solid))
    }

    /// Append a triangulation of the current solid to `mesh`.
    ///
    /// Repeated calls append an equivalent triangulation each time.
    pub fn tessellate(&self, mesh: &mut Mesh) {
        tessellate(&self.current, mesh);
    }
}

impl From<Solid> for Csg {
    fn from(base: Solid) -> Self {
        Self::new(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};

    fn unit_cube() -> Solid {
        Solid::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_operations_are_logged_in_order() {
        let mut csg = Csg::new(Solid::cuboid(Point3::origin(), Point3::new(2.0, 2.0, 2.0)));
        csg.difference(&unit_cube())
            .union_with(&unit_cube(), &Transform::translation(Vector3::new(2.0, 0.0, 0.0)));
        let ops: Vec<BooleanOp> = csg.operations().iter().map(|o| o.op).collect();
        assert_eq!(ops, vec![BooleanOp::Difference, BooleanOp::Union]);
        assert_relative_eq!(csg.solid().signed_volume(), 8.0, epsilon = 1e-6);
        assert_relative_eq!(csg.base().signed_volume(), 8.0, epsilon = 1e-9);
    }

    #[test]
    fn test_replay_matches_current() {
        let mut csg = Csg::new(Solid::cuboid(Point3::origin(), Point3::new(3.0, 1.0, 1.0)));
        csg.difference_with(&unit_cube(), &Transform::translation(Vector3::new(1.0, 0.0, 0.0)));
        assert_relative_eq!(csg.replay().signed_volume(), csg.solid().signed_volume(), epsilon = 1e-9);
        assert_relative_eq!(csg.solid().signed_volume(), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_order_matters() {
        let big = Solid::cuboid(Point3::origin(), Point3::new(2.0, 2.0, 2.0));
        let mut first = Csg::new(big.clone());
        first.union(&unit_cube()).difference(&unit_cube());
        let mut second = Csg::new(big);
        second.difference(&unit_cube()).union(&unit_cube());
        assert_relative_eq!(first.solid().signed_volume(), 7.0, epsilon = 1e-6);
        assert_relative_eq!(second.solid().signed_volume(), 8.0, epsilon = 1e-6);
    }

    #[test]
    fn test_tessellate_appends() {
        let csg = Csg::from(unit_cube());
        let mut mesh = Mesh::new();
        csg.tessellate(&mut mesh);
        let once = mesh.triangle_count();
        csg.tessellate(&mut mesh);
        assert_eq!(mesh.triangle_count(), 2 * once);
        assert_relative_eq!(mesh.volume(), 2.0, epsilon = 1e-9);
    }
}
