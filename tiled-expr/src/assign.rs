//! Terminal assignment of block expressions.
//!
//! Assignment is the only operation with side effects. It resolves the
//! labels of the whole expression against the destination block, producing
//! an [`AssignmentPlan`], and hands the plan to a [`BlockEngine`] that moves
//! and combines the tiles.
//!
//! Label resolution happens here rather than at construction because only
//! the complete tree (and its destination) determine which labels must match.
//!
//! Assignment is a collective operation: every process that holds part of a
//! participating array must make the same call.

use crate::annotation::Annotation;
use crate::array::DistributedArray;
use crate::block::BlockView;
use crate::diagnostics::trace_enabled;
use crate::expr::BlockExpr;
use crate::{BlockExprError, Result};

/// Evaluator of block expressions into a destination block.
///
/// Implementations write exactly the tiles of `dest`'s `[lower, upper)` box.
/// A failed evaluation may leave the destination partially written.
pub trait BlockEngine<A: DistributedArray> {
    fn evaluate_into(
        &self,
        plan: &AssignmentPlan,
        expr: &BlockExpr<'_, A>,
        dest: &BlockView<'_, A>,
    ) -> Result<()>;
}

/// Resolved index layout of an assignment.
///
/// Axes are in destination order. For the `n`-th leaf of the expression
/// (depth-first, left to right), `leaf_permutation(n)[d]` is the leaf axis
/// that carries destination axis `d`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentPlan {
    labels: Vec<String>,
    extents: Vec<usize>,
    leaf_permutations: Vec<Vec<usize>>,
}

impl AssignmentPlan {
    /// Resolve `expr` against `dest`.
    pub fn resolve<A: DistributedArray>(
        expr: &BlockExpr<'_, A>,
        dest: &BlockView<'_, A>,
    ) -> Result<Self> {
        let dest_annotation = dest.annotation();
        let dest_shape = LabeledShape::of_leaf(dest)?;
        let source_shape = LabeledShape::of_expr(expr)?;
        dest_shape.expect_match(&source_shape)?;

        let leaf_permutations = expr
            .leaves()
            .iter()
            .map(|leaf| {
                leaf.block
                    .annotation()
                    .permutation_to(dest_annotation)
                    .map(|to_dest| invert(&to_dest))
                    .ok_or_else(|| leaf.block.annotation().invalid("label not resolvable"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            labels: dest_annotation.labels().to_vec(),
            extents: dest_shape.extents,
            leaf_permutations,
        })
    }

    /// Destination labels.
    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Extent of each destination axis.
    #[inline]
    pub fn extents(&self) -> &[usize] {
        &self.extents
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.extents.len()
    }

    /// Number of destination tiles written.
    pub fn volume(&self) -> usize {
        self.extents.iter().product()
    }

    #[inline]
    pub fn num_leaves(&self) -> usize {
        self.leaf_permutations.len()
    }

    /// Axis permutation of the `n`-th leaf.
    ///
    /// # Panics
    /// Panics if `n >= self.num_leaves()`.
    #[inline]
    pub fn leaf_permutation(&self, n: usize) -> &[usize] {
        &self.leaf_permutations[n]
    }

    /// Tile index of the `n`-th leaf's block that feeds the destination tile
    /// at offset `rel` (destination axis order, relative to the block's
    /// lower bound).
    ///
    /// # Panics
    /// Panics if `n >= self.num_leaves()` or if `leaf_lower` is shorter than
    /// the leaf's rank.
    pub fn leaf_index(&self, n: usize, leaf_lower: &[usize], rel: &[usize]) -> Vec<usize> {
        let perm = &self.leaf_permutations[n];
        let mut index = leaf_lower.to_vec();
        for (d, &axis) in perm.iter().enumerate() {
            index[axis] += rel[d];
        }
        index
    }
}

/// Inverse of a permutation.
fn invert(perm: &[usize]) -> Vec<usize> {
    let mut inv = vec![0; perm.len()];
    for (i, &p) in perm.iter().enumerate() {
        inv[p] = i;
    }
    inv
}

/// Labels of a (sub)expression with the block extent each label spans.
struct LabeledShape {
    annotation: Annotation,
    extents: Vec<usize>,
}

impl LabeledShape {
    fn of_block<A: DistributedArray>(block: &BlockView<'_, A>) -> Self {
        Self {
            annotation: block.annotation().clone(),
            extents: block.extents(),
        }
    }

    fn of_expr<A: DistributedArray>(expr: &BlockExpr<'_, A>) -> Result<Self> {
        match expr {
            BlockExpr::Block(b) => Self::of_leaf(b),
            BlockExpr::Scaled(s) => Self::of_leaf(s.block()),
            BlockExpr::Add(l, r) | BlockExpr::Sub(l, r) | BlockExpr::Mul(l, r) => {
                let left = Self::of_expr(l)?;
                let right = Self::of_expr(r)?;
                left.expect_match(&right)?;
                Ok(left)
            }
        }
    }

    fn of_leaf<A: DistributedArray>(block: &BlockView<'_, A>) -> Result<Self> {
        block.annotation().check_labels()?;
        if block.annotation().len() != block.rank() {
            return Err(BlockExprError::RankMismatch {
                expected: block.rank(),
                found: block.annotation().len(),
            });
        }
        Ok(Self::of_block(block))
    }

    /// `other` must carry the same labels with the same extents.
    fn expect_match(&self, other: &LabeledShape) -> Result<()> {
        if self.annotation.len() != other.annotation.len() {
            return Err(BlockExprError::RankMismatch {
                expected: self.annotation.len(),
                found: other.annotation.len(),
            });
        }
        if !self.annotation.same_labels(&other.annotation) {
            return Err(other.annotation.invalid(format!(
                "labels do not match \"{}\"",
                self.annotation
            )));
        }
        for (label, &found) in other.annotation.labels().iter().zip(&other.extents) {
            let Some(pos) = self.annotation.position(label) else {
                continue;
            };
            let expected = self.extents[pos];
            if expected != found {
                return Err(BlockExprError::ExtentMismatch {
                    label: label.clone(),
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }
}

impl<'a, A: DistributedArray> BlockView<'a, A> {
    /// Evaluate `expr` into this block.
    ///
    /// Only the tiles inside `[lower, upper)` are written. Labels shared
    /// between `expr` and this block denote the same index and may be
    /// permuted. Fails with `RankMismatch` or `InvalidAnnotation` when the
    /// labels cannot be matched and with `ExtentMismatch` when a label spans
    /// blocks of different sizes. Do not retry a failed assignment in place:
    /// the destination may be partially written.
    pub fn assign<E, G>(&self, expr: E, engine: &G) -> Result<()>
    where
        E: Into<BlockExpr<'a, A>>,
        G: BlockEngine<A> + ?Sized,
    {
        let expr = expr.into();
        let plan = AssignmentPlan::resolve(&expr, self)?;
        if trace_enabled() {
            eprintln!(
                "BlockView::assign: dest=\"{}\" [{:?}, {:?}) leaves={} volume={}",
                self.annotation(),
                self.lower_bound(),
                self.upper_bound(),
                plan.num_leaves(),
                plan.volume()
            );
        }
        engine.evaluate_into(&plan, &expr, self)
    }

    /// `self = self + expr`.
    pub fn assign_add<E, G>(&self, expr: E, engine: &G) -> Result<()>
    where
        E: Into<BlockExpr<'a, A>>,
        G: BlockEngine<A> + ?Sized,
    {
        self.assign(BlockExpr::plus(self.clone(), expr), engine)
    }

    /// `self = self - expr`.
    pub fn assign_sub<E, G>(&self, expr: E, engine: &G) -> Result<()>
    where
        E: Into<BlockExpr<'a, A>>,
        G: BlockEngine<A> + ?Sized,
    {
        self.assign(BlockExpr::minus(self.clone(), expr), engine)
    }

    /// `self = self . expr` (element-wise).
    pub fn assign_mul<E, G>(&self, expr: E, engine: &G) -> Result<()>
    where
        E: Into<BlockExpr<'a, A>>,
        G: BlockEngine<A> + ?Sized,
    {
        self.assign(BlockExpr::hadamard(self.clone(), expr), engine)
    }
}
