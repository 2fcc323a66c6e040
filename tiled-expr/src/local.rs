//! Single-process reference backend.
//!
//! [`LocalArray`] is a tiled array in which every tile holds one scalar.
//! [`LocalEngine`] evaluates block expressions over such arrays. Together
//! they pin down the semantics a distributed engine must reproduce: which
//! tiles are written, how labels permute axes, and how factors and
//! conjugation apply.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tiled_traits::Scalar;

use crate::array::{DistributedArray, TileRange};
use crate::assign::{AssignmentPlan, BlockEngine};
use crate::block::BlockView;
use crate::expr::BlockExpr;
use crate::{BlockExprError, Result};

/// Row-major strides (last index varies fastest).
fn row_major_strides(extents: &[usize]) -> Vec<usize> {
    let rank = extents.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![1usize; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * extents[i + 1];
    }
    strides
}

/// Advance a row-major multi-index; returns `false` after the last index.
fn increment(index: &mut [usize], extents: &[usize]) -> bool {
    for d in (0..index.len()).rev() {
        index[d] += 1;
        if index[d] < extents[d] {
            return true;
        }
        index[d] = 0;
    }
    false
}

/// An in-memory tiled array with one scalar per tile.
///
/// Tiles are addressed by their global tile index, so a range that does not
/// start at the origin is addressed from its lower bound. Writes go through
/// interior mutability because block views only hold shared references.
#[derive(Debug)]
pub struct LocalArray<T> {
    range: TileRange,
    strides: Vec<usize>,
    data: RwLock<Vec<T>>,
}

impl<T: Scalar> LocalArray<T> {
    /// An array over `range` with every tile zero.
    pub fn zeros(range: TileRange) -> Self {
        let len = range.volume();
        Self::from_parts(range, vec![T::zero(); len])
    }

    /// An array over `range` whose tile at `index` holds `f(index)`.
    pub fn from_fn(range: TileRange, mut f: impl FnMut(&[usize]) -> T) -> Self {
        let extents = range.extents();
        let volume = range.volume();
        let mut data = Vec::with_capacity(volume);
        let mut rel = vec![0; range.rank()];
        let mut index = range.lower().to_vec();
        for _ in 0..volume {
            for (d, r) in rel.iter().enumerate() {
                index[d] = range.lower()[d] + r;
            }
            data.push(f(&index));
            increment(&mut rel, &extents);
        }
        Self::from_parts(range, data)
    }

    fn from_parts(range: TileRange, data: Vec<T>) -> Self {
        let strides = row_major_strides(&range.extents());
        Self {
            range,
            strides,
            data: RwLock::new(data),
        }
    }

    /// The array's tile range.
    pub fn range(&self) -> &TileRange {
        &self.range
    }

    fn offset(&self, index: &[usize]) -> Option<usize> {
        if !self.range.contains(index) {
            return None;
        }
        Some(
            index
                .iter()
                .zip(self.range.lower())
                .zip(&self.strides)
                .map(|((i, l), s)| (i - l) * s)
                .sum(),
        )
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.data
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Value of the tile at `index`, or `None` outside the range.
    pub fn get(&self, index: &[usize]) -> Option<T> {
        let offset = self.offset(index)?;
        Some(self.read()[offset])
    }

    /// Overwrite the tile at `index`.
    pub fn set(&self, index: &[usize], value: T) -> Result<()> {
        let offset = self.offset(index).ok_or_else(|| {
            BlockExprError::Evaluation(format!(
                "tile {index:?} outside array range {}",
                self.range
            ))
        })?;
        self.write()[offset] = value;
        Ok(())
    }

    /// All tiles in row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        self.read().clone()
    }

    /// Whether every tile equals zero.
    pub fn is_zero(&self) -> bool {
        self.read().iter().all(|x| x.is_zero())
    }
}

impl<T: Scalar> DistributedArray for LocalArray<T> {
    type Scalar = T;

    fn lobound(&self) -> &[usize] {
        self.range.lower()
    }

    fn upbound(&self) -> &[usize] {
        self.range.upper()
    }
}

/// Evaluates block expressions over [`LocalArray`]s.
///
/// Every destination value is computed before the first write, so an
/// expression may read the block it is assigned to.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalEngine;

impl LocalEngine {
    fn eval_at<T: Scalar>(
        expr: &BlockExpr<'_, LocalArray<T>>,
        plan: &AssignmentPlan,
        rel: &[usize],
        leaf: &mut usize,
    ) -> Result<T> {
        match expr {
            BlockExpr::Block(b) => Self::read_leaf(b, plan, rel, leaf),
            BlockExpr::Scaled(s) => Ok(s.apply(Self::read_leaf(s.block(), plan, rel, leaf)?)),
            BlockExpr::Add(l, r) => {
                let lhs = Self::eval_at(l, plan, rel, leaf)?;
                Ok(lhs + Self::eval_at(r, plan, rel, leaf)?)
            }
            BlockExpr::Sub(l, r) => {
                let lhs = Self::eval_at(l, plan, rel, leaf)?;
                Ok(lhs - Self::eval_at(r, plan, rel, leaf)?)
            }
            BlockExpr::Mul(l, r) => {
                let lhs = Self::eval_at(l, plan, rel, leaf)?;
                Ok(lhs * Self::eval_at(r, plan, rel, leaf)?)
            }
        }
    }

    fn read_leaf<T: Scalar>(
        block: &BlockView<'_, LocalArray<T>>,
        plan: &AssignmentPlan,
        rel: &[usize],
        leaf: &mut usize,
    ) -> Result<T> {
        let index = plan.leaf_index(*leaf, block.lower_bound(), rel);
        *leaf += 1;
        block.array().get(&index).ok_or_else(|| {
            BlockExprError::Evaluation(format!(
                "source tile {index:?} outside array range {}",
                block.array().range()
            ))
        })
    }
}

impl<T: Scalar> BlockEngine<LocalArray<T>> for LocalEngine {
    fn evaluate_into(
        &self,
        plan: &AssignmentPlan,
        expr: &BlockExpr<'_, LocalArray<T>>,
        dest: &BlockView<'_, LocalArray<T>>,
    ) -> Result<()> {
        let volume = plan.volume();
        let mut values = Vec::with_capacity(volume);
        let mut rel = vec![0; plan.rank()];
        for _ in 0..volume {
            let mut leaf = 0;
            values.push(Self::eval_at(expr, plan, &rel, &mut leaf)?);
            increment(&mut rel, plan.extents());
        }

        let array = dest.array();
        let lower = dest.lower_bound();
        let mut data = array.write();
        let mut index = lower.to_vec();
        for value in values {
            for (d, r) in rel.iter().enumerate() {
                index[d] = lower[d] + r;
            }
            let offset = array.offset(&index).ok_or_else(|| {
                BlockExprError::Evaluation(format!(
                    "destination tile {index:?} outside array range {}",
                    array.range()
                ))
            })?;
            data[offset] = value;
            increment(&mut rel, plan.extents());
        }
        Ok(())
    }
}
