//! Expression trees over block views.

use num_traits::One;
use tiled_traits::ElementOp;

use crate::array::DistributedArray;
use crate::block::{BlockView, ScaledBlockView};

/// A lazy expression over labeled blocks.
///
/// The set of node kinds is closed. Scaling, negation and conjugation are
/// folded into the leaves, so a tree never contains a separate scale node:
/// `s * (a + b)` becomes `s*a + s*b` and `s * (a . b)` becomes `(s*a) . b`.
/// `Mul` is the element-wise (Hadamard) product over matching labels.
pub enum BlockExpr<'a, A: DistributedArray> {
    Block(BlockView<'a, A>),
    Scaled(ScaledBlockView<'a, A>),
    Add(Box<BlockExpr<'a, A>>, Box<BlockExpr<'a, A>>),
    Sub(Box<BlockExpr<'a, A>>, Box<BlockExpr<'a, A>>),
    Mul(Box<BlockExpr<'a, A>>, Box<BlockExpr<'a, A>>),
}

impl<A: DistributedArray> Clone for BlockExpr<'_, A> {
    fn clone(&self) -> Self {
        match self {
            BlockExpr::Block(b) => BlockExpr::Block(b.clone()),
            BlockExpr::Scaled(s) => BlockExpr::Scaled(s.clone()),
            BlockExpr::Add(l, r) => BlockExpr::Add(l.clone(), r.clone()),
            BlockExpr::Sub(l, r) => BlockExpr::Sub(l.clone(), r.clone()),
            BlockExpr::Mul(l, r) => BlockExpr::Mul(l.clone(), r.clone()),
        }
    }
}

impl<A: DistributedArray> std::fmt::Debug for BlockExpr<'_, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockExpr::Block(b) => b.fmt(f),
            BlockExpr::Scaled(s) => s.fmt(f),
            BlockExpr::Add(l, r) => f.debug_tuple("Add").field(l).field(r).finish(),
            BlockExpr::Sub(l, r) => f.debug_tuple("Sub").field(l).field(r).finish(),
            BlockExpr::Mul(l, r) => f.debug_tuple("Mul").field(l).field(r).finish(),
        }
    }
}

/// A leaf of an expression as seen by an evaluator: the block and how its
/// values are read.
#[derive(Debug)]
pub struct Leaf<'e, 'a, A: DistributedArray> {
    pub block: &'e BlockView<'a, A>,
    pub op: ElementOp,
    pub factor: A::Scalar,
}

impl<'a, A: DistributedArray> BlockExpr<'a, A> {
    /// `left + right`.
    pub fn plus(left: impl Into<Self>, right: impl Into<Self>) -> Self {
        BlockExpr::Add(Box::new(left.into()), Box::new(right.into()))
    }

    /// `left - right`.
    pub fn minus(left: impl Into<Self>, right: impl Into<Self>) -> Self {
        BlockExpr::Sub(Box::new(left.into()), Box::new(right.into()))
    }

    /// Element-wise product `left . right`.
    pub fn hadamard(left: impl Into<Self>, right: impl Into<Self>) -> Self {
        BlockExpr::Mul(Box::new(left.into()), Box::new(right.into()))
    }

    /// Multiply the whole expression by `factor`.
    pub fn scale(self, factor: A::Scalar) -> Self {
        match self {
            BlockExpr::Block(b) => BlockExpr::Scaled(b.scale(factor)),
            BlockExpr::Scaled(s) => BlockExpr::Scaled(s.scale(factor)),
            BlockExpr::Add(l, r) => BlockExpr::Add(
                Box::new(l.scale(factor)),
                Box::new(r.scale(factor)),
            ),
            BlockExpr::Sub(l, r) => BlockExpr::Sub(
                Box::new(l.scale(factor)),
                Box::new(r.scale(factor)),
            ),
            BlockExpr::Mul(l, r) => BlockExpr::Mul(Box::new(l.scale(factor)), r),
        }
    }

    /// Negate the whole expression.
    pub fn negate(self) -> Self {
        match self {
            BlockExpr::Block(b) => BlockExpr::Scaled(-b),
            BlockExpr::Scaled(s) => BlockExpr::Scaled(s.negate()),
            BlockExpr::Add(l, r) => BlockExpr::Add(Box::new(l.negate()), Box::new(r.negate())),
            BlockExpr::Sub(l, r) => BlockExpr::Sub(Box::new(l.negate()), Box::new(r.negate())),
            BlockExpr::Mul(l, r) => BlockExpr::Mul(Box::new(l.negate()), r),
        }
    }

    /// Complex conjugate of the whole expression.
    pub fn conj(self) -> Self {
        match self {
            BlockExpr::Block(b) => BlockExpr::Scaled(b.conj()),
            BlockExpr::Scaled(s) => BlockExpr::Scaled(s.conj()),
            BlockExpr::Add(l, r) => BlockExpr::Add(Box::new(l.conj()), Box::new(r.conj())),
            BlockExpr::Sub(l, r) => BlockExpr::Sub(Box::new(l.conj()), Box::new(r.conj())),
            BlockExpr::Mul(l, r) => BlockExpr::Mul(Box::new(l.conj()), Box::new(r.conj())),
        }
    }

    /// Leaves in depth-first, left-to-right order.
    pub fn leaves(&self) -> Vec<Leaf<'_, 'a, A>> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'e>(&'e self, out: &mut Vec<Leaf<'e, 'a, A>>) {
        match self {
            BlockExpr::Block(b) => out.push(Leaf {
                block: b,
                op: ElementOp::Identity,
                factor: A::Scalar::one(),
            }),
            BlockExpr::Scaled(s) => out.push(Leaf {
                block: s.block(),
                op: s.op(),
                factor: s.factor(),
            }),
            BlockExpr::Add(l, r) | BlockExpr::Sub(l, r) | BlockExpr::Mul(l, r) => {
                l.collect_leaves(out);
                r.collect_leaves(out);
            }
        }
    }

    /// Number of leaves.
    pub fn num_leaves(&self) -> usize {
        match self {
            BlockExpr::Block(_) | BlockExpr::Scaled(_) => 1,
            BlockExpr::Add(l, r) | BlockExpr::Sub(l, r) | BlockExpr::Mul(l, r) => {
                l.num_leaves() + r.num_leaves()
            }
        }
    }

    /// The single block of a leaf expression.
    pub fn as_block(&self) -> Option<&BlockView<'a, A>> {
        match self {
            BlockExpr::Block(b) => Some(b),
            BlockExpr::Scaled(s) => s.as_plain(),
            _ => None,
        }
    }
}

impl<'a, A: DistributedArray> From<BlockView<'a, A>> for BlockExpr<'a, A> {
    fn from(b: BlockView<'a, A>) -> Self {
        BlockExpr::Block(b)
    }
}

impl<'a, A: DistributedArray> From<&BlockView<'a, A>> for BlockExpr<'a, A> {
    fn from(b: &BlockView<'a, A>) -> Self {
        BlockExpr::Block(b.clone())
    }
}

impl<'a, A: DistributedArray> From<ScaledBlockView<'a, A>> for BlockExpr<'a, A> {
    fn from(s: ScaledBlockView<'a, A>) -> Self {
        BlockExpr::Scaled(s)
    }
}

impl<'a, A: DistributedArray> From<&ScaledBlockView<'a, A>> for BlockExpr<'a, A> {
    fn from(s: &ScaledBlockView<'a, A>) -> Self {
        BlockExpr::Scaled(s.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::TileRange;
    use crate::local::LocalArray;
    use num_complex::Complex64;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_leaves_order() {
        let a = LocalArray::<f64>::zeros(TileRange::from_extents(&[3]));
        let x = BlockView::new(&a, "i", &[0], &[1]).unwrap();
        let y = BlockView::new(&a, "i", &[1], &[2]).unwrap();
        let z = BlockView::new(&a, "i", &[2], &[3]).unwrap();
        let e = BlockExpr::minus(BlockExpr::plus(x.clone(), y.scale(2.0)), z.clone());
        let leaves = e.leaves();
        assert_eq!(e.num_leaves(), 3);
        assert!(leaves[0].block.same_block(&x));
        assert_eq!(leaves[1].factor, 2.0);
        assert!(leaves[2].block.same_block(&z));
    }

    #[test]
    fn test_scale_distributes_over_add() {
        let a = LocalArray::<f64>::zeros(TileRange::from_extents(&[2]));
        let x = BlockView::new(&a, "i", &[0], &[2]).unwrap();
        let e = BlockExpr::plus(x.clone(), x.scale(3.0)).scale(2.0);
        let factors: Vec<f64> = e.leaves().iter().map(|l| l.factor).collect();
        assert_eq!(factors, vec![2.0, 6.0]);
    }

    #[test]
    fn test_scale_touches_one_hadamard_operand() {
        let a = LocalArray::<f64>::zeros(TileRange::from_extents(&[2]));
        let x = BlockView::new(&a, "i", &[0], &[2]).unwrap();
        let e = BlockExpr::hadamard(x.clone(), x.clone()).scale(5.0).negate();
        let factors: Vec<f64> = e.leaves().iter().map(|l| l.factor).collect();
        assert_eq!(factors, vec![-5.0, 1.0]);
    }

    #[test]
    fn test_conj_distributes() {
        let a = LocalArray::<Complex64>::zeros(TileRange::from_extents(&[2]));
        let x = BlockView::new(&a, "i", &[0], &[2]).unwrap();
        let e = BlockExpr::minus(x.scale(c(0.0, 1.0)), x.conj()).conj();
        let leaves = e.leaves();
        assert_eq!(leaves[0].op, ElementOp::Conj);
        assert_eq!(leaves[0].factor, c(0.0, -1.0));
        assert_eq!(leaves[1].op, ElementOp::Identity);
        assert_eq!(leaves[1].factor, c(1.0, 0.0));
    }

    #[test]
    fn test_as_block() {
        let a = LocalArray::<f64>::zeros(TileRange::from_extents(&[2]));
        let x = BlockView::new(&a, "i", &[0], &[2]).unwrap();
        assert!(BlockExpr::from(&x).as_block().is_some());
        assert!(BlockExpr::from(x.scale(2.0)).as_block().is_none());
        assert!(BlockExpr::plus(&x, &x).as_block().is_none());
    }
}
