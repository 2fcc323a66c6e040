//! Labeled sub-block views of a distributed array.
//!
//! - [`BlockView`]: `array("i,j").block(lower, upper)`, a lazy reference to a
//!   box of tiles
//! - [`ScaledBlockView`]: a block together with an element operation
//!   (identity or conjugation) and a numeric factor
//!
//! Both are immutable values. Cloning copies a reference and two
//! reference-counted bound vectors; no tile data is touched.

use std::sync::Arc;

use num_traits::One;
use tiled_traits::{Conjugate, ElementOp};

use crate::annotation::Annotation;
use crate::array::{DistributedArray, TileRange};
use crate::diagnostics::{DiagnosticSink, TraceSink};
use crate::error::BlockRangeKind;
use crate::{BlockExprError, Result};

// ============================================================================
// Validation
// ============================================================================

/// Check a block against its array, reporting the first failure to `sink`.
#[cfg_attr(feature = "unchecked", allow(dead_code))]
fn check_valid<A: DistributedArray>(
    array: &A,
    annotation: &Annotation,
    lower: &[usize],
    upper: &[usize],
    sink: &dyn DiagnosticSink,
) -> Result<()> {
    let result = validate(array, annotation, lower, upper);
    if let Err(ref err) = result {
        sink.report(err);
    }
    result
}

#[cfg_attr(feature = "unchecked", allow(dead_code))]
fn validate<A: DistributedArray>(
    array: &A,
    annotation: &Annotation,
    lower: &[usize],
    upper: &[usize],
) -> Result<()> {
    let rank = array.rank();
    let range_error = |kind| BlockExprError::InvalidBlockRange {
        kind,
        array: array.tiles(),
        lower: lower.to_vec(),
        upper: upper.to_vec(),
    };

    annotation.validate(rank)?;
    if lower.len() != rank {
        return Err(range_error(BlockRangeKind::LowerRankMismatch));
    }
    if upper.len() != rank {
        return Err(range_error(BlockRangeKind::UpperRankMismatch));
    }

    let lower_check = lower.iter().zip(array.lobound()).all(|(l, r)| l >= r);
    let upper_check = upper.iter().zip(array.upbound()).all(|(u, r)| u <= r);
    if !(lower_check && upper_check) {
        return Err(range_error(BlockRangeKind::OutOfBounds));
    }

    if !lower.iter().zip(upper).all(|(l, u)| l < u) {
        return Err(range_error(BlockRangeKind::EmptyOrInverted));
    }
    Ok(())
}

// ============================================================================
// BlockView
// ============================================================================

/// A labeled block `[lower, upper)` of an array's tiles.
pub struct BlockView<'a, A: DistributedArray> {
    array: &'a A,
    annotation: Annotation,
    lower: Arc<[usize]>,
    upper: Arc<[usize]>,
}

impl<A: DistributedArray> Clone for BlockView<'_, A> {
    fn clone(&self) -> Self {
        Self {
            array: self.array,
            annotation: self.annotation.clone(),
            lower: self.lower.clone(),
            upper: self.upper.clone(),
        }
    }
}

impl<A: DistributedArray> std::fmt::Debug for BlockView<'_, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockView")
            .field("annotation", &self.annotation.to_string())
            .field("lower", &self.lower)
            .field("upper", &self.upper)
            .finish()
    }
}

impl<'a, A: DistributedArray> BlockView<'a, A> {
    /// Create a block view, reporting validation failures to the
    /// `TILED_TRACE`-gated [`TraceSink`].
    ///
    /// Checks, in order: the annotation has one distinct label per
    /// dimension; `lower` and `upper` have one entry per dimension; the
    /// block lies inside the array's tile range; every dimension is
    /// non-empty. With the `unchecked` feature no check is made.
    pub fn new(
        array: &'a A,
        annotation: impl Into<Annotation>,
        lower: &[usize],
        upper: &[usize],
    ) -> Result<Self> {
        Self::with_sink(array, annotation, lower, upper, &TraceSink)
    }

    /// Create a block view, reporting validation failures to `sink`.
    pub fn with_sink(
        array: &'a A,
        annotation: impl Into<Annotation>,
        lower: &[usize],
        upper: &[usize],
        sink: &dyn DiagnosticSink,
    ) -> Result<Self> {
        let annotation = annotation.into();
        #[cfg(not(feature = "unchecked"))]
        check_valid(array, &annotation, lower, upper, sink)?;
        #[cfg(feature = "unchecked")]
        let _ = sink;
        Ok(Self {
            array,
            annotation,
            lower: Arc::from(lower),
            upper: Arc::from(upper),
        })
    }

    /// Create a block view without validation.
    ///
    /// The caller guarantees the invariants checked by [`new`](Self::new);
    /// a malformed block leads to unspecified results at assignment.
    pub fn new_unchecked(
        array: &'a A,
        annotation: impl Into<Annotation>,
        lower: &[usize],
        upper: &[usize],
    ) -> Self {
        Self {
            array,
            annotation: annotation.into(),
            lower: Arc::from(lower),
            upper: Arc::from(upper),
        }
    }

    /// A block covering the whole array.
    pub fn full(array: &'a A, annotation: impl Into<Annotation>) -> Result<Self> {
        let lower = array.lobound().to_vec();
        let upper = array.upbound().to_vec();
        Self::new(array, annotation, &lower, &upper)
    }

    #[inline]
    pub fn array(&self) -> &'a A {
        self.array
    }

    #[inline]
    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    #[inline]
    pub fn lower_bound(&self) -> &[usize] {
        &self.lower
    }

    #[inline]
    pub fn upper_bound(&self) -> &[usize] {
        &self.upper
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.lower.len()
    }

    /// Number of tiles per dimension of the block.
    pub fn extents(&self) -> Vec<usize> {
        self.lower
            .iter()
            .zip(self.upper.iter())
            .map(|(l, u)| u.saturating_sub(*l))
            .collect()
    }

    /// The block as a tile range.
    pub fn range(&self) -> TileRange {
        TileRange::new(&self.lower, &self.upper)
    }

    /// Whether both views denote the same array, labels and bounds.
    pub fn same_block(&self, other: &BlockView<'_, A>) -> bool {
        std::ptr::eq(self.array, other.array)
            && self.annotation == other.annotation
            && self.lower == other.lower
            && self.upper == other.upper
    }

    /// `factor * self`.
    pub fn scale(&self, factor: A::Scalar) -> ScaledBlockView<'a, A> {
        ScaledBlockView::new(self.clone(), ElementOp::Identity, factor)
    }

    /// Complex conjugate of the block, with unit factor.
    pub fn conj(&self) -> ScaledBlockView<'a, A> {
        ScaledBlockView::new(self.clone(), ElementOp::Conj, A::Scalar::one())
    }
}

// ============================================================================
// ScaledBlockView
// ============================================================================

/// A block whose tile values are read as `factor * op(x)`.
pub struct ScaledBlockView<'a, A: DistributedArray> {
    block: BlockView<'a, A>,
    op: ElementOp,
    factor: A::Scalar,
}

impl<A: DistributedArray> Clone for ScaledBlockView<'_, A> {
    fn clone(&self) -> Self {
        Self {
            block: self.block.clone(),
            op: self.op,
            factor: self.factor,
        }
    }
}

impl<A: DistributedArray> std::fmt::Debug for ScaledBlockView<'_, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScaledBlockView")
            .field("block", &self.block)
            .field("op", &self.op)
            .field("factor", &self.factor)
            .finish()
    }
}

impl<'a, A: DistributedArray> ScaledBlockView<'a, A> {
    pub fn new(block: BlockView<'a, A>, op: ElementOp, factor: A::Scalar) -> Self {
        Self { block, op, factor }
    }

    #[inline]
    pub fn block(&self) -> &BlockView<'a, A> {
        &self.block
    }

    #[inline]
    pub fn array(&self) -> &'a A {
        self.block.array()
    }

    #[inline]
    pub fn annotation(&self) -> &Annotation {
        self.block.annotation()
    }

    #[inline]
    pub fn lower_bound(&self) -> &[usize] {
        self.block.lower_bound()
    }

    #[inline]
    pub fn upper_bound(&self) -> &[usize] {
        self.block.upper_bound()
    }

    #[inline]
    pub fn factor(&self) -> A::Scalar {
        self.factor
    }

    #[inline]
    pub fn op(&self) -> ElementOp {
        self.op
    }

    #[inline]
    pub fn is_conjugated(&self) -> bool {
        self.op.is_conj()
    }

    /// Fold another factor into this one: `op` is kept, factors multiply.
    pub fn scale(&self, factor: A::Scalar) -> Self {
        Self::new(self.block.clone(), self.op, self.factor * factor)
    }

    /// Negate the factor.
    pub fn negate(&self) -> Self {
        Self::new(self.block.clone(), self.op, -self.factor)
    }

    /// Complex conjugate.
    ///
    /// `conj(s * x)` is `conj(s) * conj(x)`; `conj(s * conj(x))` is
    /// `conj(s) * x`, so a double conjugation leaves a plain scaled block.
    pub fn conj(&self) -> Self {
        Self::new(
            self.block.clone(),
            self.op.compose(ElementOp::Conj),
            self.factor.conj(),
        )
    }

    /// The bare block, if this view neither conjugates nor scales.
    pub fn as_plain(&self) -> Option<&BlockView<'a, A>> {
        if self.op.is_identity() && self.factor == A::Scalar::one() {
            Some(&self.block)
        } else {
            None
        }
    }

    /// Value of a tile element `x` read through this view.
    #[inline]
    pub fn apply(&self, x: A::Scalar) -> A::Scalar {
        self.factor * self.op.apply(x)
    }
}

impl<'a, A: DistributedArray> From<BlockView<'a, A>> for ScaledBlockView<'a, A> {
    fn from(block: BlockView<'a, A>) -> Self {
        ScaledBlockView::new(block, ElementOp::Identity, A::Scalar::one())
    }
}
