//! Lazy block expressions over tiled arrays.
//!
//! A block expression names a box of tiles of an array, labels its
//! dimensions, and optionally scales and/or conjugates it. Expressions are
//! plain values: building, scaling, negating and conjugating them has no side
//! effects. Only [`BlockView::assign`] (and its compound forms) evaluates an
//! expression, through a [`BlockEngine`], into a destination block.
//!
//! # Core Types
//!
//! - [`DistributedArray`]: bound introspection of the viewed array
//! - [`Annotation`]: comma separated index labels, e.g. `"i,j"`
//! - [`BlockView`] / [`ScaledBlockView`]: labeled blocks, plain or scaled
//! - [`BlockExpr`]: expression tree over blocks
//! - [`AssignmentPlan`] / [`BlockEngine`]: label resolution and evaluation
//! - [`LocalArray`] / [`LocalEngine`]: single-process reference backend
//!
//! # Example
//!
//! ```rust
//! use tiled_expr::{BlockView, LocalArray, LocalEngine, TileRange};
//!
//! let a = LocalArray::from_fn(TileRange::from_extents(&[4, 4]), |i| (4 * i[0] + i[1]) as f64);
//! let b = LocalArray::<f64>::zeros(TileRange::from_extents(&[4, 4]));
//!
//! // b(1:3, 1:3)("j,i") = -2 * a(0:2, 2:4)("i,j")
//! let src = BlockView::new(&a, "i,j", &[0, 2], &[2, 4]).unwrap();
//! let dst = BlockView::new(&b, "j,i", &[1, 1], &[3, 3]).unwrap();
//! dst.assign(-(src * 2.0), &LocalEngine).unwrap();
//!
//! assert_eq!(b.get(&[1, 1]), Some(-4.0)); // -2 * a[0, 2]
//! assert_eq!(b.get(&[1, 2]), Some(-12.0)); // -2 * a[1, 2]
//! assert_eq!(b.get(&[0, 0]), Some(0.0)); // outside the block
//! ```
//!
//! # Validation
//!
//! Block construction checks the annotation and the bounds against the
//! array. Building with the `unchecked` feature compiles these checks out;
//! malformed blocks then yield unspecified results instead of errors.
//! Label mismatches between operands are always detected at assignment.

pub mod annotation;
pub mod array;
pub mod assign;
pub mod block;
pub mod diagnostics;
pub mod error;
pub mod expr;
pub mod local;
mod ops;

pub use annotation::Annotation;
pub use array::{DistributedArray, TileRange};
pub use assign::{AssignmentPlan, BlockEngine};
pub use block::{BlockView, ScaledBlockView};
pub use diagnostics::{
    CollectingSink, DiagnosticSink, RankGatedSink, SilentSink, StderrSink, TraceSink,
};
pub use error::{BlockExprError, BlockRangeKind, Result};
pub use expr::{BlockExpr, Leaf};
pub use local::{LocalArray, LocalEngine};
pub use tiled_traits::{Conjugate, ElementOp, Scalar};
