//! Block expressions and process maps for distributed tiled arrays.
//!
//! `tiled-rs` bundles the workspace crates behind one dependency:
//!
//! - [`traits`] (`tiled-traits`): [`Scalar`] bounds and the [`ElementOp`] group
//! - [`pmap`] (`tiled-pmap`): [`ProcessGroup`], [`HashPmap`] and the [`Pmap`] trait
//! - [`expr`] (`tiled-expr`): [`BlockView`], [`ScaledBlockView`], [`BlockExpr`]
//!   and terminal assignment through a [`BlockEngine`]
//!
//! # Example
//!
//! ```rust
//! use tiled_rs::{BlockView, HashPmap, LocalArray, LocalEngine, ProcessGroup, TileRange};
//! use tiled_rs::pmap::derive_seed;
//!
//! // Which tiles of a 4x4 tiling does rank 2 of 3 own?
//! let group = ProcessGroup::new(2, 3).unwrap();
//! let mut pmap = HashPmap::new(group, 16);
//! pmap.set_seed(derive_seed(&[4, 4]));
//! assert!(pmap.iter().all(|&key| pmap.owner(key) == 2));
//!
//! // Copy a scaled, transposed sub-block.
//! let a = LocalArray::from_fn(TileRange::from_extents(&[4, 4]), |i| (i[0] * 4 + i[1]) as f64);
//! let b = LocalArray::<f64>::zeros(TileRange::from_extents(&[4, 4]));
//! let src = BlockView::new(&a, "i,j", &[0, 0], &[2, 2]).unwrap();
//! let dst = BlockView::new(&b, "j,i", &[2, 2], &[4, 4]).unwrap();
//! dst.assign(0.5_f64 * src, &LocalEngine).unwrap();
//! assert_eq!(b.get(&[2, 3]), Some(2.0));
//! assert_eq!(b.get(&[3, 2]), Some(0.5));
//! ```
//!
//! # Features
//!
//! - `parallel` (default): scan the key space with rayon in
//!   [`HashPmap::set_seed`] for large maps
//! - `unchecked`: skip block-range validation in [`BlockView::new`]
//!
//! Set `TILED_TRACE=1` to print seeding and assignment trace lines to stderr.

pub use tiled_expr as expr;
pub use tiled_pmap as pmap;
pub use tiled_traits as traits;

pub use tiled_expr::{
    Annotation, AssignmentPlan, BlockEngine, BlockExpr, BlockExprError, BlockRangeKind,
    BlockView, CollectingSink, DiagnosticSink, DistributedArray, LocalArray, LocalEngine,
    RankGatedSink, ScaledBlockView, SilentSink, StderrSink, TileRange, TraceSink,
};
pub use tiled_pmap::{HashPmap, Pmap, PmapError, ProcessGroup};
pub use tiled_traits::{Conjugate, ElementOp, Scalar};
