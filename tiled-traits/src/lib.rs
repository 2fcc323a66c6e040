//! Shared traits for the tiled-rs workspace.
//!
//! This crate provides the scalar bounds and the element-operation group
//! shared by `tiled-expr` and external tile backends. Backends can depend on
//! `tiled-traits` to implement [`Conjugate`] for their own element types
//! without orphan rule violations.

pub mod element_op;
pub mod scalar;

pub use element_op::ElementOp;
pub use scalar::{Conjugate, Scalar};
