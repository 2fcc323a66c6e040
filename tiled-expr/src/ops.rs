//! Operator overloads for block expressions.
//!
//! | Expression | Result |
//! |---|---|
//! | `view * s`, `s * view` | `Scaled(view, Identity, s)` |
//! | `Scaled(view, op, s1) * s2`, `s2 * Scaled(...)` | `Scaled(view, op, s1 * s2)` |
//! | `-view` | `Scaled(view, Identity, -1)` |
//! | `-Scaled(view, op, s)` | `Scaled(view, op, -s)` |
//! | `a + b`, `a - b` | `BlockExpr::Add`, `BlockExpr::Sub` |
//!
//! Right-hand scalars have the array's scalar type. Left-hand scalars are
//! supported for `f32`, `f64`, `Complex32` and `Complex64`. The element-wise
//! product of two expressions is [`BlockExpr::hadamard`]; `*` between two
//! expressions is not overloaded since `*` with a scalar already is.

use std::ops::{Add, Mul, Neg, Sub};

use num_complex::{Complex32, Complex64};
use num_traits::One;

use crate::array::DistributedArray;
use crate::block::{BlockView, ScaledBlockView};
use crate::expr::BlockExpr;

// ============================================================================
// Scalar multiplication
// ============================================================================

impl<'a, A: DistributedArray> Mul<A::Scalar> for BlockView<'a, A> {
    type Output = ScaledBlockView<'a, A>;

    fn mul(self, factor: A::Scalar) -> ScaledBlockView<'a, A> {
        self.scale(factor)
    }
}

impl<'a, A: DistributedArray> Mul<A::Scalar> for ScaledBlockView<'a, A> {
    type Output = ScaledBlockView<'a, A>;

    fn mul(self, factor: A::Scalar) -> ScaledBlockView<'a, A> {
        self.scale(factor)
    }
}

impl<'a, A: DistributedArray> Mul<A::Scalar> for BlockExpr<'a, A> {
    type Output = BlockExpr<'a, A>;

    fn mul(self, factor: A::Scalar) -> BlockExpr<'a, A> {
        self.scale(factor)
    }
}

macro_rules! impl_scalar_lhs_mul {
    ($($t:ty),*) => {
        $(
            impl<'a, A: DistributedArray<Scalar = $t>> Mul<BlockView<'a, A>> for $t {
                type Output = ScaledBlockView<'a, A>;

                fn mul(self, block: BlockView<'a, A>) -> ScaledBlockView<'a, A> {
                    block.scale(self)
                }
            }

            impl<'a, A: DistributedArray<Scalar = $t>> Mul<ScaledBlockView<'a, A>> for $t {
                type Output = ScaledBlockView<'a, A>;

                fn mul(self, scaled: ScaledBlockView<'a, A>) -> ScaledBlockView<'a, A> {
                    scaled.scale(self)
                }
            }

            impl<'a, A: DistributedArray<Scalar = $t>> Mul<BlockExpr<'a, A>> for $t {
                type Output = BlockExpr<'a, A>;

                fn mul(self, expr: BlockExpr<'a, A>) -> BlockExpr<'a, A> {
                    expr.scale(self)
                }
            }
        )*
    };
}

impl_scalar_lhs_mul!(f32, f64, Complex32, Complex64);

// ============================================================================
// Negation
// ============================================================================

impl<'a, A: DistributedArray> Neg for BlockView<'a, A> {
    type Output = ScaledBlockView<'a, A>;

    fn neg(self) -> ScaledBlockView<'a, A> {
        self.scale(-A::Scalar::one())
    }
}

impl<'a, A: DistributedArray> Neg for ScaledBlockView<'a, A> {
    type Output = ScaledBlockView<'a, A>;

    fn neg(self) -> ScaledBlockView<'a, A> {
        self.negate()
    }
}

impl<'a, A: DistributedArray> Neg for BlockExpr<'a, A> {
    type Output = BlockExpr<'a, A>;

    fn neg(self) -> BlockExpr<'a, A> {
        self.negate()
    }
}

// ============================================================================
// Addition and subtraction
// ============================================================================

macro_rules! impl_additive_ops {
    ($($lhs:ident),*) => {
        $(
            impl<'a, A, R> Add<R> for $lhs<'a, A>
            where
                A: DistributedArray,
                R: Into<BlockExpr<'a, A>>,
            {
                type Output = BlockExpr<'a, A>;

                fn add(self, rhs: R) -> BlockExpr<'a, A> {
                    BlockExpr::plus(self, rhs)
                }
            }

            impl<'a, A, R> Sub<R> for $lhs<'a, A>
            where
                A: DistributedArray,
                R: Into<BlockExpr<'a, A>>,
            {
                type Output = BlockExpr<'a, A>;

                fn sub(self, rhs: R) -> BlockExpr<'a, A> {
                    BlockExpr::minus(self, rhs)
                }
            }
        )*
    };
}

impl_additive_ops!(BlockView, ScaledBlockView, BlockExpr);
