use crate::array::TileRange;

/// Why a block range was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockRangeKind {
    /// The lower bound has a different length than the array rank.
    LowerRankMismatch,
    /// The upper bound has a different length than the array rank.
    UpperRankMismatch,
    /// The block is not a sub-block of the array's tile range.
    OutOfBounds,
    /// Some dimension has `lower >= upper`.
    EmptyOrInverted,
}

impl std::fmt::Display for BlockRangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            BlockRangeKind::LowerRankMismatch => {
                "the size of the lower bound is not equal to the rank of the array"
            }
            BlockRangeKind::UpperRankMismatch => {
                "the size of the upper bound is not equal to the rank of the array"
            }
            BlockRangeKind::OutOfBounds => "the block range is not a sub-block of the array range",
            BlockRangeKind::EmptyOrInverted => {
                "the block lower bound is not less than the upper bound"
            }
        };
        f.write_str(msg)
    }
}

/// Errors that can occur while building or assigning block expressions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockExprError {
    #[error("invalid block range: {kind}: array range = {array}, block range = [ {lower:?} , {upper:?} )")]
    InvalidBlockRange {
        kind: BlockRangeKind,
        array: TileRange,
        lower: Vec<usize>,
        upper: Vec<usize>,
    },

    #[error("invalid annotation \"{annotation}\": {reason}")]
    InvalidAnnotation { annotation: String, reason: String },

    #[error("rank mismatch: expected {expected}, found {found}")]
    RankMismatch { expected: usize, found: usize },

    #[error("extent mismatch for label '{label}': {expected} vs {found}")]
    ExtentMismatch {
        label: String,
        expected: usize,
        found: usize,
    },

    #[error("evaluation failed: {0}")]
    Evaluation(String),
}

impl BlockExprError {
    /// The block range sub-kind, if this is an `InvalidBlockRange` error.
    pub fn block_range_kind(&self) -> Option<BlockRangeKind> {
        match self {
            BlockExprError::InvalidBlockRange { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Convenience alias for `Result<T, BlockExprError>`.
pub type Result<T> = std::result::Result<T, BlockExprError>;
