//! The distributed-array capability consumed by block expressions.

use std::sync::Arc;

use tiled_traits::Scalar;

/// Bound introspection of a tiled array.
///
/// Block expressions only need to know the tile range of the array they
/// view; storage, distribution and arithmetic stay with the implementor.
/// Bounds are tile indices, `[lobound, upbound)` per dimension.
pub trait DistributedArray {
    /// Element type of the array's tiles.
    type Scalar: Scalar;

    /// Per-dimension lower tile bound (inclusive).
    fn lobound(&self) -> &[usize];

    /// Per-dimension upper tile bound (exclusive).
    fn upbound(&self) -> &[usize];

    /// Number of dimensions.
    fn rank(&self) -> usize {
        self.lobound().len()
    }

    /// The array's tile range as an owned value.
    fn tiles(&self) -> TileRange {
        TileRange::new(self.lobound(), self.upbound())
    }
}

/// A half-open box of tile indices, `[lower, upper)` per dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileRange {
    lower: Arc<[usize]>,
    upper: Arc<[usize]>,
}

impl TileRange {
    /// Create a tile range.
    ///
    /// # Panics
    /// Panics if `lower` and `upper` differ in length or if any
    /// `lower[i] > upper[i]`.
    pub fn new(lower: &[usize], upper: &[usize]) -> Self {
        assert_eq!(
            lower.len(),
            upper.len(),
            "tile range bounds must have the same rank"
        );
        assert!(
            lower.iter().zip(upper).all(|(l, u)| l <= u),
            "tile range lower bound exceeds upper bound"
        );
        Self {
            lower: Arc::from(lower),
            upper: Arc::from(upper),
        }
    }

    /// A range starting at the origin with the given extents.
    pub fn from_extents(extents: &[usize]) -> Self {
        let lower = vec![0; extents.len()];
        Self::new(&lower, extents)
    }

    #[inline]
    pub fn lower(&self) -> &[usize] {
        &self.lower
    }

    #[inline]
    pub fn upper(&self) -> &[usize] {
        &self.upper
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.lower.len()
    }

    /// Number of tiles per dimension.
    pub fn extents(&self) -> Vec<usize> {
        self.lower
            .iter()
            .zip(self.upper.iter())
            .map(|(l, u)| u - l)
            .collect()
    }

    /// Total number of tiles.
    pub fn volume(&self) -> usize {
        self.extents().iter().product()
    }

    /// Whether `index` lies inside the range.
    pub fn contains(&self, index: &[usize]) -> bool {
        index.len() == self.rank()
            && index
                .iter()
                .zip(self.lower.iter().zip(self.upper.iter()))
                .all(|(i, (l, u))| l <= i && i < u)
    }
}

impl std::fmt::Display for TileRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[ {:?} , {:?} )", &*self.lower, &*self.upper)
    }
}
