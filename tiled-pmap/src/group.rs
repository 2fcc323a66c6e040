use crate::{PmapError, Result};

/// Identity of the calling process among its peers.
///
/// This is the explicit replacement for an ambient "default world": every
/// component that needs to know who it is receives a `ProcessGroup` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessGroup {
    rank: usize,
    size: usize,
}

impl ProcessGroup {
    /// Create a group of `size` processes seen from process `rank`.
    pub fn new(rank: usize, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(PmapError::EmptyGroup);
        }
        if rank >= size {
            return Err(PmapError::RankOutOfRange { rank, size });
        }
        Ok(Self { rank, size })
    }

    /// A group containing only the calling process.
    pub fn single() -> Self {
        Self { rank: 0, size: 1 }
    }

    /// Rank of the calling process.
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Number of processes in the group.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Every rank of the group, in order.
    ///
    /// Handy for simulating all workers of a group in one process.
    pub fn peers(&self) -> impl Iterator<Item = ProcessGroup> {
        let size = self.size;
        (0..size).map(move |rank| ProcessGroup { rank, size })
    }
}

impl Default for ProcessGroup {
    fn default() -> Self {
        Self::single()
    }
}
