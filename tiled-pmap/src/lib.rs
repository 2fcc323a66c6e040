//! Communication-free process maps for tiled arrays.
//!
//! Every worker of a distributed array computes, locally and without any
//! message exchange, which process owns each tile index. The map is a pure
//! function of `(seed, key, procs)`, so all workers agree on the assignment
//! as long as they agree on the seed.
//!
//! # Core Types
//!
//! - [`ProcessGroup`]: the calling process's rank and the number of peers
//! - [`Pmap`]: object-safe query surface shared by process maps
//! - [`HashPmap`]: seeded-hash process map with a cached local key list
//!
//! # Example
//!
//! ```rust
//! use tiled_pmap::{HashPmap, Pmap, ProcessGroup};
//!
//! let group = ProcessGroup::new(1, 4).unwrap();
//! let mut pmap = HashPmap::new(group, 10);
//! pmap.set_seed(42);
//!
//! for &key in pmap.local() {
//!     assert_eq!(pmap.owner(key), 1);
//! }
//! ```
//!
//! # Seeding
//!
//! Construction and seeding are separate so the seed can be derived from
//! the array being tiled (see [`derive_seed`]). Arrays of different shape
//! that share `(procs, size)` then get uncorrelated distributions instead of
//! piling the same tile indices onto the same process.

mod group;
mod hash;
mod hash_pmap;
mod pmap;

pub use group::ProcessGroup;
pub use hash::{derive_seed, hash_combine, hash_key};
pub use hash_pmap::HashPmap;
pub use pmap::Pmap;

/// Seed used by a process map that has not been seeded yet.
pub const DEFAULT_SEED: u64 = 0;

/// Minimum key-space size for which `set_seed` scans in parallel.
#[cfg(feature = "parallel")]
pub const PARALLEL_SCAN_THRESHOLD: usize = 1 << 15;

/// Whether `TILED_TRACE=1` is set in the environment.
pub fn trace_enabled() -> bool {
    matches!(std::env::var("TILED_TRACE"), Ok(ref v) if v == "1")
}

/// Errors that can occur while describing a process group.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PmapError {
    /// A process group needs at least one process.
    #[error("process group must contain at least one process")]
    EmptyGroup,

    /// The process rank is not a member of the group.
    #[error("process rank {rank} out of range for group of size {size}")]
    RankOutOfRange { rank: usize, size: usize },
}

/// Result type for process map operations.
pub type Result<T> = std::result::Result<T, PmapError>;
