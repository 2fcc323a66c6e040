//! Seeded-hash process map.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::hash::hash_combine;
use crate::pmap::Pmap;
use crate::{trace_enabled, ProcessGroup, DEFAULT_SEED};

/// Process map that assigns `key` to `hash_combine(seed, key) % procs`.
///
/// The map is built unseeded (seed [`DEFAULT_SEED`], empty local list) and
/// becomes usable for local iteration once [`set_seed`](HashPmap::set_seed)
/// has scanned the key space. `owner` is valid at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashPmap {
    rank: usize,
    procs: usize,
    size: usize,
    seed: u64,
    local: Vec<usize>,
}

impl HashPmap {
    /// Create an unseeded map of `size` keys over the processes of `group`.
    pub fn new(group: ProcessGroup, size: usize) -> Self {
        Self {
            rank: group.rank(),
            procs: group.size(),
            size,
            seed: DEFAULT_SEED,
            local: Vec::new(),
        }
    }

    /// Rank of the process this map was built for.
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Number of processes.
    #[inline]
    pub fn procs(&self) -> usize {
        self.procs
    }

    /// Size of the key space.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Current seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Process that owns `key`.
    ///
    /// `key >= size` is a precondition violation; it is only caught by a
    /// debug assertion.
    #[inline]
    pub fn owner(&self, key: usize) -> usize {
        debug_assert!(
            key < self.size,
            "key {key} out of range for pmap of size {}",
            self.size
        );
        (hash_combine(self.seed, key as u64) % self.procs as u64) as usize
    }

    /// Whether `key` is owned by this process.
    #[inline]
    pub fn is_local(&self, key: usize) -> bool {
        self.owner(key) == self.rank
    }

    /// Set the seed and rebuild the ascending list of local keys.
    ///
    /// The previous local list is discarded, so reseeding never accumulates.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.local = self.scan_local();
        if trace_enabled() {
            eprintln!(
                "HashPmap::set_seed: rank={} procs={} size={} seed={:#x} local={}",
                self.rank,
                self.procs,
                self.size,
                self.seed,
                self.local.len()
            );
        }
    }

    #[cfg(feature = "parallel")]
    fn scan_local(&self) -> Vec<usize> {
        if self.size >= crate::PARALLEL_SCAN_THRESHOLD {
            (0..self.size)
                .into_par_iter()
                .filter(|&key| self.owner(key) == self.rank)
                .collect()
        } else {
            self.scan_local_serial()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn scan_local(&self) -> Vec<usize> {
        self.scan_local_serial()
    }

    fn scan_local_serial(&self) -> Vec<usize> {
        (0..self.size)
            .filter(|&key| self.owner(key) == self.rank)
            .collect()
    }

    /// Keys owned by this process, in ascending order.
    #[inline]
    pub fn local(&self) -> &[usize] {
        &self.local
    }

    /// Number of keys owned by this process.
    #[inline]
    pub fn local_size(&self) -> usize {
        self.local.len()
    }

    /// `true` when this process owns no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.local.is_empty()
    }

    /// Iterate over the keys owned by this process.
    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.local.iter()
    }

    /// A fresh map over the same processes and key space.
    ///
    /// The companion starts unseeded with an empty local list and can be
    /// seeded independently of `self`.
    pub fn clone_unseeded(&self) -> HashPmap {
        HashPmap {
            rank: self.rank,
            procs: self.procs,
            size: self.size,
            seed: DEFAULT_SEED,
            local: Vec::new(),
        }
    }
}

impl Pmap for HashPmap {
    fn rank(&self) -> usize {
        HashPmap::rank(self)
    }

    fn procs(&self) -> usize {
        HashPmap::procs(self)
    }

    fn size(&self) -> usize {
        HashPmap::size(self)
    }

    fn seed(&self) -> u64 {
        HashPmap::seed(self)
    }

    fn owner(&self, key: usize) -> usize {
        HashPmap::owner(self, key)
    }

    fn set_seed(&mut self, seed: u64) {
        HashPmap::set_seed(self, seed)
    }

    fn local(&self) -> &[usize] {
        HashPmap::local(self)
    }

    fn clone_unseeded(&self) -> Box<dyn Pmap> {
        Box::new(HashPmap::clone_unseeded(self))
    }
}

impl<'a> IntoIterator for &'a HashPmap {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.local.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(rank: usize, procs: usize, size: usize, seed: u64) -> HashPmap {
        let mut pmap = HashPmap::new(ProcessGroup::new(rank, procs).unwrap(), size);
        pmap.set_seed(seed);
        pmap
    }

    #[test]
    fn test_unseeded_state() {
        let pmap = HashPmap::new(ProcessGroup::new(0, 2).unwrap(), 8);
        assert_eq!(pmap.seed(), DEFAULT_SEED);
        assert!(pmap.is_empty());
        assert_eq!(pmap.local_size(), 0);
        // owner is usable before seeding
        assert!(pmap.owner(3) < 2);
    }

    #[test]
    fn test_local_matches_owner() {
        let pmap = seeded(2, 4, 100, 7);
        let expected: Vec<usize> = (0..100).filter(|&k| pmap.owner(k) == 2).collect();
        assert_eq!(pmap.local(), expected.as_slice());
        assert_eq!(pmap.local_size(), expected.len());
        assert!(pmap.local().iter().all(|&k| pmap.is_local(k)));
    }

    #[test]
    fn test_local_is_strictly_ascending() {
        let pmap = seeded(1, 3, 500, 99);
        assert!(pmap.local().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_reseed_replaces_local_list() {
        let mut pmap = seeded(0, 2, 64, 1);
        pmap.set_seed(2);
        let fresh = seeded(0, 2, 64, 2);
        assert_eq!(pmap.local(), fresh.local());
        pmap.set_seed(2);
        assert_eq!(pmap.local(), fresh.local());
    }

    #[test]
    fn test_single_process_owns_everything() {
        let pmap = seeded(0, 1, 10, 1234);
        assert_eq!(pmap.local(), (0..10).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn test_empty_key_space() {
        let pmap = seeded(0, 3, 0, 5);
        assert!(pmap.is_empty());
        assert_eq!(pmap.iter().count(), 0);
    }

    #[test]
    fn test_clone_unseeded_shares_nothing() {
        let pmap = seeded(1, 4, 40, 11);
        let mut companion = pmap.clone_unseeded();
        assert_eq!(companion.rank(), 1);
        assert_eq!(companion.procs(), 4);
        assert_eq!(companion.size(), 40);
        assert_eq!(companion.seed(), DEFAULT_SEED);
        assert!(companion.is_empty());

        companion.set_seed(12);
        assert_eq!(pmap.seed(), 11);
        assert_eq!(pmap.local(), seeded(1, 4, 40, 11).local());
    }

    #[test]
    fn test_trait_object_clone_unseeded() {
        let pmap: Box<dyn Pmap> = Box::new(seeded(0, 2, 16, 3));
        let mut companion = pmap.clone_unseeded();
        assert!(companion.is_empty());
        companion.set_seed(3);
        assert_eq!(companion.local(), pmap.local());
        assert_eq!(companion.local_size(), pmap.local_size());
    }

    #[test]
    fn test_into_iterator() {
        let pmap = seeded(0, 2, 20, 8);
        let collected: Vec<usize> = (&pmap).into_iter().copied().collect();
        assert_eq!(collected, pmap.local());
        let mut count = 0;
        for _ in &pmap {
            count += 1;
        }
        assert_eq!(count, pmap.local_size());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_scan_matches_serial() {
        let pmap = seeded(3, 5, crate::PARALLEL_SCAN_THRESHOLD + 17, 21);
        assert_eq!(pmap.local(), pmap.scan_local_serial().as_slice());
    }
}
