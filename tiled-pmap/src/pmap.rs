/// Query surface of a process map over the key space `[0, size)`.
///
/// Keys are linearized tile ordinals. Implementations must be pure in the
/// sense that `owner` never communicates: every process computes the same
/// answer from the same seed.
pub trait Pmap: Send + Sync + std::fmt::Debug {
    /// Rank of the process this map was built for.
    fn rank(&self) -> usize;

    /// Number of processes.
    fn procs(&self) -> usize;

    /// Size of the key space.
    fn size(&self) -> usize;

    /// Current seed.
    fn seed(&self) -> u64;

    /// Process that owns `key`.
    ///
    /// `key` must be less than [`size`](Pmap::size).
    fn owner(&self, key: usize) -> usize;

    /// Whether `key` is owned by this process.
    fn is_local(&self, key: usize) -> bool {
        self.owner(key) == self.rank()
    }

    /// Reseed the map and rebuild its local key list.
    fn set_seed(&mut self, seed: u64);

    /// Keys owned by this process, in ascending order.
    fn local(&self) -> &[usize];

    /// Number of keys owned by this process.
    fn local_size(&self) -> usize {
        self.local().len()
    }

    /// `true` when this process owns no keys.
    fn is_empty(&self) -> bool {
        self.local().is_empty()
    }

    /// Iterate over the keys owned by this process.
    fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.local().iter()
    }

    /// A map over the same key space and processes, unseeded and with no
    /// state shared with `self`.
    fn clone_unseeded(&self) -> Box<dyn Pmap>;
}
