use crate::*;
pub use deterministic::*;

mod deterministic;

pub trait CacheGenerator {
    /// Cache for an unvisited `cell`, or `None` when the cell has no cache.
    fn generate(&self, cell: Cell) -> Option<Cache>;
}
