pub mod disk;
pub mod memory;

use crate::core::trip::Trip;
use anyhow::Result;

/// Persistence boundary for the trip list. The engine only needs a full
/// load/save round-trip; the storage medium behind it is irrelevant.
pub trait TripRepository: Send + Sync {
    /// Loads the saved trip list. Missing or corrupt state yields an empty
    /// list, never an error.
    fn load(&self) -> Vec<Trip>;

    /// Replaces the saved trip list wholesale.
    fn save(&self, trips: &[Trip]) -> Result<()>;
}
