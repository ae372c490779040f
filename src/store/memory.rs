use crate::core::trip::Trip;
use crate::store::TripRepository;
use anyhow::Result;
use std::sync::RwLock;

/// In-memory repository. Used by tests and anywhere persistence across
/// processes is not wanted.
pub struct MemoryRepository {
    trips: RwLock<Vec<Trip>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        MemoryRepository {
            trips: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TripRepository for MemoryRepository {
    fn load(&self) -> Vec<Trip> {
        self.trips.read().map(|t| t.clone()).unwrap_or_default()
    }

    fn save(&self, trips: &[Trip]) -> Result<()> {
        let mut stored = self
            .trips
            .write()
            .map_err(|_| anyhow::anyhow!("trip store lock poisoned"))?;
        *stored = trips.to_vec();
        Ok(())
    }
}
