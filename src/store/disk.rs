use crate::core::trip::Trip;
use crate::store::TripRepository;
use anyhow::Result;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::{debug, warn};

const TRIPS_KEY: &str = "trips";

/// Disk-backed repository storing the serialized trip list under a single
/// key in a fjall partition.
pub struct FjallRepository {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl FjallRepository {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)?;

        let keyspace = fjall::Config::new(path).open()?;
        let partition = keyspace.open_partition("trips", PartitionCreateOptions::default())?;
        Ok(FjallRepository {
            keyspace,
            partition,
        })
    }
}

impl TripRepository for FjallRepository {
    fn load(&self) -> Vec<Trip> {
        match self.partition.get(TRIPS_KEY) {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(trips) => trips,
                Err(e) => {
                    // Corrupt state is treated as no state.
                    warn!("Discarding unreadable trip data: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("No saved trips found");
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to read saved trips: {}", e);
                Vec::new()
            }
        }
    }

    fn save(&self, trips: &[Trip]) -> Result<()> {
        let bytes = serde_json::to_vec(trips)?;
        self.partition.insert(TRIPS_KEY, bytes)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Saved {} trip(s)", trips.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;
    use uuid::Uuid;

    fn sample_trip(name: &str) -> Trip {
        Trip {
            id: Uuid::new_v4(),
            name: name.to_string(),
            destination: Some("Portugal".to_string()),
            image_url: None,
            start_date: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 9, 4).unwrap(),
            local_currency: "EUR".to_string(),
            days: Vec::new(),
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let repository = FjallRepository::open(dir.path()).unwrap();

        assert!(repository.load().is_empty());

        let trips = vec![sample_trip("Lisbon"), sample_trip("Porto")];
        repository.save(&trips).unwrap();

        let loaded = repository.load();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "Lisbon");
        assert_eq!(loaded[1].name, "Porto");
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let repository = FjallRepository::open(dir.path()).unwrap();
            repository.save(&[sample_trip("Lisbon")]).unwrap();
        }

        let repository = FjallRepository::open(dir.path()).unwrap();
        let loaded = repository.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Lisbon");
    }

    #[test]
    fn test_corrupt_state_loads_as_empty() {
        let dir = tempdir().unwrap();
        let repository = FjallRepository::open(dir.path()).unwrap();
        repository.save(&[sample_trip("Lisbon")]).unwrap();

        repository
            .partition
            .insert(TRIPS_KEY, b"{not valid json".as_slice())
            .unwrap();

        assert!(repository.load().is_empty());
    }
}
