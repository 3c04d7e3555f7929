//! In-memory learned-data repository for testing.
//!
//! Stores MessagePack bytes in a shared map so tests exercise the same
//! serialization path as the file adapter without touching the disk.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, error::Error, learned_data::LearnedData, ports::LearnedDataRepository};

/// In-memory repository keyed by path.
///
/// # Examples
///
/// ```
/// use jokettt::adapters::InMemoryRepository;
/// use jokettt::learned_data::LearnedData;
/// use jokettt::ports::LearnedDataRepository;
/// use rand::{SeedableRng, rngs::StdRng};
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let data = LearnedData::fresh(&mut StdRng::seed_from_u64(1));
///
/// repo.save(&data, Path::new("learned"))?;
/// assert_eq!(repo.load(Path::new("learned"))?, data);
/// # Ok::<(), jokettt::Error>(())
/// ```
///
/// Clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of entries currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    pub fn clear(&self) {
        self.storage().clear();
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(&key_for(path))
    }

    /// Store raw bytes at `path`, bypassing serialization.
    pub fn insert_raw(&self, path: &Path, bytes: Vec<u8>) {
        self.storage().insert(key_for(path), bytes);
    }
}

fn key_for(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

impl LearnedDataRepository for InMemoryRepository {
    fn save(&self, data: &LearnedData, path: &Path) -> Result<()> {
        let bytes = rmp_serde::to_vec(data).map_err(|e| Error::SerializationContext {
            operation: "serialize learned data for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage().insert(key_for(path), bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<LearnedData> {
        let storage = self.storage();
        let bytes = storage.get(&key_for(path)).ok_or_else(|| Error::Io {
            operation: format!("load learned data from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        let data: LearnedData =
            rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
                operation: "deserialize learned data from in-memory storage".to_string(),
                message: e.to_string(),
            })?;

        data.validate()?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn data() -> LearnedData {
        let mut data = LearnedData::fresh(&mut StdRng::seed_from_u64(6));
        data.values.insert(99, 0.3);
        data
    }

    #[test]
    fn test_in_memory_save_and_load() {
        let repo = InMemoryRepository::new();
        let path = Path::new("learned");

        assert_eq!(repo.count(), 0);
        assert!(!repo.contains(path));

        repo.save(&data(), path).unwrap();
        assert_eq!(repo.count(), 1);
        assert!(repo.contains(path));
        assert_eq!(repo.load(path).unwrap(), data());
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let repo = InMemoryRepository::new();
        assert!(repo.load(Path::new("nonexistent")).is_err());
    }

    #[test]
    fn test_load_corrupt_bytes_returns_error() {
        let repo = InMemoryRepository::new();
        repo.insert_raw(Path::new("corrupt"), vec![0xc1, 0x00, 0x13]);
        assert!(matches!(
            repo.load(Path::new("corrupt")),
            Err(Error::SerializationContext { .. })
        ));
    }

    #[test]
    fn test_clone_shares_storage() {
        let repo1 = InMemoryRepository::new();
        let repo2 = repo1.clone();

        repo1.save(&data(), Path::new("shared")).unwrap();
        assert_eq!(repo2.load(Path::new("shared")).unwrap(), data());

        repo2.clear();
        assert_eq!(repo1.count(), 0);
    }
}
