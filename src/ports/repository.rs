//! Repository port for learned-data persistence.

use std::path::Path;

use crate::{Result, learned_data::LearnedData};

/// Port for persisting and loading the learner's knowledge.
///
/// The key table and the value table are stored together; estimates are only
/// valid under the key table they were learned with.
///
/// # Examples
///
/// ```no_run
/// use jokettt::{learned_data::LearnedData, ports::LearnedDataRepository};
/// use std::path::Path;
///
/// fn save_data<R: LearnedDataRepository>(
///     repo: &R,
///     data: &LearnedData,
///     path: &Path,
/// ) -> jokettt::Result<()> {
///     repo.save(data, path)
/// }
/// ```
pub trait LearnedDataRepository: Send {
    /// Save learned data to persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be written or serialization fails.
    fn save(&self, data: &LearnedData, path: &Path) -> Result<()>;

    /// Load learned data from persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, or malformed.
    fn load(&self, path: &Path) -> Result<LearnedData>;
}
