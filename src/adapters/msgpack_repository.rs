//! MessagePack file storage for learned data.

use std::{fs::File, io::BufWriter, path::Path};

use crate::{Result, error::Error, learned_data::LearnedData, ports::LearnedDataRepository};

/// File-backed learned-data repository using `rmp_serde`.
///
/// # Examples
///
/// ```no_run
/// use jokettt::adapters::MsgPackRepository;
/// use jokettt::learned_data::LearnedData;
/// use jokettt::ports::LearnedDataRepository;
/// use rand::{SeedableRng, rngs::StdRng};
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// let data = LearnedData::fresh(&mut StdRng::seed_from_u64(1));
///
/// repo.save(&data, Path::new("learned.msgpack"))?;
/// let loaded = repo.load(Path::new("learned.msgpack"))?;
/// # Ok::<(), jokettt::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    pub fn new() -> Self {
        Self
    }
}

impl LearnedDataRepository for MsgPackRepository {
    fn save(&self, data: &LearnedData, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, data).map_err(|e| Error::SerializationContext {
            operation: "serialize learned data to MessagePack".to_string(),
            message: e.to_string(),
        })?;

        writer.into_inner().map_err(|e| Error::Io {
            operation: format!("flush file {path:?}"),
            source: e.into_error(),
        })?;

        Ok(())
    }

    fn load(&self, path: &Path) -> Result<LearnedData> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        let data: LearnedData =
            rmp_serde::decode::from_read(&file).map_err(|e| Error::SerializationContext {
                operation: format!("deserialize learned data from {path:?}"),
                message: e.to_string(),
            })?;

        data.validate()?;
        Ok(data)
    }
}
