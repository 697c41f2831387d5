//! MessagePack implementation of the state repository.
//!
//! Stores the whole [`StoredState`] in one file using rmp_serde. Writes go
//! to a sibling temporary file first and are renamed into place, so a failed
//! write leaves the previous snapshot intact.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    Result,
    error::Error,
    ports::{StateRepository, StoredState},
};

/// MessagePack-based repository bound to one file.
///
/// # Examples
///
/// ```no_run
/// use tictac_rl::adapters::MsgPackRepository;
/// use tictac_rl::ports::{StateRepository, StoredState};
///
/// let repo = MsgPackRepository::open("tictactoe-ai.msgpack")?;
/// repo.save(&StoredState::default())?;
/// let loaded = repo.load()?;
/// # Ok::<(), tictac_rl::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MsgPackRepository {
    path: PathBuf,
}

impl MsgPackRepository {
    /// Acquire a repository at `path`, creating its parent directory.
    ///
    /// The file itself is only created on the first save.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                operation: format!("create directory {parent:?}"),
                source,
            })?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateRepository for MsgPackRepository {
    fn load(&self) -> Result<Option<StoredState>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::Io {
                    operation: format!("open file {:?}", self.path),
                    source,
                });
            }
        };

        let state = rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| {
            Error::SerializationContext {
                operation: "deserialize stored state from MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Some(state))
    }

    fn save(&self, state: &StoredState) -> Result<()> {
        let temp = self.temp_path();
        let file = File::create(&temp).map_err(|source| Error::Io {
            operation: format!("create file {temp:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write_named(&mut writer, state).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize stored state to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush file {temp:?}"),
            source,
        })?;
        drop(writer);

        fs::rename(&temp, &self.path).map_err(|source| Error::Io {
            operation: format!("replace file {:?}", self.path),
            source,
        })?;

        debug!(path = %self.path.display(), states = state.agent.q_table.len(), "state saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(Error::Io {
                operation: format!("remove file {:?}", self.path),
                source,
            }),
        }
    }
}
