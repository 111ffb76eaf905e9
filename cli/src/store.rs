use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use mines_core::{PersistError, Persistence, Session, StorageKey};

/// Saves the session as a JSON file.
#[derive(Clone, Debug)]
pub(crate) struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the save is written to before it is renamed into place.
    fn staging_path(&self) -> PathBuf {
        let mut staging = OsString::from(self.path.as_os_str());
        staging.push(".tmp");
        PathBuf::from(staging)
    }
}

impl Persistence for FileStore {
    fn load(&mut self) -> Result<Option<Session>, PersistError> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => {
                log::trace!("loading {} from {}", Session::KEY, self.path.display());
                mines_core::decode(&blob).map(Some)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(PersistError::Io(err.to_string())),
        }
    }

    fn save(&mut self, session: &Session) -> Result<(), PersistError> {
        let blob = mines_core::encode(session)?;
        let staging = self.staging_path();
        fs::write(&staging, blob).map_err(|err| PersistError::Io(err.to_string()))?;
        fs::rename(&staging, &self.path).map_err(|err| PersistError::Io(err.to_string()))?;
        log::trace!("saved {} to {}", Session::KEY, self.path.display());
        Ok(())
    }
}
