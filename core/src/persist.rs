use alloc::string::{String, ToString};

use crate::*;

/// Namespaced key a value is stored under.
pub trait StorageKey {
    const KEY: &'static str;
}

impl StorageKey for Session {
    const KEY: &'static str = "mines:session:v1";
}

/// Load/save hook for the session blob.
pub trait Persistence {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&mut self) -> core::result::Result<Option<Session>, PersistError>;

    fn save(&mut self, session: &Session) -> core::result::Result<(), PersistError>;
}

impl<P: Persistence + ?Sized> Persistence for &mut P {
    fn load(&mut self) -> core::result::Result<Option<Session>, PersistError> {
        (**self).load()
    }

    fn save(&mut self, session: &Session) -> core::result::Result<(), PersistError> {
        (**self).save(session)
    }
}

pub fn encode(session: &Session) -> core::result::Result<String, PersistError> {
    serde_json::to_string(session).map_err(|err| PersistError::Encode(err.to_string()))
}

/// Decodes and validates a saved session.
pub fn decode(blob: &str) -> core::result::Result<Session, PersistError> {
    let session: Session =
        serde_json::from_str(blob).map_err(|err| PersistError::Decode(err.to_string()))?;
    session.validate()?;
    Ok(session)
}

/// In-process store holding the encoded blob.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    blob: Option<String>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
            saves: 0,
        }
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl Persistence for MemoryStore {
    fn load(&mut self) -> core::result::Result<Option<Session>, PersistError> {
        self.blob.as_deref().map(decode).transpose()
    }

    fn save(&mut self, session: &Session) -> core::result::Result<(), PersistError> {
        self.blob = Some(encode(session)?);
        self.saves += 1;
        Ok(())
    }
}
