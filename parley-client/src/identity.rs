//! Durable local identity across session restarts.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use shared::models::Participant;

use crate::error::IdentityError;

/// The local user's identity: an opaque unique id plus a display name.
///
/// The id is generated client-side on join and is empty in no persisted
/// form; a stored identity always belongs to a prior Joined session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    /// Opaque unique token generated on join.
    pub user_id: String,
    /// Display name chosen on join.
    pub user_name: String,
}

impl Identity {
    /// The presence-stream representation of this identity.
    #[must_use]
    pub fn as_participant(&self) -> Participant {
        Participant {
            user_id: self.user_id.clone(),
            user_name: self.user_name.clone(),
        }
    }
}

/// Durable key-value seam for the local identity.
///
/// Synchronous, single-threaded semantics; `save` and `clear` are
/// idempotent.
pub trait IdentityStore: Send {
    /// Reads the persisted identity, absent when no prior join exists.
    ///
    /// # Errors
    /// Returns an [`IdentityError`] when the store is unreadable or corrupt.
    fn load(&self) -> Result<Option<Identity>, IdentityError>;

    /// Durably persists the identity, overwriting any prior value.
    ///
    /// # Errors
    /// Returns an [`IdentityError`] when the store cannot be written.
    fn save(&self, identity: &Identity) -> Result<(), IdentityError>;

    /// Removes the persisted identity; no error when absent.
    ///
    /// # Errors
    /// Returns an [`IdentityError`] when removal itself fails.
    fn clear(&self) -> Result<(), IdentityError>;
}

/// File-backed identity store under the user configuration directory.
#[derive(Debug)]
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    /// Creates a store at the default location
    /// (`<config_dir>/parley/identity.json`).
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: BaseDirs::new()
                .map(|dirs| dirs.config_dir().join("parley").join("identity.json"))
                .unwrap_or_else(|| PathBuf::from("./identity.json")),
        }
    }

    /// Creates a store at an explicit path.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path the identity is persisted at.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl Default for FileIdentityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityStore for FileIdentityStore {
    fn load(&self) -> Result<Option<Identity>, IdentityError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        let identity = serde_json::from_str(&contents)?;
        Ok(Some(identity))
    }

    fn save(&self, identity: &Identity) -> Result<(), IdentityError> {
        self.ensure_parent()?;
        fs::write(&self.path, serde_json::to_string_pretty(identity)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), IdentityError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
