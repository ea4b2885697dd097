use crate::core::error::StoreError;
use crate::models::user::UserDatabase;
use crate::utils::digest::sampled_file_digest;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument, warn};

/// JSON file holding every registered user
///
/// The file is read in full on every load and rewritten in full on every
/// save. Nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the user database, degrading to an empty one on any failure
    ///
    /// Every failure is logged; callers only ever see a (possibly empty)
    /// database.
    #[instrument(name = "load", skip_all, fields(path = %self.path.display()))]
    pub fn load(&self) -> UserDatabase {
        info!(path = %self.path.display(), "Loading user data file");

        match self.try_load() {
            Ok(db) => {
                info!(path = %self.path.display(), users = db.len(), "User data file loaded");
                db
            }
            Err(e @ StoreError::NotFound(_)) | Err(e @ StoreError::NotAnObject { .. }) => {
                warn!(error = %e, "Using empty user database");
                UserDatabase::new()
            }
            Err(e) => {
                error!(error = %e, "Using empty user database");
                UserDatabase::new()
            }
        }
    }

    /// Load the user database, returning the reason it could not be read
    pub fn try_load(&self) -> Result<UserDatabase, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::NotFound(self.path.clone()));
        }

        // Only gates on the file being readable; no expected digest is stored
        if sampled_file_digest(&self.path).is_none() {
            return Err(StoreError::Unverifiable(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| StoreError::from_io(self.path.clone(), e))?;

        let value: Value = serde_json::from_str(&content).map_err(|e| StoreError::Syntax {
            path: self.path.clone(),
            source: e,
        })?;

        match value {
            Value::Object(users) => Ok(UserDatabase::from_map(users)),
            other => Err(StoreError::NotAnObject {
                path: self.path.clone(),
                found: json_type_name(&other),
            }),
        }
    }

    /// Overwrite the data file with `db`
    ///
    /// Written with 2-space indentation and non-ASCII characters kept
    /// literally.
    #[instrument(name = "save", skip_all, fields(path = %self.path.display()))]
    pub fn save(&self, db: &UserDatabase) -> Result<(), StoreError> {
        info!(path = %self.path.display(), users = db.len(), "Saving user data file");

        if let Err(e) = self.write(db) {
            error!(error = %e, "Failed to save user data file");
            return Err(e);
        }

        info!(path = %self.path.display(), "User data file saved");

        if let Some(digest) = sampled_file_digest(&self.path) {
            debug!(path = %self.path.display(), digest = %digest, "Sampled digest after save");
        }

        Ok(())
    }

    fn write(&self, db: &UserDatabase) -> Result<(), StoreError> {
        let io_err = |e: std::io::Error| StoreError::from_io(self.path.clone(), e);

        let file = File::create(&self.path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, db.as_map())
            .map_err(|e| StoreError::from_io(self.path.clone(), e.into()))?;

        writer.flush().map_err(io_err)?;
        Ok(())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
