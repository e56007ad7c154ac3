use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::models::UserProfile;

/// Storage key for the persisted credential snapshot.
pub const STORAGE_KEY: &str = "rf_auth";

/// Version of the on-disk snapshot layout.
const STORAGE_VERSION: u32 = 0;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access credential state at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Snapshot of the current session's credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialState {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<UserProfile>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedState {
    version: u32,
    saved_at: DateTime<Utc>,
    state: CredentialState,
}

/// Holder of the access token, refresh token and cached user.
///
/// Every mutation replaces fields under the channel's lock, so readers
/// move from one whole snapshot to the next. Writers are serialized on a
/// separate lock that also covers the disk write; readers never wait on
/// I/O. The snapshot file is readable only by its owner on unix.
/// Subscribers are notified after each mutation.
#[derive(Debug)]
pub struct TokenStore {
    state: watch::Sender<CredentialState>,
    path: Option<PathBuf>,
    write_lock: Mutex<()>,
}

impl TokenStore {
    /// A store that lives only for this process.
    pub fn in_memory() -> Self {
        Self::with_state(CredentialState::default(), None)
    }

    /// Open the persisted store in `state_dir`, rehydrating the last
    /// written snapshot. A missing file yields the empty state; an
    /// unreadable snapshot is discarded with a warning.
    pub fn open(state_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = state_dir.as_ref().join(format!("{}.json", STORAGE_KEY));
        let state = Self::load(&path)?;
        Ok(Self::with_state(state, Some(path)))
    }

    fn with_state(state: CredentialState, path: Option<PathBuf>) -> Self {
        let (tx, _) = watch::channel(state);
        Self {
            state: tx,
            path,
            write_lock: Mutex::new(()),
        }
    }

    fn load(path: &Path) -> Result<CredentialState, StoreError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No persisted credentials");
                return Ok(CredentialState::default());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        match serde_json::from_str::<PersistedState>(&contents) {
            Ok(persisted) => {
                debug!(saved_at = %persisted.saved_at, "Rehydrated credentials");
                Ok(persisted.state)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Discarding unreadable credential state");
                Ok(CredentialState::default())
            }
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> CredentialState {
        self.state.borrow().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.state.borrow().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.state.borrow().refresh_token.clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().access_token.is_some()
    }

    /// Replace both tokens together.
    pub fn set_tokens(&self, access: Option<String>, refresh: Option<String>) {
        self.update(|s| {
            s.access_token = access;
            s.refresh_token = refresh;
        });
    }

    pub fn set_user(&self, user: Option<UserProfile>) {
        self.update(|s| s.user = user);
    }

    /// Drop tokens and user in one update.
    pub fn clear(&self) {
        self.update(|s| *s = CredentialState::default());
    }

    /// Receive every subsequent snapshot.
    pub fn subscribe(&self) -> watch::Receiver<CredentialState> {
        self.state.subscribe()
    }

    pub fn storage_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn update(&self, apply: impl FnOnce(&mut CredentialState)) {
        let _writer = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut snapshot = None;
        self.state.send_modify(|state| {
            apply(state);
            if self.path.is_some() {
                snapshot = Some(state.clone());
            }
        });

        if let (Some(path), Some(state)) = (self.path.as_deref(), snapshot) {
            if let Err(e) = Self::save(path, state) {
                warn!(path = %path.display(), error = %e, "Failed to persist credential state");
            }
        }
    }

    fn save(path: &Path, state: CredentialState) -> std::io::Result<()> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        create_private_dir(dir)?;

        let persisted = PersistedState {
            version: STORAGE_VERSION,
            saved_at: Utc::now(),
            state,
        };

        // Temp files are created 0600 and unique per writer; persist renames
        // the complete snapshot over the old one.
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{}", STORAGE_KEY))
            .suffix(".tmp")
            .tempfile_in(dir)?;
        serde_json::to_writer_pretty(tmp.as_file_mut(), &persisted)?;
        tmp.as_file_mut().flush()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}
