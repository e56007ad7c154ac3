use anyhow::{Context, Result};
use keyring::Entry;
use tracing::debug;

const SERVICE_NAME: &str = "rockflint";

/// Passwords remembered for `login --remember`, kept in the OS keychain.
///
/// Entries are scoped to one API server: the same email signed in against
/// staging and production keeps two separate passwords.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    base_url: String,
}

impl CredentialStore {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_ascii_lowercase(),
        }
    }

    /// Keychain account name for an email on this server.
    pub fn account(&self, email: &str) -> String {
        format!("{} {}", email.trim().to_lowercase(), self.base_url)
    }

    fn entry(&self, email: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, &self.account(email)).context("Failed to create keyring entry")
    }

    pub fn remember(&self, email: &str, password: &str) -> Result<()> {
        self.entry(email)?
            .set_password(password)
            .context("Failed to store password in keychain")
    }

    /// The remembered password, or `None` when nothing is stored.
    pub fn password(&self, email: &str) -> Result<Option<String>> {
        match self.entry(email)?.get_password() {
            Ok(password) => Ok(Some(password)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve password from keychain"),
        }
    }

    /// Drop the remembered password. A missing entry is not an error.
    pub fn forget(&self, email: &str) -> Result<()> {
        match self.entry(email)?.delete_credential() {
            Ok(()) => {
                debug!("Removed remembered password");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete credential from keychain"),
        }
    }
}
