use std::env;

use super::Result;

#[cfg(not(test))]
use keyring::Entry;

/// Access token storage, one keyring entry per profile.
///
/// An access token supplied via `SQUARE_ACCESS_TOKEN` (or the CLI flag)
/// always wins over the keyring.
#[derive(Debug, Clone)]
pub struct Credentials {
    access_token: Option<String>,
    pub profile_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthMode {
    EnvToken,
    Keyring,
}

impl Credentials {
    pub fn new(profile_name: String) -> Self {
        Self {
            access_token: None,
            profile_name,
        }
    }

    pub fn load(profile_name: &str) -> Result<Self> {
        let mut credentials = Self::new(profile_name.to_string());
        credentials.access_token = credentials.load_entry("access-token")?;
        Ok(credentials)
    }

    #[cfg(not(test))]
    fn load_entry(&self, key_type: &str) -> Result<Option<String>> {
        let entry = Entry::new("square-rs", &format!("{}-{}", key_type, self.profile_name))
            .map_err(|e| crate::error::StorageError::KeyringError(e.to_string()))?;

        match entry.get_password() {
            Ok(v) => Ok(Some(v)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(crate::error::StorageError::KeyringError(e.to_string())),
        }
    }

    #[cfg(test)]
    fn load_entry(&self, key_type: &str) -> Result<Option<String>> {
        println!(
            "MOCK: Loading {} for profile {}",
            key_type, self.profile_name
        );
        Ok(None)
    }

    /// Stores an access token for a profile after `auth login`.
    pub fn save_token_for_profile(profile_name: &str, token: &str) -> Result<()> {
        let mut credentials = Self::new(profile_name.to_string());
        credentials.access_token = Some(token.to_string());
        credentials.save_entry("access-token", &credentials.access_token)?;
        Ok(())
    }

    /// Removes the stored token on `auth logout`.
    pub fn clear_token_for_profile(profile_name: &str) -> Result<()> {
        let credentials = Self::new(profile_name.to_string());
        credentials.delete_entry("access-token")?;
        Ok(())
    }

    #[cfg(not(test))]
    fn save_entry(&self, key_type: &str, value: &Option<String>) -> Result<()> {
        if let Some(v) = value {
            let key_name = format!("{}-{}", key_type, self.profile_name);

            let entry = Entry::new("square-rs", &key_name)
                .map_err(|e| crate::error::StorageError::KeyringError(e.to_string()))?;

            entry
                .set_password(v)
                .map_err(|e| crate::error::StorageError::KeyringError(e.to_string()))?;
        }

        Ok(())
    }

    #[cfg(not(test))]
    fn delete_entry(&self, key_type: &str) -> Result<()> {
        let key_name = format!("{}-{}", key_type, self.profile_name);

        let entry = Entry::new("square-rs", &key_name)
            .map_err(|e| crate::error::StorageError::KeyringError(e.to_string()))?;

        match entry.delete_credential() {
            Ok(_) => Ok(()),
            // Entry doesn't exist, which is fine for logout
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(crate::error::StorageError::KeyringError(e.to_string())),
        }
    }

    #[cfg(test)]
    fn save_entry(&self, key_type: &str, value: &Option<String>) -> Result<()> {
        if let Some(v) = value {
            println!(
                "MOCK: Saving {} = '{}' for profile {}",
                key_type, v, self.profile_name
            );
        } else {
            println!(
                "MOCK: Skipping save for {} (None value) for profile {}",
                key_type, self.profile_name
            );
        }
        Ok(())
    }

    #[cfg(test)]
    fn delete_entry(&self, key_type: &str) -> Result<()> {
        println!(
            "MOCK: Deleting {} for profile {}",
            key_type, self.profile_name
        );
        Ok(())
    }

    #[cfg(not(test))]
    fn env_token() -> Option<String> {
        env::var("SQUARE_ACCESS_TOKEN")
            .ok()
            .filter(|token| !token.is_empty())
    }

    #[cfg(test)]
    fn env_token() -> Option<String> {
        env::var("TEST_SQUARE_ACCESS_TOKEN")
            .ok()
            .filter(|token| !token.is_empty())
    }

    pub fn get_auth_mode(&self) -> AuthMode {
        if Self::env_token().is_some() {
            AuthMode::EnvToken
        } else {
            AuthMode::Keyring
        }
    }

    /// Token to authenticate with: environment first, then keyring.
    pub fn get_access_token(&self) -> Option<String> {
        Self::env_token().or_else(|| self.access_token.clone())
    }
}
