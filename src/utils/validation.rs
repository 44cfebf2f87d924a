//! Input validation and sanitization utilities
//!
//! This module provides utilities for validating user input before it
//! reaches the keyring or the network.

use crate::error::CliError;

/// Validate the shape of an access token before storing it.
pub fn validate_access_token(token: &str) -> crate::Result<()> {
    if token.is_empty() {
        return Err(CliError::InvalidArguments("Access token cannot be empty".to_string()).into());
    }

    // Basic length check - Square access tokens are long
    if token.len() < 10 {
        return Err(CliError::InvalidArguments(
            "Access token appears to be too short (minimum 10 characters)".to_string(),
        )
        .into());
    }

    if token.to_ascii_lowercase().starts_with("bearer ") {
        return Err(CliError::InvalidArguments(
            "Do not prefix the token with 'Bearer'; that is added for you".to_string(),
        )
        .into());
    }

    Ok(())
}

/// Validate a profile name for use in config and keyring keys.
pub fn validate_profile_name(name: &str) -> crate::Result<()> {
    if name.is_empty() {
        return Err(CliError::InvalidArguments("Profile name cannot be empty".to_string()).into());
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CliError::InvalidArguments(format!(
            "Invalid profile name '{}': only letters, digits, '-' and '_' are allowed",
            name
        ))
        .into());
    }

    Ok(())
}
