use std::str::FromStr;

use url::Url;

use crate::endpoints::{Cards, Customers, Groups, Segments};
use crate::error::{ApiError, ConfigError};
use crate::http::HttpClient;

/// Target environment, selecting which base domain requests go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Sandbox,
    Production,
}

impl Environment {
    /// Base URL all paths resolve against.
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://connect.squareupsandbox.com/v2/",
            Self::Production => "https://connect.squareup.com/v2/",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            _ => Err(ConfigError::InvalidValue {
                field: "environment".to_string(),
                value: value.to_string(),
                reason: "must be either 'sandbox' or 'production'".to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client for the Square Customers API.
///
/// Owns one HTTP session; the environment is resolved to a base domain once,
/// at construction. Endpoint groups borrow the client:
///
/// ```no_run
/// # use square_rs::{Environment, SquareClient};
/// # async fn example() -> square_rs::Result<()> {
/// let client = SquareClient::new("sq0atp-token", Environment::Sandbox)?;
/// let customer = client.customers().get("JDKYHBWT1D4F8MFH63DBMEN8Y4").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SquareClient {
    http: HttpClient,
}

impl SquareClient {
    /// Builds a client for `environment`. Do not prefix the token with
    /// `Bearer`; that is added for you.
    pub fn new(token: &str, environment: Environment) -> Result<Self, ApiError> {
        Self::with_api_version(token, environment, None)
    }

    /// Builds a client pinning the `Square-Version` request header.
    pub fn with_api_version(
        token: &str,
        environment: Environment,
        api_version: Option<&str>,
    ) -> Result<Self, ApiError> {
        let base = Url::parse(environment.base_url()).map_err(|e| {
            ApiError::InvalidArgument(format!(
                "base URL for environment '{environment}' did not parse: {e}"
            ))
        })?;
        Ok(Self {
            http: HttpClient::new(token, base, api_version)?,
        })
    }

    /// Builds a client against an explicit base URL.
    ///
    /// Intended for tests talking to a local mock server; production code
    /// selects a base through [`Environment`].
    pub fn with_base_url(
        token: &str,
        base_url: &str,
        api_version: Option<&str>,
    ) -> Result<Self, ApiError> {
        let base = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidArgument(format!("invalid base URL '{base_url}': {e}")))?;
        Ok(Self {
            http: HttpClient::new(token, base, api_version)?,
        })
    }

    pub fn customers(&self) -> Customers<'_> {
        Customers::new(&self.http)
    }

    pub fn cards(&self) -> Cards<'_> {
        Cards::new(&self.http)
    }

    pub fn groups(&self) -> Groups<'_> {
        Groups::new(&self.http)
    }

    pub fn segments(&self) -> Segments<'_> {
        Segments::new(&self.http)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!("sandbox".parse::<Environment>().unwrap(), Environment::Sandbox);
        assert_eq!(
            "PRODUCTION".parse::<Environment>().unwrap(),
            Environment::Production
        );

        let err = "staging".parse::<Environment>();
        assert!(matches!(err, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_environment_base_urls() {
        assert_eq!(
            Environment::Sandbox.base_url(),
            "https://connect.squareupsandbox.com/v2/"
        );
        assert_eq!(
            Environment::Production.base_url(),
            "https://connect.squareup.com/v2/"
        );
    }

    #[test]
    fn test_client_creation() {
        let client = SquareClient::new("sq0atp-token", Environment::Sandbox);
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_with_custom_base_url() {
        let client = SquareClient::with_base_url("token", "http://localhost:9090/v2/", None);
        assert!(client.is_ok());

        let client = SquareClient::with_base_url("token", "not a url", None);
        assert!(matches!(client, Err(ApiError::InvalidArgument(_))));
    }
}
