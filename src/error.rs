use serde::Deserialize;
use thiserror::Error;

use crate::models::enums::wire_enum;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
    #[error("ApiError: {0}")]
    Api(#[from] ApiError),
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("DisplayError: {0}")]
    Display(#[from] DisplayError),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Authentication required: {message}")]
    AuthRequired { message: String, hint: String },
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

/// Errors surfaced by the API client itself.
///
/// `InvalidArgument` is raised client-side before any request goes out.
/// `Square` and `Multiple` carry errors the server classified; `Http` covers
/// non-2xx responses whose `errors` array yielded nothing classifiable.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("resource not found: {endpoint}")]
    NotFound { endpoint: String },
    #[error(transparent)]
    Square(#[from] SquareError),
    #[error(transparent)]
    Multiple(#[from] MultipleErrors),
    #[error("HTTP {status} at {endpoint}: {message}")]
    Http {
        status: u16,
        endpoint: String,
        message: String,
    },
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },
    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        source: reqwest::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String, hint: String },
    #[error("Configuration field '{field}' is missing")]
    MissingField { field: String },
    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Keyring error: {0}")]
    KeyringError(String),
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration save failed")]
    ConfigSaveFailed,
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
}

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Table formatting failed: {0}")]
    TableFormat(String),
}

/// One server-classified error from the `errors` array of a non-2xx response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} [{code}]: {}", .detail.as_deref().unwrap_or("no detail provided"))]
pub struct SquareError {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub detail: Option<String>,
    pub field: Option<String>,
}

impl SquareError {
    /// Classifies one wire error entry into a typed error.
    ///
    /// Entries with a category this client does not recognize are logged and
    /// excluded; the caller falls back to the raw response for those.
    pub(crate) fn classify(entry: ErrorEntry) -> Option<Self> {
        let kind = match &entry.category {
            ErrorCategory::ApiError => ErrorKind::Api,
            ErrorCategory::AuthenticationError => ErrorKind::Authentication,
            ErrorCategory::InvalidRequestError => ErrorKind::InvalidRequest,
            ErrorCategory::RateLimitError => ErrorKind::RateLimited,
            ErrorCategory::PaymentMethodError => ErrorKind::PaymentMethod,
            ErrorCategory::RefundError => ErrorKind::Refund,
            ErrorCategory::Unrecognized(other) => {
                log::warn!("unrecognized error category '{other}', leaving entry unclassified");
                return None;
            }
        };

        Some(Self {
            kind,
            code: entry.code,
            detail: entry.detail,
            field: entry.field,
        })
    }
}

/// Classified error kinds, one per recognized server category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Api,
    Authentication,
    InvalidRequest,
    RateLimited,
    PaymentMethod,
    Refund,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Api => "API error",
            Self::Authentication => "authentication error",
            Self::InvalidRequest => "invalid request",
            Self::RateLimited => "rate limited",
            Self::PaymentMethod => "payment method error",
            Self::Refund => "refund error",
        };
        f.write_str(label)
    }
}

/// Aggregate for responses carrying more than one classified error.
///
/// Iteration yields the errors in the order the server returned them.
#[derive(Error, Debug)]
#[error("{} errors returned, iterate the aggregate to inspect them", .errors.len())]
pub struct MultipleErrors {
    pub errors: Vec<SquareError>,
}

impl MultipleErrors {
    pub fn iter(&self) -> std::slice::Iter<'_, SquareError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl IntoIterator for MultipleErrors {
    type Item = SquareError;
    type IntoIter = std::vec::IntoIter<SquareError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a MultipleErrors {
    type Item = &'a SquareError;
    type IntoIter = std::slice::Iter<'a, SquareError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Body of a non-2xx response.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub errors: Vec<ErrorEntry>,
}

/// One entry of the `errors` array as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorEntry {
    pub category: ErrorCategory,
    pub code: ErrorCode,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
}

wire_enum! {
    /// Server-side error category tag.
    pub enum ErrorCategory {
        ApiError => "API_ERROR",
        AuthenticationError => "AUTHENTICATION_ERROR",
        InvalidRequestError => "INVALID_REQUEST_ERROR",
        RateLimitError => "RATE_LIMIT_ERROR",
        PaymentMethodError => "PAYMENT_METHOD_ERROR",
        RefundError => "REFUND_ERROR",
    }
}

wire_enum! {
    /// Server-side error code.
    pub enum ErrorCode {
        InternalServerError => "INTERNAL_SERVER_ERROR",
        Unauthorized => "UNAUTHORIZED",
        AccessTokenExpired => "ACCESS_TOKEN_EXPIRED",
        AccessTokenRevoked => "ACCESS_TOKEN_REVOKED",
        Forbidden => "FORBIDDEN",
        InsufficientScopes => "INSUFFICIENT_SCOPES",
        ApplicationDisabled => "APPLICATION_DISABLED",
        V1Application => "V1_APPLICATION",
        V1AccessToken => "V1_ACCESS_TOKEN",
        BadRequest => "BAD_REQUEST",
        MissingRequiredParameter => "MISSING_REQUIRED_PARAMETER",
        IncorrectType => "INCORRECT_TYPE",
        InvalidTime => "INVALID_TIME",
        InvalidTimeRange => "INVALID_TIME_RANGE",
        InvalidValue => "INVALID_VALUE",
        InvalidCursor => "INVALID_CURSOR",
        UnknownQueryParameter => "UNKNOWN_QUERY_PARAMETER",
        ConflictingParameters => "CONFLICTING_PARAMETERS",
        ExpectedJsonBody => "EXPECTED_JSON_BODY",
        InvalidSortOrder => "INVALID_SORT_ORDER",
        ValueRegexMismatch => "VALUE_REGEX_MISMATCH",
        ValueTooShort => "VALUE_TOO_SHORT",
        ValueTooLong => "VALUE_TOO_LONG",
        ValueTooLow => "VALUE_TOO_LOW",
        ValueTooHigh => "VALUE_TOO_HIGH",
        ValueEmpty => "VALUE_EMPTY",
        ArrayLengthTooLong => "ARRAY_LENGTH_TOO_LONG",
        ArrayLengthTooShort => "ARRAY_LENGTH_TOO_SHORT",
        ArrayEmpty => "ARRAY_EMPTY",
        ExpectedBoolean => "EXPECTED_BOOLEAN",
        ExpectedInteger => "EXPECTED_INTEGER",
        ExpectedFloat => "EXPECTED_FLOAT",
        ExpectedString => "EXPECTED_STRING",
        ExpectedObject => "EXPECTED_OBJECT",
        ExpectedArray => "EXPECTED_ARRAY",
        ExpectedMap => "EXPECTED_MAP",
        ExpectedBase64EncodedByteArray => "EXPECTED_BASE64_ENCODED_BYTE_ARRAY",
        InvalidArrayValue => "INVALID_ARRAY_VALUE",
        InvalidEnumValue => "INVALID_ENUM_VALUE",
        InvalidContentType => "INVALID_CONTENT_TYPE",
        InvalidFormValue => "INVALID_FORM_VALUE",
        NoFieldsSet => "NO_FIELDS_SET",
        TooManyMapEntries => "TOO_MANY_MAP_ENTRIES",
        MapKeyLengthTooShort => "MAP_KEY_LENGTH_TOO_SHORT",
        MapKeyLengthTooLong => "MAP_KEY_LENGTH_TOO_LONG",
        CurrencyMismatch => "CURRENCY_MISMATCH",
        LocationMismatch => "LOCATION_MISMATCH",
        IdempotencyKeyReused => "IDEMPOTENCY_KEY_REUSED",
        UnexpectedValue => "UNEXPECTED_VALUE",
        SandboxNotSupported => "SANDBOX_NOT_SUPPORTED",
        BadCertificate => "BAD_CERTIFICATE",
        InvalidSquareVersionFormat => "INVALID_SQUARE_VERSION_FORMAT",
        ApiVersionIncompatible => "API_VERSION_INCOMPATIBLE",
        NotFound => "NOT_FOUND",
        MethodNotAllowed => "METHOD_NOT_ALLOWED",
        NotAcceptable => "NOT_ACCEPTABLE",
        RequestTimeout => "REQUEST_TIMEOUT",
        Conflict => "CONFLICT",
        Gone => "GONE",
        RequestEntityTooLarge => "REQUEST_ENTITY_TOO_LARGE",
        UnsupportedMediaType => "UNSUPPORTED_MEDIA_TYPE",
        UnprocessableEntity => "UNPROCESSABLE_ENTITY",
        RateLimited => "RATE_LIMITED",
        NotImplemented => "NOT_IMPLEMENTED",
        BadGateway => "BAD_GATEWAY",
        ServiceUnavailable => "SERVICE_UNAVAILABLE",
        GatewayTimeout => "GATEWAY_TIMEOUT",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(category: &str, code: &str, detail: &str) -> ErrorEntry {
        ErrorEntry {
            category: ErrorCategory::from(category.to_string()),
            code: ErrorCode::from(code.to_string()),
            detail: Some(detail.to_string()),
            field: None,
        }
    }

    #[test]
    fn test_classify_recognized_categories() {
        let err = SquareError::classify(entry(
            "AUTHENTICATION_ERROR",
            "UNAUTHORIZED",
            "The access token is invalid",
        ))
        .expect("recognized category should classify");
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.code, ErrorCode::Unauthorized);

        let err = SquareError::classify(entry("RATE_LIMIT_ERROR", "RATE_LIMITED", "Slow down"))
            .expect("recognized category should classify");
        assert_eq!(err.kind, ErrorKind::RateLimited);
    }

    #[test]
    fn test_classify_drops_unrecognized_category() {
        let result = SquareError::classify(entry("QUANTUM_ERROR", "BAD_REQUEST", "???"));
        assert!(result.is_none());
    }

    #[test]
    fn test_square_error_display() {
        let err = SquareError {
            kind: ErrorKind::InvalidRequest,
            code: ErrorCode::ValueTooHigh,
            detail: Some("limit is too high".to_string()),
            field: Some("limit".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "invalid request [VALUE_TOO_HIGH]: limit is too high"
        );

        let err = SquareError {
            kind: ErrorKind::Api,
            code: ErrorCode::InternalServerError,
            detail: None,
            field: None,
        };
        assert_eq!(
            err.to_string(),
            "API error [INTERNAL_SERVER_ERROR]: no detail provided"
        );
    }

    #[test]
    fn test_multiple_errors_preserve_order() {
        let first = SquareError::classify(entry("INVALID_REQUEST_ERROR", "VALUE_EMPTY", "first"))
            .expect("classifies");
        let second = SquareError::classify(entry("API_ERROR", "INTERNAL_SERVER_ERROR", "second"))
            .expect("classifies");
        let aggregate = MultipleErrors {
            errors: vec![first, second],
        };

        let details: Vec<_> = aggregate
            .iter()
            .map(|e| e.detail.as_deref().unwrap())
            .collect();
        assert_eq!(details, vec!["first", "second"]);
        assert_eq!(aggregate.len(), 2);
    }

    #[test]
    fn test_error_body_deserializes() {
        let json = r#"{
            "errors": [
                {
                    "category": "INVALID_REQUEST_ERROR",
                    "code": "MISSING_REQUIRED_PARAMETER",
                    "detail": "Missing required parameter.",
                    "field": "idempotency_key"
                }
            ]
        }"#;
        let body: ErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.errors.len(), 1);
        assert_eq!(body.errors[0].category, ErrorCategory::InvalidRequestError);
        assert_eq!(body.errors[0].field.as_deref(), Some("idempotency_key"));
    }

    #[test]
    fn test_error_body_tolerates_missing_errors_key() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.errors.is_empty());
    }

    #[test]
    fn test_app_error_wraps_api_error() {
        let app_err = AppError::from(ApiError::InvalidArgument(
            "limit must be within the range 1-100 inclusive".to_string(),
        ));
        assert!(matches!(
            app_err,
            AppError::Api(ApiError::InvalidArgument(_))
        ));
        assert_eq!(
            app_err.to_string(),
            "ApiError: invalid argument: limit must be within the range 1-100 inclusive"
        );
    }
}
