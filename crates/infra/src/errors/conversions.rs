//! Conversions from external infrastructure errors into domain errors.

use guardian_common::resilience::RetryError;
use guardian_domain::GuardianError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub GuardianError);

impl From<InfraError> for GuardianError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<GuardianError> for InfraError {
    fn from(value: GuardianError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoGuardianError {
    fn into_guardian(self) -> GuardianError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → GuardianError */
/* -------------------------------------------------------------------------- */

impl IntoGuardianError for HttpError {
    fn into_guardian(self) -> GuardianError {
        // Strip the URL: presigned URLs carry credentials in their query.
        let err = self.without_url();

        if err.is_decode() {
            return GuardianError::Decode(err.to_string());
        }
        if let Some(status) = err.status() {
            return GuardianError::Status {
                status: status.as_u16(),
                url: String::new(),
                body: String::new(),
            };
        }
        if err.is_builder() {
            return GuardianError::Internal(format!("failed to build request: {err}"));
        }
        if err.is_connect() {
            return GuardianError::Network(format!("connection failed: {err}"));
        }
        GuardianError::Network(err.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_guardian())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → GuardianError */
/* -------------------------------------------------------------------------- */

impl IntoGuardianError for std::io::Error {
    fn into_guardian(self) -> GuardianError {
        GuardianError::Filesystem(format!("{:?}: {self}", self.kind()))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_guardian())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → GuardianError */
/* -------------------------------------------------------------------------- */

impl IntoGuardianError for serde_json::Error {
    fn into_guardian(self) -> GuardianError {
        GuardianError::Decode(format!("invalid JSON response: {self}"))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_guardian())
    }
}

/* -------------------------------------------------------------------------- */
/* RetryError<GuardianError> → GuardianError */
/* -------------------------------------------------------------------------- */

impl IntoGuardianError for RetryError<GuardianError> {
    fn into_guardian(self) -> GuardianError {
        match self {
            RetryError::Exhausted { source, .. } | RetryError::NonRetryable { source, .. } => {
                source
            }
            RetryError::Cancelled { .. } => GuardianError::Cancelled,
            RetryError::InvalidConfiguration { message } => GuardianError::Config(message),
        }
    }
}

impl From<RetryError<GuardianError>> for InfraError {
    fn from(value: RetryError<GuardianError>) -> Self {
        InfraError(value.into_guardian())
    }
}
