use derive_more::Display;
use serde::Serialize;

/// Outcome of resolving a flag.
///
/// `value` is always usable: it holds either the stored flag value or the default supplied by the
/// caller. `reason` and `error` explain which one it is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionDetails<T> {
    pub value: T,
    pub reason: Reason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ResolutionError>,
}

impl<T> ResolutionDetails<T> {
    pub(crate) fn matched(value: T) -> Self {
        ResolutionDetails {
            value,
            reason: Reason::Static,
            error: None,
        }
    }

    pub(crate) fn fallback(default_value: T, error: ResolutionError) -> Self {
        let reason = match error {
            ResolutionError::FlagDisabled => Reason::Disabled,
            ResolutionError::FlagNotFound | ResolutionError::TypeMismatch { .. } => Reason::Error,
        };
        ResolutionDetails {
            value: default_value,
            reason,
            error: Some(error),
        }
    }

    /// Returns `true` if the caller's default was returned.
    pub fn is_default(&self) -> bool {
        self.error.is_some()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Why a particular value was returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    /// The stored flag value was returned.
    Static,
    /// The flag exists but is switched off.
    Disabled,
    /// The flag could not be used; see [`ResolutionError`].
    Error,
}

/// Reasons a flag falls back to the default value.
///
/// These are never returned as errors. They are attached to [`ResolutionDetails`] and logged.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionError {
    #[error("flag not found")]
    FlagNotFound,
    #[error("flag disabled")]
    FlagDisabled,
    #[error("expected a {expected} value")]
    TypeMismatch { expected: FlagType },
}

/// Value type requested by the caller.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlagType {
    #[display(fmt = "boolean")]
    Boolean,
    #[display(fmt = "string")]
    String,
    #[display(fmt = "number")]
    Number,
    #[display(fmt = "object")]
    Object,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{FlagType, Reason, ResolutionDetails, ResolutionError};

    #[test]
    fn fallback_reason_follows_error() {
        let disabled = ResolutionDetails::fallback(1.0, ResolutionError::FlagDisabled);
        assert_eq!(disabled.reason, Reason::Disabled);
        assert!(disabled.is_default());

        let missing = ResolutionDetails::fallback(1.0, ResolutionError::FlagNotFound);
        assert_eq!(missing.reason, Reason::Error);

        let matched = ResolutionDetails::matched(2.0);
        assert_eq!(matched.reason, Reason::Static);
        assert!(!matched.is_default());
        assert_eq!(matched.into_value(), 2.0);
    }

    #[test]
    fn mismatch_message_names_type() {
        let err = ResolutionError::TypeMismatch {
            expected: FlagType::Number,
        };
        assert_eq!(err.to_string(), "expected a number value");
    }

    #[test]
    fn serializes_for_logging() {
        let details = ResolutionDetails::fallback(
            "d",
            ResolutionError::TypeMismatch {
                expected: FlagType::String,
            },
        );
        assert_eq!(
            serde_json::to_value(&details).unwrap(),
            json!({
                "value": "d",
                "reason": "ERROR",
                "error": { "code": "TYPE_MISMATCH", "expected": "STRING" }
            })
        );
    }
}
