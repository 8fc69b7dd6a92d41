use thiserror::Error;

/// Errors raised while resolving a raw Slack payload into a representation.
///
/// Every variant carries the name of the representation being built, so an
/// error coming out of a nested `latest` message reads as a message error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepresentationError {
    #[error("{representation}: missing required field '{key}'")]
    MissingField {
        representation: &'static str,
        key: &'static str,
    },

    #[error("{representation}: field '{key}' must be {expected}, got {found}")]
    TypeMismatch {
        representation: &'static str,
        key: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{representation}: could not parse field '{key}' from {value:?}: {reason}")]
    Parse {
        representation: &'static str,
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{representation}: unexpected field '{key}'")]
    UnknownField {
        representation: &'static str,
        key: String,
    },

    #[error("{representation}: payload must be an object, got {found}")]
    NotAnObject {
        representation: &'static str,
        found: &'static str,
    },
}

impl RepresentationError {
    /// The payload key this error is about, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            RepresentationError::MissingField { key, .. }
            | RepresentationError::TypeMismatch { key, .. }
            | RepresentationError::Parse { key, .. } => Some(*key),
            RepresentationError::UnknownField { key, .. } => Some(key.as_str()),
            RepresentationError::NotAnObject { .. } => None,
        }
    }

    pub fn representation(&self) -> &'static str {
        match self {
            RepresentationError::MissingField { representation, .. }
            | RepresentationError::TypeMismatch { representation, .. }
            | RepresentationError::Parse { representation, .. }
            | RepresentationError::UnknownField { representation, .. }
            | RepresentationError::NotAnObject { representation, .. } => *representation,
        }
    }
}

/// Errors raised while decoding a whole API method response.
#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("Request failed with error {0}")]
    Api(String),

    #[error("Response has ok=false and no error field")]
    NotOk,

    #[error("Invalid JSON in response: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Representation(#[from] RepresentationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_representation_and_key() {
        let err = RepresentationError::MissingField {
            representation: "channel",
            key: "creator",
        };
        assert_eq!(err.to_string(), "channel: missing required field 'creator'");
        assert_eq!(err.key(), Some("creator"));

        let err = RepresentationError::TypeMismatch {
            representation: "message",
            key: "ts",
            expected: "string",
            found: "integer",
        };
        assert_eq!(err.to_string(), "message: field 'ts' must be string, got integer");
        assert_eq!(err.representation(), "message");
    }

    #[test]
    fn representation_errors_pass_through_response_errors() {
        let inner = RepresentationError::NotAnObject {
            representation: "channel",
            found: "array",
        };
        let err = ResponseError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
    }
}
