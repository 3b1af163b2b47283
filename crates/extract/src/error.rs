use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("LLM endpoint returned {status}: {body}")]
    Endpoint {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("model output is not valid JSON")]
    MalformedOutput { raw: String },

    #[error("model output does not match the extraction schema: {source}")]
    SchemaMismatch {
        #[source]
        source: serde_json::Error,
        raw: String,
    },
}

pub type Result<T> = std::result::Result<T, ExtractError>;

impl ExtractError {
    /// The raw model output, when the failure happened after a response
    /// was received. Surfaced so callers can log or persist it.
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            ExtractError::MalformedOutput { raw } | ExtractError::SchemaMismatch { raw, .. } => {
                Some(raw)
            }
            _ => None,
        }
    }

    /// Whether retrying the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ExtractError::Transport(_) => true,
            ExtractError::Endpoint { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient() {
        let err = ExtractError::Endpoint {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        };
        assert!(err.is_transient());

        let err = ExtractError::Endpoint {
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
            body: String::new(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn bad_output_is_not_transient() {
        let err = ExtractError::MalformedOutput {
            raw: "not json".into(),
        };
        assert!(!err.is_transient());
        assert_eq!(err.raw_output(), Some("not json"));
    }

    #[test]
    fn client_errors_are_not_transient() {
        let err = ExtractError::Endpoint {
            status: reqwest::StatusCode::UNAUTHORIZED,
            body: "bad key".into(),
        };
        assert!(!err.is_transient());
        assert_eq!(err.raw_output(), None);
    }
}
