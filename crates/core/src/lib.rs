pub mod history;
pub mod snippets;
pub mod submission;

pub mod roast {
    use serde::{Deserialize, Serialize};
    use thiserror::Error;

    /// Body of `POST /generate-roasts/`.
    #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
    pub struct RoastRequest {
        pub content: String,
    }

    impl RoastRequest {
        pub fn new<S: Into<String>>(content: S) -> Self {
            Self {
                content: content.into(),
            }
        }
    }

    /// Shape the service is documented to return. Only used for validation;
    /// the displayed response is always the raw JSON value.
    #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
    pub struct RoastResponse {
        pub roasts: Vec<String>,
    }

    impl RoastResponse {
        pub fn from_value(v: &serde_json::Value) -> Result<Self, RoastError> {
            serde_json::from_value(v.clone()).map_err(|e| RoastError::Shape(e.to_string()))
        }
    }

    #[derive(Error, Debug)]
    pub enum RoastError {
        #[error("network: {0}")] Network(String),
        #[error("timeout: {0}")] Timeout(String),
        #[error("status {status}: {body}")] Status { status: u16, body: String },
        #[error("decode: {0}")] Decode(String),
        #[error("unexpected response shape: {0}")] Shape(String),
        #[error("canceled")] Canceled,
        #[error("other: {0}")] Other(String),
    }

    #[allow(async_fn_in_trait)]
    pub trait RoastClient: Send + Sync {
        /// Sends `req` and returns the response body parsed as JSON.
        async fn generate(&self, req: &RoastRequest) -> Result<serde_json::Value, RoastError>;
    }
}

pub mod notice {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum NoticeKind {
        Success,
        Error,
    }

    /// Short-lived message for the user.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct Notice {
        pub kind: NoticeKind,
        pub text: String,
    }

    impl Notice {
        pub fn success<S: Into<String>>(s: S) -> Self {
            Self {
                kind: NoticeKind::Success,
                text: s.into(),
            }
        }
        pub fn error<S: Into<String>>(s: S) -> Self {
            Self {
                kind: NoticeKind::Error,
                text: s.into(),
            }
        }
        pub fn is_error(&self) -> bool {
            self.kind == NoticeKind::Error
        }
    }
}
