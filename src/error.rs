use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// An element the component needs wasn't handed to it (or isn't in the document).
    #[error("missing element: {0}")]
    MissingElement(&'static str),
    #[error("2d canvas context is unavailable")]
    ContextUnavailable,
    #[error("invalid content data: {0}")]
    Content(#[source] serde_json::Error),
    #[error("invalid settings: {0}")]
    Settings(#[source] serde_json::Error),
    #[error("duplicate project id `{0}`")]
    DuplicateProjectId(String),
    #[error("setting `{name}` is invalid: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
    /// A browser API call threw. The `JsValue` is stringified so this type stays `Send`.
    #[error("browser call failed: {0}")]
    Js(String),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidSetting {
            name,
            reason: reason.into(),
        }
    }
}
