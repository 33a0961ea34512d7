use thiserror::Error;

pub type Result<T> = std::result::Result<T, PackageError>;

#[derive(Debug, Error)]
pub enum PackageError {
    /// Shortcut launch parameters are not valid JSON.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// An ar header field rendered wider than its fixed column.
    #[error("ar field `{field}` value {value:?} exceeds {width} bytes")]
    FieldOverflow { field: &'static str, value: String, width: usize },

    #[error("invalid ar member name {0:?}: must be printable ASCII without spaces")]
    InvalidMemberName(String),

    #[error("invalid app id {app_id:?}: {reason}")]
    InvalidAppId { app_id: String, reason: &'static str },

    #[error("invalid control value for `{key}`: {reason}")]
    InvalidControlValue { key: &'static str, reason: &'static str },

    #[error("serialize manifest: {0}")]
    Json(#[from] serde_json::Error),

    /// tar/gzip collaborator failure, passed through as-is.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
