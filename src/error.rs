use thiserror::Error;

/// Errors surfaced by the dashboard engine.
///
/// Missing rows and malformed cells are not errors: lookups return `None` and
/// sort keys fall back to default values. Only storage, loading and export
/// failures reach callers through this type.
#[derive(Debug, Error)]
pub enum LiveloError {
    #[error("storage failure for key `{key}`: {source}")]
    Storage {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to load table: {0}")]
    Load(String),

    #[error("snapshot failure: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("column {0} is outside the table")]
    UnknownColumn(usize),

    #[error("nothing to export: no visible rows")]
    NothingToExport,

    #[error("export failure: {0}")]
    Export(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LiveloError>;
