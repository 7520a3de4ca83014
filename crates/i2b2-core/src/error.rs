use thiserror::Error;

/// Problems that stop the fact mapper before any fact is produced.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("data table has no patient identifier column `{column}`")]
    MissingIdColumn { column: String },

    #[error("data table has no header columns")]
    EmptyHeader,
}

pub type Result<T> = std::result::Result<T, MappingError>;
