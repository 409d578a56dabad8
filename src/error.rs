use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Table capacity must be positive")]
    InvalidCapacity,
    #[error("Insertion is disabled: table was created without a probing strategy")]
    ProbingDisabled,
    #[error("No vacant slot for key {key:?} after {attempts} probe attempts")]
    NoVacantSlot { key: String, attempts: usize },
    #[error("Region name must not be empty")]
    EmptyName,
    #[error("Region name is {len} bytes long, limit is {max}")]
    NameTooLong { len: usize, max: usize },
    #[error("Unknown probing strategy: {0}")]
    UnknownStrategy(String),
}

pub type Result<T> = std::result::Result<T, TableError>;
