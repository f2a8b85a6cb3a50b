use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// An addition carried past the last permitted limb while computing P(index).
    #[error("big integer capacity of {capacity} limbs exhausted at index {index}")]
    CapacityExhausted { capacity: usize, index: u64 },
    #[error("remainder by zero")]
    ZeroDivisor,
    #[error("{value} is outside the prime table range [2, {limit}]")]
    OutOfRange { value: u64, limit: u64 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type SearchResult<T> = std::result::Result<T, SearchError>;
