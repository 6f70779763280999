//! Library error types.

use thiserror_no_std::Error;

/// Errors surfaced by carousel construction and the looping adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CarouselError {
    /// The item set is empty; a carousel cannot be built and index
    /// mapping would divide by zero.
    #[error("item set is empty")]
    EmptyItemSet,

    /// The item set exceeds the fixed indicator capacity
    /// ([`crate::config::MAX_ITEMS`]).
    #[error("item set holds {0} items, which exceeds the fixed capacity")]
    TooManyItems(usize),
}
