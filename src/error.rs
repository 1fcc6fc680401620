use thiserror::Error;

/// Errors raised by the throwing accessors of every container.
///
/// Each throwing accessor has an `Option`-returning `try_*` twin; prefer those in
/// application code and treat these errors as programmer-error assertions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// Pop, dequeue or peek on an empty stack, queue or priority queue.
    #[error("{collection} is empty")]
    EmptyCollection {
        /// Name of the container that was empty
        collection: &'static str,
    },

    /// Positional access outside `[0, len)`.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The rejected index
        index: usize,
        /// Length of the sequence at the time of access
        len: usize,
    },

    /// Direct keyed access to a key that is not stored.
    #[error("key not found: {key}")]
    KeyNotFound {
        /// Debug rendering of the missing key
        key: String,
    },

    /// A required argument was missing or out of its valid domain.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the rejected argument
        message: String,
    },
}

impl CollectionError {
    pub fn empty(collection: &'static str) -> Self {
        Self::EmptyCollection { collection }
    }

    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    pub fn key_not_found<K: std::fmt::Debug + ?Sized>(key: &K) -> Self {
        Self::KeyNotFound {
            key: format!("{key:?}"),
        }
    }

    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Result alias used by every throwing accessor in the crate.
pub type Result<T> = std::result::Result<T, CollectionError>;
