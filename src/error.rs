/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `seqguid` can emit.
///
/// Generation from a raw tick count and every conversion are infallible; only the
/// calendar-timestamp entry points of the generator can fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The timestamp passed to a generator cannot be embedded.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(#[from] InvalidTimestamp),
}

/// Reason a timestamp was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum InvalidTimestamp {
    /// The timestamp carries no time zone, so its UTC instant is unknown.
    #[error("time zone is unspecified")]
    Unspecified,

    /// The timestamp resolves to a tick count outside `[UNIX_EPOCH_TICKS, now]`.
    ///
    /// [`UNIX_EPOCH_TICKS`]: crate::ticks::UNIX_EPOCH_TICKS
    #[error("{ticks} ticks is not between January 1st, 1970 UTC and now")]
    OutOfRange {
        /// The rejected UTC tick count.
        ticks: i64,
    },
}

/// Error parsing an invalid string representation of a GUID.
#[derive(Clone, Eq, PartialEq, Hash, Debug, thiserror::Error)]
#[error("invalid string representation")]
pub struct ParseError {}
