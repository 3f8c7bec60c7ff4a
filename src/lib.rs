//! Sequential GUIDs: 128-bit identifiers that sort by creation time, either in plain byte order
//! or in the order SQL Server compares `uniqueidentifier` values.
//!
//! ```rust
//! use seqguid::SequentialGuidGenerator;
//!
//! let g = SequentialGuidGenerator::native();
//! let guid = g.new_guid();
//! println!("{}", guid); // e.g. "08dc2a5b-6f3e-1d27-9c41-7b03e8a1f0c2"
//! println!("{:?}", guid.timestamp()); // creation time, recovered from the GUID
//!
//! let g = SequentialGuidGenerator::sql();
//! let sql_guid = g.new_sql_guid(); // sorts chronologically in a SQL Server index
//! assert_eq!(sql_guid.to_guid().to_sql_guid(), sql_guid);
//! ```
//!
//! # Field and bit layout
//!
//! In canonical (text) byte order, a GUID in native sort order has the following layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                             ticks                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                             ticks                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                      host                     |      pid      :
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! :      pid      |                    counter                    |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 64-bit `ticks` field holds the UTC time in 100-nanosecond ticks since
//!   0001-01-01T00:00:00. Only values between the Unix epoch and the time of generation are
//!   accepted from calendar timestamps.
//! - The 24-bit `host` field holds the leading bytes of the SHA-512 hash of the host name.
//! - The 16-bit `pid` field holds the low bits of the process ID.
//! - The 24-bit `counter` field holds the low bits of a per-generator atomic counter, randomly
//!   seeded at construction and incremented for every GUID. It keeps GUIDs generated within the
//!   same tick in order and wraps after 2^24 increments.
//!
//! A GUID in SQL Server sort order carries the same fields rearranged by
//! [`sort_order::to_database_order`], so that SQL Server's field-wise comparison meets the ticks
//! first. [`Guid::timestamp`] recognizes either arrangement.

mod error;
pub use error::{Error, InvalidTimestamp, ParseError, Result};

mod guid;
pub use guid::Guid;

mod sql_guid;
pub use sql_guid::SqlGuid;

pub mod sort_order;
pub mod ticks;

mod timestamp;
pub use timestamp::Timestamp;

mod discriminator;
pub use discriminator::Discriminator;

pub mod generator;
#[doc(inline)]
pub use generator::{IdGenerator, SequentialGuidGenerator, SortOrder};
