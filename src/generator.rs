//! Sequential GUID generator and related types.

use std::{
    iter::FusedIterator,
    sync::atomic::{AtomicU32, Ordering},
};

use rand::Rng;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{sort_order, ticks, Discriminator, Guid, InvalidTimestamp, Result, SqlGuid, Timestamp};

/// Only the low 24 bits of the counter are embedded.
const COUNTER_MASK: u32 = 0x00ff_ffff;

/// Upper bound (exclusive) of the random counter seed.
const SEED_LIMIT: u32 = 1 << 23;

/// The byte order in which a generator emits GUIDs.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum SortOrder {
    /// GUIDs sort chronologically by plain byte comparison.
    #[default]
    Native,

    /// GUIDs sort chronologically as SQL Server compares `uniqueidentifier`.
    Sql,
}

impl SortOrder {
    /// Rearranges native-ordered memory-layout bytes into this order.
    const fn arrange(self, bytes: [u8; 16]) -> [u8; 16] {
        match self {
            Self::Native => bytes,
            Self::Sql => sort_order::to_database_order(bytes),
        }
    }
}

/// Represents a sequential GUID generator that embeds a tick count, a machine and process
/// [`Discriminator`] and an atomic counter into every GUID.
///
/// A generator is meant to be created once per process and sort order, then shared (e.g. by
/// reference or in an `Arc`) by every thread that needs GUIDs. Construction performs the one-time
/// setup; every generation method takes `&self` and costs a single atomic increment.
///
/// # Examples
///
/// ```rust
/// use std::{sync::Arc, thread};
/// use seqguid::SequentialGuidGenerator;
///
/// let g = Arc::new(SequentialGuidGenerator::sql());
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.new_sql_guid(), i);
///             }
///         });
///     }
/// });
/// ```
///
/// # Generator functions
///
/// | Method                  | Timestamp  | Validated | Returns                |
/// | ----------------------- | ---------- | --------- | ---------------------- |
/// | [`new_guid`]            | Now        | -         | [`Guid`]               |
/// | [`new_guid_at`]         | Argument   | Yes       | `Result<Guid>`         |
/// | [`new_guid_from_ticks`] | Raw ticks  | No        | [`Guid`]               |
/// | [`new_sql_guid`]        | Now        | -         | [`SqlGuid`]            |
/// | [`new_sql_guid_at`]     | Argument   | Yes       | `Result<SqlGuid>`      |
///
/// The `Guid` methods apply the generator's [`SortOrder`]. The `SqlGuid` methods always return a
/// value that sorts chronologically in SQL Server, whatever the generator's order.
///
/// Within a single tick, GUIDs are ordered by the counter, which wraps after 2^24 increments.
///
/// [`new_guid`]: SequentialGuidGenerator::new_guid
/// [`new_guid_at`]: SequentialGuidGenerator::new_guid_at
/// [`new_guid_from_ticks`]: SequentialGuidGenerator::new_guid_from_ticks
/// [`new_sql_guid`]: SequentialGuidGenerator::new_sql_guid
/// [`new_sql_guid_at`]: SequentialGuidGenerator::new_sql_guid_at
#[derive(Debug)]
pub struct SequentialGuidGenerator {
    order: SortOrder,
    discriminator: Discriminator,
    counter: AtomicU32,
}

impl SequentialGuidGenerator {
    /// Creates a generator for `order`, deriving the discriminator from the host name and
    /// process ID and seeding the counter randomly.
    pub fn new(order: SortOrder) -> Self {
        let seed = rand::thread_rng().gen_range(0..SEED_LIMIT);
        Self::with_parts(order, Discriminator::from_environment(), seed)
    }

    /// Creates a generator whose GUIDs sort in native byte order.
    pub fn native() -> Self {
        Self::new(SortOrder::Native)
    }

    /// Creates a generator whose GUIDs sort in SQL Server order.
    pub fn sql() -> Self {
        Self::new(SortOrder::Sql)
    }

    /// Creates a generator from explicit parts.
    ///
    /// The first GUID carries the counter value `seed + 1`.
    pub const fn with_parts(order: SortOrder, discriminator: Discriminator, seed: u32) -> Self {
        Self {
            order,
            discriminator,
            counter: AtomicU32::new(seed),
        }
    }

    /// Returns the sort order of the GUIDs this generator emits.
    pub const fn order(&self) -> SortOrder {
        self.order
    }

    /// Returns the discriminator embedded in every GUID.
    pub const fn discriminator(&self) -> &Discriminator {
        &self.discriminator
    }

    /// Generates a GUID for the current UTC time.
    pub fn new_guid(&self) -> Guid {
        self.new_guid_from_ticks(ticks::now())
    }

    /// Generates a GUID for `timestamp`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTimestamp`] if the time zone of `timestamp` is unspecified or if it does
    /// not fall between the Unix epoch and now.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::{NaiveDate, TimeZone, Utc};
    /// use seqguid::SequentialGuidGenerator;
    ///
    /// let g = SequentialGuidGenerator::native();
    /// let t = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
    /// assert_eq!(g.new_guid_at(t)?.timestamp(), Some(t));
    ///
    /// let naive = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    /// assert!(g.new_guid_at(naive).is_err());
    /// # Ok::<(), seqguid::Error>(())
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip_all))]
    pub fn new_guid_at(&self, timestamp: impl Into<Timestamp>) -> Result<Guid> {
        Ok(self.new_guid_from_ticks(checked_ticks(timestamp.into())?))
    }

    /// Generates a GUID embedding `ticks` as is.
    ///
    /// Unlike [`new_guid_at`](Self::new_guid_at), this does not check that `ticks` lies between
    /// the Unix epoch and now. GUIDs built from ticks outside that window are valid identifiers,
    /// but [`Guid::timestamp`] returns `None` for them.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn new_guid_from_ticks(&self, ticks: i64) -> Guid {
        Guid::from_bytes_le(self.order.arrange(self.assemble(ticks)))
    }

    /// Generates a [`SqlGuid`] for the current UTC time.
    pub fn new_sql_guid(&self) -> SqlGuid {
        self.new_sql_guid_from_ticks(ticks::now())
    }

    /// Generates a [`SqlGuid`] for `timestamp`.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`new_guid_at`](Self::new_guid_at).
    pub fn new_sql_guid_at(&self, timestamp: impl Into<Timestamp>) -> Result<SqlGuid> {
        Ok(self.new_sql_guid_from_ticks(checked_ticks(timestamp.into())?))
    }

    fn new_sql_guid_from_ticks(&self, ticks: i64) -> SqlGuid {
        Guid::from_bytes_le(self.assemble(ticks)).to_sql_guid()
    }

    /// Returns an endless iterator generating a GUID for the current time on each call of
    /// `next()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use seqguid::SequentialGuidGenerator;
    ///
    /// let g = SequentialGuidGenerator::native();
    /// let batch: Vec<_> = g.iter().take(1_000).collect();
    /// assert!(batch.windows(2).all(|w| w[0] < w[1]));
    /// ```
    pub fn iter(&self) -> Iter<'_> {
        Iter { generator: self }
    }

    /// Lays out the native memory-layout bytes for `ticks` and the next counter value.
    fn assemble(&self, ticks: i64) -> [u8; 16] {
        let count = self.counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        let increment = count & COUNTER_MASK;

        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&ticks::encode(ticks));
        bytes[8..13].copy_from_slice(self.discriminator.as_bytes());
        bytes[13..].copy_from_slice(&increment.to_be_bytes()[1..]);
        bytes
    }
}

impl Default for SequentialGuidGenerator {
    fn default() -> Self {
        Self::native()
    }
}

/// Resolves `timestamp` to UTC ticks and checks it against the window of embeddable times.
fn checked_ticks(timestamp: Timestamp) -> Result<i64, InvalidTimestamp> {
    let ticks = ticks::from_datetime(&timestamp.to_utc()?);
    if ticks::is_valid_tick(ticks, ticks::now()) {
        Ok(ticks)
    } else {
        Err(InvalidTimestamp::OutOfRange { ticks })
    }
}

/// Endless iterator over new GUIDs, returned by [`SequentialGuidGenerator::iter`].
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    generator: &'a SequentialGuidGenerator,
}

impl Iterator for Iter<'_> {
    type Item = Guid;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generator.new_guid())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl FusedIterator for Iter<'_> {}

/// The hook through which a persistence layer assigns identifiers to new records.
///
/// The layer asks [`is_empty`](IdGenerator::is_empty) whether a record already has an ID and
/// calls [`generate_id`](IdGenerator::generate_id) only if it does not.
pub trait IdGenerator {
    /// Returns a new identifier.
    fn generate_id(&self) -> Guid;

    /// Returns true if `id` is absent or nil.
    fn is_empty(&self, id: Option<&Guid>) -> bool {
        id.map_or(true, Guid::is_nil)
    }
}

impl IdGenerator for SequentialGuidGenerator {
    fn generate_id(&self) -> Guid {
        self.new_guid()
    }
}
