use core::fmt::Debug;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;
use std::sync::Arc;
use std::sync::Weak;

use crate::error::InitError;
use crate::error::InsertExhausted;
use crate::hash::HashFn;
use crate::params::Bits;
use crate::params::DefaultParams;
use crate::params::Params;
use crate::registry::Reportable;
use crate::stats::Snapshot;
use crate::table::RawTable;

// -----------------------------------------------------------------------------
// Table Definition
// -----------------------------------------------------------------------------

/// A declarative description of a table instance.
///
/// Names the table for reporting, fixes its capacity exponent, and optionally
/// selects a hash function. Nothing is allocated until the definition is
/// handed to [`Table::init`].
///
/// # Examples
///
/// ```
/// use lftab::{Bits, TableDef};
/// use lftab::hash::identity;
///
/// const DEF: TableDef = TableDef::new("fd-by-tid", Bits::new(12)).hash(identity);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct TableDef {
  name: &'static str,
  bits: Bits,
  hash: Option<HashFn>,
}

impl TableDef {
  /// Creates a definition with the default hash function.
  #[inline]
  pub const fn new(name: &'static str, bits: Bits) -> Self {
    Self {
      name,
      bits,
      hash: None,
    }
  }

  /// Selects the hash function.
  ///
  /// Unset definitions default to [`hash32shift`][crate::hash::hash32shift].
  #[inline]
  #[must_use]
  pub const fn hash(mut self, hash: HashFn) -> Self {
    self.hash = Some(hash);
    self
  }

  #[inline]
  pub const fn name(&self) -> &'static str {
    self.name
  }

  #[inline]
  pub const fn bits(&self) -> Bits {
    self.bits
  }
}

// -----------------------------------------------------------------------------
// Table
// -----------------------------------------------------------------------------

/// A wait-free bounded linear-probing hash table.
///
/// `Table` maps `u32` keys to small `Copy` payloads of type `V` in a slot
/// array whose size is fixed at initialization. Any number of threads may
/// operate on it simultaneously under the single-owner-per-key contract:
/// each distinct key is inserted and removed by one logical owner at a time,
/// while lookups from any thread are always permitted.
///
/// See the [crate-level documentation][crate] for the concurrency contract
/// and an overview of the probing algorithm.
///
/// # Type Parameters
///
/// - `V`: The payload type. Must be `Copy`; values are copied in and out of
///   slots, never referenced in place.
/// - `P`: Configuration implementing [`Params`]. Defaults to
///   [`DefaultParams`] (8 probe steps, empty key `0`, heap backing).
///
/// # Examples
///
/// ```
/// use lftab::{Bits, Table, TableDef};
///
/// let table: Table<u64> = Table::init(TableDef::new("conn-by-tid", Bits::new(10)))?;
///
/// table.insert(1234, 0xAB)?;
/// assert_eq!(table.find(1234), Some(0xAB));
/// assert_eq!(table.remove(1234), Some(0xAB));
/// assert_eq!(table.find(1234), None);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Table<V, P = DefaultParams>
where
  P: Params + ?Sized,
{
  inner: Arc<RawTable<V, P>>,
  handle: Weak<dyn Reportable>,
}

impl<V, P> Table<V, P>
where
  V: Copy + Send + 'static,
  P: Params + ?Sized + 'static,
{
  /// Initializes a table from its definition.
  ///
  /// Allocates the backing array through the configured
  /// [`Params::Alloc`] capability, fills every slot with the empty sentinel
  /// and `V::default()` as the vacant payload, and registers the instance
  /// for [`report`][crate::registry::report] output.
  ///
  /// # Errors
  ///
  /// Returns [`InitError::AllocFailed`] when the backing capability declines
  /// the allocation; no instance exists afterwards.
  pub fn init(def: TableDef) -> Result<Self, InitError>
  where
    V: Default,
  {
    Self::init_with(def, V::default())
  }

  /// Initializes a table with an explicit vacant payload.
  ///
  /// The vacant payload is written into a slot whenever it is emptied; a
  /// lookup racing a removal of the same key may transiently observe it.
  /// Choose a value that is recognizable as "no payload" for the domain.
  ///
  /// # Errors
  ///
  /// Returns [`InitError::AllocFailed`] when the backing capability declines
  /// the allocation.
  pub fn init_with(def: TableDef, vacant: V) -> Result<Self, InitError> {
    let inner: Arc<RawTable<V, P>> =
      Arc::new(RawTable::new(def.name, def.bits, def.hash, vacant)?);
    let object: Arc<dyn Reportable> = inner.clone();
    let handle: Weak<dyn Reportable> = Arc::downgrade(&object);

    #[cfg(not(loom))]
    let _ = crate::registry::register(&handle, def.name);

    Ok(Self { inner, handle })
  }
}

impl<V, P> Table<V, P>
where
  V: Copy,
  P: Params + ?Sized,
{
  /// Inserts `key` with `value`.
  ///
  /// The common path is one atomic claim plus one plain store. Inserting a
  /// key this owner already holds overwrites the payload in place and counts
  /// as `overwritten` in the statistics.
  ///
  /// `key` must not equal the configured empty sentinel
  /// ([`Params::EMPTY_KEY`]); that value is reserved for vacant slots and
  /// inserting it is a logic error caught by a debug assertion.
  ///
  /// # Errors
  ///
  /// Returns [`InsertExhausted`] when every slot in the key's probe window
  /// is held by other keys. The table may still have free capacity in other
  /// windows; recovery (different keys, larger capacity, larger probe
  /// bound) is up to the caller.
  ///
  /// # Examples
  ///
  /// ```
  /// use lftab::{Bits, Table, TableDef};
  ///
  /// let table: Table<u32> = Table::init(TableDef::new("doc-insert", Bits::MIN)).unwrap();
  ///
  /// table.insert(7, 1).unwrap();
  /// table.insert(7, 2).unwrap(); // same owner: overwrite
  /// assert_eq!(table.find(7), Some(2));
  /// ```
  #[inline]
  pub fn insert(&self, key: u32, value: V) -> Result<(), InsertExhausted> {
    self.inner.insert(key, value)
  }

  /// Removes `key`, returning its payload.
  ///
  /// The caller must be the sole owner of `key`: no other thread may remove
  /// or re-insert this exact key concurrently. Operations on other keys and
  /// lookups of this key are unaffected.
  ///
  /// Returns [`None`] when the key is absent — a normal outcome, not an
  /// error.
  #[inline]
  pub fn remove(&self, key: u32) -> Option<V> {
    self.inner.remove(key)
  }

  /// Looks up `key`, copying its payload out.
  ///
  /// Read-only and always permitted from any thread. A lookup is not
  /// guaranteed to observe a concurrent insert or remove of the same key
  /// unless the caller establishes a happens-before relationship externally
  /// (for example, the inserting thread signals this one after its insert
  /// returns).
  ///
  /// Returns [`None`] when the key is absent.
  #[inline]
  pub fn find(&self, key: u32) -> Option<V> {
    self.inner.find(key)
  }

  /// Closes the table: deregisters it and frees the backing array.
  ///
  /// Equivalent to dropping the handle. Quiescence is enforced by ownership:
  /// the handle cannot be consumed while any borrow of it is live, so no
  /// operation can race the teardown.
  #[inline]
  pub fn close(self) {
    drop(self);
  }
}

impl<V, P> Table<V, P>
where
  P: Params + ?Sized,
{
  /// Returns the table name used in reports.
  #[inline]
  pub fn name(&self) -> &'static str {
    self.inner.name()
  }

  /// Returns the capacity exponent.
  #[inline]
  pub fn bits(&self) -> Bits {
    self.inner.bits()
  }

  /// Returns the nominal capacity, `1 << bits`.
  #[inline]
  pub fn nominal(&self) -> usize {
    self.inner.nominal()
  }

  /// Returns the backing slot count, `nominal + MAX_TRIES`.
  #[inline]
  pub fn backing(&self) -> usize {
    self.inner.backing()
  }

  /// Returns the backing memory footprint in bytes.
  #[inline]
  pub fn memory_size(&self) -> usize {
    self.inner.memory()
  }

  /// Samples the statistics block.
  #[inline]
  pub fn stats(&self) -> Snapshot {
    self.inner.stats()
  }
}

impl<V, P> Debug for Table<V, P>
where
  P: Params + ?Sized,
{
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Debug::fmt(&self.inner, f)
  }
}

impl<V, P> Drop for Table<V, P>
where
  P: Params + ?Sized,
{
  fn drop(&mut self) {
    #[cfg(not(loom))]
    crate::registry::deregister(&self.handle, self.inner.name());
  }
}
