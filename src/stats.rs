//! Operation statistics.
//!
//! Each table owns one [`Stats`] block of monotonically increasing counters.
//! Counters are diagnostic, not correctness state: they are bumped with an
//! unfenced load/store pair, so concurrent bumps may lose increments, and no
//! counter ever feeds back into the probing algorithm. [`Snapshot`] copies
//! the block out for rendering and assertions.

use crate::sync::atomic::AtomicU64;
use crate::sync::atomic::Ordering::Relaxed;

// -----------------------------------------------------------------------------
// Counter
// -----------------------------------------------------------------------------

/// A monotonic, deliberately lossy event counter.
#[derive(Debug)]
#[repr(transparent)]
pub(crate) struct Counter {
  inner: AtomicU64,
}

impl Counter {
  #[inline]
  fn new() -> Self {
    Self {
      inner: AtomicU64::new(0),
    }
  }

  /// Records one event.
  ///
  /// A plain load/store pair rather than a read-modify-write: increments
  /// racing on the same counter may be lost. Accepted for the hot path;
  /// counters never carry correctness state.
  #[inline]
  pub(crate) fn bump(&self) {
    self.inner.store(self.inner.load(Relaxed).wrapping_add(1), Relaxed);
  }

  #[inline]
  pub(crate) fn get(&self) -> u64 {
    self.inner.load(Relaxed)
  }
}

// -----------------------------------------------------------------------------
// Stats
// -----------------------------------------------------------------------------

/// The per-table statistics block.
#[derive(Debug)]
pub(crate) struct Stats {
  /// Insert calls, regardless of outcome.
  pub(crate) insert: Counter,
  /// Remove calls, regardless of outcome.
  pub(crate) remove: Counter,
  /// Find calls, regardless of outcome.
  pub(crate) search: Counter,
  /// Probe steps that skipped a slot held by a different key.
  pub(crate) collision: Counter,
  /// Inserts that replaced the caller's own existing entry.
  pub(crate) overwritten: Counter,
  /// Inserts that exhausted their probe window.
  pub(crate) insert_err: Counter,
  /// Removes that exhausted their probe window.
  pub(crate) remove_err: Counter,
  /// Finds that located their key.
  pub(crate) search_ok: Counter,
  /// Finds that exhausted their probe window.
  pub(crate) search_err: Counter,
}

impl Stats {
  pub(crate) fn new() -> Self {
    Self {
      insert: Counter::new(),
      remove: Counter::new(),
      search: Counter::new(),
      collision: Counter::new(),
      overwritten: Counter::new(),
      insert_err: Counter::new(),
      remove_err: Counter::new(),
      search_ok: Counter::new(),
      search_err: Counter::new(),
    }
  }

  /// Copies the block out.
  ///
  /// Counters are read one at a time with no ordering between them; a
  /// snapshot taken while writers run is internally inconsistent but never
  /// torn within a single counter.
  pub(crate) fn snapshot(&self) -> Snapshot {
    Snapshot {
      insert: self.insert.get(),
      remove: self.remove.get(),
      search: self.search.get(),
      collision: self.collision.get(),
      overwritten: self.overwritten.get(),
      insert_err: self.insert_err.get(),
      remove_err: self.remove_err.get(),
      search_ok: self.search_ok.get(),
      search_err: self.search_err.get(),
    }
  }
}

// -----------------------------------------------------------------------------
// Snapshot
// -----------------------------------------------------------------------------

/// A copied-out view of a table's statistics block.
///
/// # Examples
///
/// ```
/// use lftab::{Bits, Table, TableDef};
///
/// let table: Table<u64> = Table::init(TableDef::new("doc", Bits::MIN)).unwrap();
///
/// table.insert(7, 700).unwrap();
/// assert_eq!(table.stats().insert, 1);
/// assert_eq!(table.stats().ops(), 1);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct Snapshot {
  /// Insert calls, regardless of outcome.
  pub insert: u64,
  /// Remove calls, regardless of outcome.
  pub remove: u64,
  /// Find calls, regardless of outcome.
  pub search: u64,
  /// Probe steps that skipped a slot held by a different key.
  pub collision: u64,
  /// Inserts that replaced the caller's own existing entry.
  pub overwritten: u64,
  /// Inserts that exhausted their probe window.
  pub insert_err: u64,
  /// Removes that exhausted their probe window.
  pub remove_err: u64,
  /// Finds that located their key.
  pub search_ok: u64,
  /// Finds that exhausted their probe window.
  pub search_err: u64,
}

impl Snapshot {
  /// Counter names in declaration order, as rendered by reports.
  pub const NAMES: [&'static str; 9] = [
    "Insert",
    "Remove",
    "Search",
    "Collision",
    "Overwritten",
    "Insert_err",
    "Remove_err",
    "Search_ok",
    "Search_err",
  ];

  /// The aggregate operation count: `insert + remove + search`.
  #[inline]
  #[must_use]
  pub const fn ops(&self) -> u64 {
    self.insert + self.remove + self.search
  }

  /// Returns the counters in declaration order, paired with their names.
  pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> {
    Self::NAMES.into_iter().zip([
      self.insert,
      self.remove,
      self.search,
      self.collision,
      self.overwritten,
      self.insert_err,
      self.remove_err,
      self.search_ok,
      self.search_err,
    ])
  }
}
