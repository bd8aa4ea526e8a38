//! Core table engine.
//!
//! Bounded linear probing over a fixed slot array. The claim protocol is a
//! single compare-and-swap on the slot key; the release protocol clears the
//! value before publishing the empty key. Between them, every operation
//! terminates within `MAX_TRIES` probe steps, win or lose.

use core::fmt::Debug;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;
use core::marker::PhantomData;
use core::mem;

use crossbeam_utils::CachePadded;

use crate::array::Array;
use crate::error::InitError;
use crate::error::InsertExhausted;
use crate::hash;
use crate::hash::HashFn;
use crate::params::Bits;
use crate::params::Params;
use crate::params::ParamsExt;
use crate::registry::Reportable;
use crate::slot::Slot;
use crate::stats::Snapshot;
use crate::stats::Stats;

// -----------------------------------------------------------------------------
// Table State
// -----------------------------------------------------------------------------

/// The probing engine behind a [`Table`].
///
/// Header fields (`mask`, `hash`, the slot pointer) are written once at
/// construction and only read afterwards; the statistics block is the sole
/// constantly-mutated region and is padded onto its own cache lines to keep
/// counter traffic from invalidating the header.
///
/// [`Table`]: crate::public::Table
pub(crate) struct RawTable<V, P>
where
  P: Params + ?Sized,
{
  name: &'static str,
  bits: Bits,
  mask: usize,
  hash: HashFn,
  vacant: V,
  slots: Array<Slot<V>, P::Alloc>,
  stats: CachePadded<Stats>,
  marker: PhantomData<fn(P)>,
}

impl<V, P> RawTable<V, P>
where
  P: Params + ?Sized,
{
  #[inline]
  pub(crate) const fn name(&self) -> &'static str {
    self.name
  }

  #[inline]
  pub(crate) const fn bits(&self) -> Bits {
    self.bits
  }

  /// The nominal capacity: the number of distinct probe window starts.
  #[inline]
  pub(crate) const fn nominal(&self) -> usize {
    self.bits.nominal()
  }

  /// The backing slot count, `nominal + MAX_TRIES`.
  #[inline]
  pub(crate) const fn backing(&self) -> usize {
    self.slots.len()
  }

  /// The backing memory footprint in bytes.
  #[inline]
  pub(crate) const fn memory(&self) -> usize {
    self.slots.memory()
  }

  #[inline]
  pub(crate) fn stats(&self) -> Snapshot {
    self.stats.snapshot()
  }

  /// Counts held slots. Diagnostic only; racy by nature.
  fn occupied(&self) -> usize {
    self
      .slots
      .as_slice()
      .iter()
      .filter(|slot| slot.key() != P::EMPTY_KEY)
      .count()
  }
}

impl<V, P> RawTable<V, P>
where
  V: Copy,
  P: Params + ?Sized,
{
  /// Allocates and sentinel-fills the backing array.
  ///
  /// Every slot is initialized to `(EMPTY_KEY, vacant)` before the table is
  /// observable. A declined allocation leaves no trace of the instance.
  pub(crate) fn new(
    name: &'static str,
    bits: Bits,
    hash: Option<HashFn>,
    vacant: V,
  ) -> Result<Self, InitError> {
    P::validate();

    let backing: usize = bits.nominal() + P::MAX_TRIES;
    let bytes: usize = mem::size_of::<Slot<V>>().saturating_mul(backing);

    let Some(slots) = Array::new(backing, |_, uninit| {
      uninit.write(Slot::new(P::EMPTY_KEY, vacant));
    }) else {
      return Err(InitError::AllocFailed { bytes });
    };

    Ok(Self {
      name,
      bits,
      mask: bits.mask(),
      hash: hash.unwrap_or(hash::hash32shift),
      vacant,
      slots,
      stats: CachePadded::new(Stats::new()),
      marker: PhantomData,
    })
  }

  /// Claims a slot in `key`'s probe window and stores `value`.
  ///
  /// One atomic claim plus one plain store on the fast path. A slot already
  /// held by `key` is the caller's own entry (single-owner-per-key) and is
  /// overwritten in place.
  pub(crate) fn insert(&self, key: u32, value: V) -> Result<(), InsertExhausted> {
    debug_assert_ne!(key, P::EMPTY_KEY, "key equals the empty sentinel");

    self.stats.insert.bump();

    for slot in self.window(key) {
      match slot.claim(P::EMPTY_KEY, key) {
        Ok(_) => {
          slot.fill(value);
          return Ok(());
        }
        Err(held) if held == key => {
          slot.fill(value);
          self.stats.overwritten.bump();
          return Ok(());
        }
        Err(_) => {
          self.stats.collision.bump();
        }
      }
    }

    self.stats.insert_err.bump();

    Err(InsertExhausted { key })
  }

  /// Vacates `key`'s slot and returns the stored value.
  ///
  /// Plain key loads suffice: the caller is the sole owner of `key`, so no
  /// other thread removes or re-inserts this exact key concurrently. The
  /// value is cleared before the key; see [`Slot::vacate`].
  pub(crate) fn remove(&self, key: u32) -> Option<V> {
    self.stats.remove.bump();

    for slot in self.window(key) {
      if slot.key() == key {
        let value: V = slot.value();

        slot.vacate(P::EMPTY_KEY, self.vacant);

        return Some(value);
      }
    }

    self.stats.remove_err.bump();

    None
  }

  /// Looks up `key` and copies its value out.
  ///
  /// Read-only. A find racing the owner's remove of the same key may
  /// transiently return the vacant payload under the old key; it never
  /// attributes a different key's payload to `key`.
  pub(crate) fn find(&self, key: u32) -> Option<V> {
    self.stats.search.bump();

    for slot in self.window(key) {
      if slot.key() == key {
        let value: V = slot.value();

        self.stats.search_ok.bump();

        return Some(value);
      }
    }

    self.stats.search_err.bump();

    None
  }

  /// Computes the probe window start for `key`.
  #[inline]
  fn index(&self, key: u32) -> usize {
    (self.hash)(key) as usize & self.mask
  }

  /// Returns `key`'s probe window: `MAX_TRIES` consecutive slots.
  ///
  /// Strictly linear, never wrapping; the backing array is over-allocated by
  /// `MAX_TRIES` slots so the window is in bounds from any start index.
  #[inline]
  fn window(&self, key: u32) -> impl Iterator<Item = &Slot<V>> {
    let index: usize = self.index(key);

    self.slots.as_slice()[index..index + P::MAX_TRIES].iter()
  }
}

impl<V, P> Debug for RawTable<V, P>
where
  P: Params + ?Sized,
{
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct("Table")
      .field("name", &self.name)
      .field("bits", &self.bits)
      .field("params", &P::debug())
      .field("occupied", &self.occupied())
      .finish_non_exhaustive()
  }
}

impl<V, P> Reportable for RawTable<V, P>
where
  V: Copy + Send,
  P: Params + ?Sized,
{
  fn name(&self) -> &'static str {
    self.name
  }

  fn nominal(&self) -> usize {
    self.nominal()
  }

  fn memory(&self) -> usize {
    self.memory()
  }

  fn snapshot(&self) -> Snapshot {
    self.stats()
  }
}

// SAFETY: The slot array is `Send`/`Sync` for `V: Copy + Send` (see `Slot`);
// every other field is plain read-only data after construction.
unsafe impl<V, P> Send for RawTable<V, P>
where
  V: Copy + Send,
  P: Params + ?Sized,
{
}

// SAFETY: Shared access is mediated by the slot claim protocol; the table
// never hands out references into slot cells, only copies.
unsafe impl<V, P> Sync for RawTable<V, P>
where
  V: Copy + Send,
  P: Params + ?Sized,
{
}
