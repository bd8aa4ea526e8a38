//! The `(key, value)` storage cell.
//!
//! The key field is the sole arbitration point between threads: a slot is
//! claimed by swinging its key from the empty sentinel to a real key with a
//! compare-and-swap, and released by storing the sentinel back with release
//! ordering after the value has been cleared. All cross-thread visibility is
//! established through operations on the key alone.

use crate::cell::UnsafeCell;
use crate::sync::atomic::AtomicU32;
use crate::sync::atomic::Ordering::Acquire;
use crate::sync::atomic::Ordering::Relaxed;
use crate::sync::atomic::Ordering::Release;

/// One storage cell of a slot array.
pub(crate) struct Slot<V> {
  key: AtomicU32,
  value: UnsafeCell<V>,
}

impl<V> Slot<V> {
  /// Loads the current key.
  ///
  /// Acquire ordering pairs with [`vacate()`]: a thread that observes the
  /// empty sentinel also observes the vacating thread's value clear.
  ///
  /// [`vacate()`]: Self::vacate
  #[inline]
  pub(crate) fn key(&self) -> u32 {
    self.key.load(Acquire)
  }

  /// Attempts to claim this slot for `key`, swinging it from `empty_key`.
  ///
  /// Returns the witnessed key on failure. A strong exchange: a spurious
  /// failure here would skip a genuinely empty slot and break the bounded
  /// probe success guarantee.
  #[inline]
  pub(crate) fn claim(&self, empty_key: u32, key: u32) -> Result<u32, u32> {
    self.key.compare_exchange(empty_key, key, Acquire, Relaxed)
  }
}

impl<V> Slot<V>
where
  V: Copy,
{
  #[inline]
  pub(crate) fn new(empty_key: u32, vacant: V) -> Self {
    Self {
      key: AtomicU32::new(empty_key),
      value: UnsafeCell::new(vacant),
    }
  }

  /// Reads the value.
  ///
  /// A volatile read: the claiming owner is the only writer of this cell
  /// while the slot is held, but a reader racing the owner's [`vacate()`]
  /// may observe the vacant payload under the not-yet-cleared key. The race
  /// is confined to `Copy` plain data; payloads wider than a machine word
  /// may tear between the stored and vacant payloads in that window.
  #[inline]
  pub(crate) fn value(&self) -> V {
    // SAFETY: The cell always holds an initialized `V`; see the racing
    // contract above.
    self.value.with(|ptr| unsafe { ptr.read_volatile() })
  }

  /// Writes the value.
  ///
  /// Only the thread that claimed the slot (or re-claimed it by matching its
  /// own key) may call this.
  #[inline]
  pub(crate) fn fill(&self, value: V) {
    // SAFETY: Single-owner-per-key confines writes to the claiming thread.
    self.value.with_mut(|ptr| unsafe { ptr.write_volatile(value) });
  }

  /// Clears the value, then releases the slot.
  ///
  /// The value is cleared to `vacant` strictly before the key store: the
  /// release ordering guarantees that any thread whose claim observes the
  /// empty sentinel also observes the cleared value, so a stale reader can
  /// never attribute a new owner's payload to the old key.
  #[inline]
  pub(crate) fn vacate(&self, empty_key: u32, vacant: V) {
    self.fill(vacant);
    self.key.store(empty_key, Release);
  }
}

// SAFETY: The key is atomic and the value cell is governed by the claim
// protocol: writes are confined to the claiming owner, and racing reads only
// produce `Copy` data. `V: Send` because removal moves values across threads.
unsafe impl<V> Send for Slot<V> where V: Copy + Send {}

// SAFETY: See the `Send` reasoning; shared access never produces a reference
// into the cell, only copies out of it.
unsafe impl<V> Sync for Slot<V> where V: Copy + Send {}
