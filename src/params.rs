use core::any;
use core::fmt::Debug;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;
use core::marker::PhantomData;

use crate::backing::BackingAlloc;
use crate::backing::Heap;
use crate::backing::Paged;

// -----------------------------------------------------------------------------
// Configurable Params
// -----------------------------------------------------------------------------

/// Configuration parameters for a [`Table`].
///
/// A `Params` type fixes, at compile time, everything a table type shares
/// across its instances: the probe bound, the reserved empty key, and the
/// backing storage regime. Per-instance settings (name, capacity, hash
/// function) live in [`TableDef`].
///
/// The simplest approach is [`ConstParams`]:
///
/// ```no_run
/// use lftab::{ConstParams, Table};
///
/// type SessionTable = Table<u64, ConstParams<16>>;
/// ```
///
/// # Implementing `Params`
///
/// For advanced use cases, implement directly:
///
/// ```no_run
/// use lftab::backing::Heap;
/// use lftab::{Params, Table};
///
/// struct SparseParams;
///
/// impl Params for SparseParams {
///   const MAX_TRIES: usize = 32;
///   const EMPTY_KEY: u32 = u32::MAX;
///
///   type Alloc = Heap;
/// }
///
/// let table: Result<Table<u64, SparseParams>, _> = Table::init(
///   lftab::TableDef::new("sparse", lftab::Bits::new(12)),
/// );
/// ```
///
/// [`Table`]: crate::public::Table
/// [`TableDef`]: crate::public::TableDef
pub trait Params {
  /// The hard upper bound on probe sequence length.
  ///
  /// Every operation terminates within `MAX_TRIES` probe steps, win or lose.
  /// The backing array is over-allocated by this many slots so the probe
  /// sequence never wraps around the nominal capacity.
  const MAX_TRIES: usize = DefaultParams::MAX_TRIES;

  /// The reserved key denoting an empty slot.
  ///
  /// A real key must never equal this value; inserting it is a logic error
  /// caught by a debug assertion.
  const EMPTY_KEY: u32 = DefaultParams::EMPTY_KEY;

  /// The backing storage capability used for the slot array.
  type Alloc: BackingAlloc;
}

// -----------------------------------------------------------------------------
// Configurable Params - Extensions
// -----------------------------------------------------------------------------

/// Derived behavior computed from [`Params`].
///
/// Automatically implemented for all [`Params`] types.
pub trait ParamsExt: Params + Sealed {
  /// Asserts that the configured constants are usable.
  ///
  /// Called once per table initialization; panics on a misconfigured type,
  /// which is a programming error rather than a runtime condition.
  fn validate() {
    assert!(Self::MAX_TRIES >= 1, "invalid params: `MAX_TRIES` must be non-zero");
    assert!(
      Self::MAX_TRIES <= 1 << 16,
      "invalid params: `MAX_TRIES` must be at most 2^16",
    );
  }

  #[inline]
  fn debug() -> DebugParams<Self> {
    DebugParams {
      marker: PhantomData,
    }
  }
}

// -----------------------------------------------------------------------------
// Debug Params
// -----------------------------------------------------------------------------

/// A helper type for displaying [`Params`] configuration.
///
/// Returned by [`ParamsExt::debug`]; implements [`Debug`] to show all
/// configured values.
#[derive(Clone, Copy)]
pub struct DebugParams<P>
where
  P: ?Sized,
{
  marker: PhantomData<fn(P)>,
}

impl<P> Debug for DebugParams<P>
where
  P: Params + ?Sized,
{
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct(any::type_name::<P>())
      .field("MAX_TRIES", &P::MAX_TRIES)
      .field("EMPTY_KEY", &P::EMPTY_KEY)
      .field("Alloc", &any::type_name::<P::Alloc>())
      .finish()
  }
}

// -----------------------------------------------------------------------------
// Default Params
// -----------------------------------------------------------------------------

/// The default table configuration: 8 probe steps, empty key `0`, heap
/// backing.
///
/// Used when creating a [`Table`] without specifying a custom [`Params`]
/// type.
///
/// [`Table`]: crate::public::Table
#[derive(Clone, Copy)]
#[non_exhaustive]
pub struct DefaultParams;

impl Debug for DefaultParams {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Debug::fmt(&<Self as ParamsExt>::debug(), f)
  }
}

impl Params for DefaultParams {
  const MAX_TRIES: usize = 8;
  const EMPTY_KEY: u32 = 0;

  type Alloc = Heap;
}

// -----------------------------------------------------------------------------
// Const-Generic Params
// -----------------------------------------------------------------------------

/// A [`Params`] implementation with a compile-time configurable probe bound.
///
/// The recommended way to tune the probe bound. Shorter bounds give tighter
/// worst-case latency at the cost of earlier insert exhaustion in crowded
/// probe windows.
///
/// # Examples
///
/// ```no_run
/// use lftab::{Bits, ConstParams, Table, TableDef};
///
/// let table: Table<u64, ConstParams<4>> =
///   Table::init(TableDef::new("short-probes", Bits::new(10))).unwrap();
/// ```
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[non_exhaustive]
pub struct ConstParams<const TRIES: usize>;

impl<const TRIES: usize> Params for ConstParams<TRIES> {
  const MAX_TRIES: usize = TRIES;

  type Alloc = Heap;
}

// -----------------------------------------------------------------------------
// Paged Params
// -----------------------------------------------------------------------------

/// A [`Params`] implementation backed by page-granular, zeroed allocations.
///
/// Intended for hosts where backing memory must be requested in whole pages;
/// see [`Paged`] for the allocation contract. Probe bound and empty key match
/// [`DefaultParams`].
#[derive(Clone, Copy)]
#[non_exhaustive]
pub struct PagedParams;

impl Debug for PagedParams {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Debug::fmt(&<Self as ParamsExt>::debug(), f)
  }
}

impl Params for PagedParams {
  type Alloc = Paged;
}

// -----------------------------------------------------------------------------
// Auto-implement Derive
// -----------------------------------------------------------------------------

mod private {
  pub trait Sealed {}
}

use private::Sealed;

impl<P> Sealed for P where P: Params + ?Sized {}
impl<P> ParamsExt for P where P: Params + ?Sized {}

// -----------------------------------------------------------------------------
// Bits
// -----------------------------------------------------------------------------

/// A validated table capacity exponent.
///
/// `Bits` is the base-2 logarithm of a table's nominal slot count, clamped to
/// <code>[MIN]..=[MAX]</code>. The nominal capacity is always a power of two,
/// so hash-to-index reduction is a single mask operation.
///
/// # Construction
///
/// Use [`new()`] to create from an arbitrary exponent; out-of-range values
/// are clamped.
///
/// ```
/// use lftab::Bits;
///
/// // In range
/// assert_eq!(Bits::new(10).nominal(), 1024);
///
/// // Clamped to minimum
/// assert_eq!(Bits::new(0), Bits::MIN);
///
/// // Clamped to maximum
/// assert_eq!(Bits::new(99), Bits::MAX);
/// ```
///
/// [MIN]: Self::MIN
/// [MAX]: Self::MAX
/// [`new()`]: Self::new
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Bits(u32);

impl Bits {
  /// The minimum supported exponent (2⁴ nominal slots).
  pub const MIN: Self = Self(4);

  /// The maximum supported exponent (2²⁷ nominal slots).
  pub const MAX: Self = Self(27);

  /// The default exponent (2¹⁰ nominal slots).
  pub const DEF: Self = Self(10);

  /// Creates a new [`Bits`], clamping to <code>[MIN]..=[MAX]</code>.
  ///
  /// [MIN]: Self::MIN
  /// [MAX]: Self::MAX
  #[inline]
  pub const fn new(bits: u32) -> Self {
    if bits < Self::MIN.0 {
      Self::MIN
    } else if bits > Self::MAX.0 {
      Self::MAX
    } else {
      Self(bits)
    }
  }

  /// Returns the exponent as a [`u32`].
  #[inline]
  pub const fn get(self) -> u32 {
    self.0
  }

  /// Returns the nominal slot count, `1 << bits`.
  #[inline]
  pub const fn nominal(self) -> usize {
    1_usize << self.0
  }

  /// Returns the index mask, `nominal - 1`.
  ///
  /// Because the nominal capacity is a power of two, `hash & mask` is an
  /// exact modulo reduction.
  #[inline]
  pub const fn mask(self) -> usize {
    self.nominal() - 1
  }
}

impl Debug for Bits {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "{:?} (1 << {:?})", self.nominal(), self.0)
  }
}

impl Default for Bits {
  #[inline]
  fn default() -> Self {
    Self::DEF
  }
}

impl From<Bits> for u32 {
  #[inline]
  fn from(other: Bits) -> Self {
    other.get()
  }
}
