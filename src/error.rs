//! Error types.
//!
//! Every fallible operation reports its outcome explicitly; nothing in this
//! crate aborts the process. Absent keys on lookup and removal are expressed
//! as [`None`] rather than an error, since they are ordinary outcomes of the
//! probing algorithm.

use core::fmt::Display;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;
use std::error::Error;

// -----------------------------------------------------------------------------
// Init Error
// -----------------------------------------------------------------------------

/// An error raised while initializing a table.
///
/// A failed initialization leaves nothing behind: the instance is never
/// registered and no backing memory is retained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum InitError {
  /// The backing allocator could not provide the requested slot array.
  AllocFailed {
    /// The size of the failed request in bytes.
    bytes: usize,
  },
}

impl Display for InitError {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    match self {
      Self::AllocFailed { bytes } => {
        write!(f, "failed to allocate {bytes} bytes of backing storage")
      }
    }
  }
}

impl Error for InitError {}

// -----------------------------------------------------------------------------
// Insert Exhausted
// -----------------------------------------------------------------------------

/// The probe window for a key was exhausted without claiming a slot.
///
/// Every slot in the key's probe window was held by a different key. This is
/// a capacity/collision condition, not corruption: the caller may retry with
/// a different key strategy, a larger capacity, or a larger probe bound. The
/// table performs none of these automatically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InsertExhausted {
  /// The key whose probe window was exhausted.
  pub key: u32,
}

impl Display for InsertExhausted {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "probe window exhausted inserting key {}", self.key)
  }
}

impl Error for InsertExhausted {}

// -----------------------------------------------------------------------------
// Registry Error
// -----------------------------------------------------------------------------

/// A diagnostic-only registry condition.
///
/// Registry failures never affect table usability; an unregistered table is
/// merely excluded from [`report`][crate::registry::report] output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RegistryError {
  /// The registry already holds its maximum number of tables.
  Full,
  /// The table is already present in the registry.
  Duplicate,
}

impl Display for RegistryError {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    match self {
      Self::Full => write!(f, "table registry is full"),
      Self::Duplicate => write!(f, "table is already registered"),
    }
  }
}
