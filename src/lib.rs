//! A wait-free, bounded linear-probing concurrent hash table.
//!
//! `lftab` provides [`Table`], a fixed-capacity map from `u32` keys to small
//! `Copy` payloads, built for highest-throughput concurrent insert, remove,
//! and find under a restricted contract: each distinct key has one logical
//! owner that inserts and removes it, while lookups from any thread are
//! always permitted. Typical keys are thread or process identifiers; typical
//! payloads are descriptors, pointers-as-integers, or other word-sized data.
//!
//! # Overview
//!
//! Collisions are resolved by linear probing, bounded by a per-type constant
//! `MAX_TRIES`. The backing array is over-allocated by `MAX_TRIES` slots, so
//! a probe sequence starting anywhere in the nominal range runs straight
//! ahead without ever wrapping — no modular arithmetic per step, and every
//! operation finishes within `MAX_TRIES` probe steps, win or lose. That
//! bound is what makes the operations wait-free rather than merely
//! lock-free.
//!
//! A slot is claimed with a single compare-and-swap on its key field and
//! released by clearing the value before storing the empty sentinel back
//! with release ordering. There are no locks, no blocking, no allocation
//! after initialization, and no resizing.
//!
//! # Usage
//!
//! ```
//! use lftab::{Bits, Table, TableDef};
//!
//! // 2^10 nominal slots, default probe bound and hash
//! let table: Table<u64> = Table::init(TableDef::new("conn-by-tid", Bits::new(10)))?;
//!
//! table.insert(4117, 0xFEED)?;
//! assert_eq!(table.find(4117), Some(0xFEED));
//! assert_eq!(table.remove(4117), Some(0xFEED));
//! assert_eq!(table.find(4117), None);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Concurrency
//!
//! Threads share a table by reference; the single-owner-per-key rule is the
//! caller's obligation, not enforced by the table. Violating it (two threads
//! inserting or removing the *same* key concurrently) does not corrupt
//! memory but produces undefined interleavings of that key's payload.
//!
//! ```
//! use lftab::{Bits, ConstParams, Table, TableDef};
//! use std::thread;
//!
//! let table: Table<u32, ConstParams<4>> =
//!   Table::init(TableDef::new("per-thread", Bits::new(8)))?;
//!
//! thread::scope(|scope| {
//!   for owner in 1..=4 {
//!     let table = &table;
//!
//!     scope.spawn(move || {
//!       let key: u32 = owner * 1000;
//!
//!       for round in 0..100 {
//!         table.insert(key, round).unwrap();
//!         assert_eq!(table.find(key), Some(round));
//!         assert_eq!(table.remove(key), Some(round));
//!       }
//!     });
//!   }
//! });
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Statistics and reporting
//!
//! Every table keeps a block of monotonic diagnostic counters, sampled with
//! [`Table::stats`]. Live tables are tracked in a bounded process-wide
//! registry; [`report`] renders one text row per table with its size, memory
//! footprint, and counters. Counters are deliberately lossy under contention
//! and never influence the algorithm.
//!
//! # Capacity and exhaustion
//!
//! Capacity is fixed at initialization: `1 << bits` nominal slots, clamped
//! to <code>[Bits::MIN]..=[Bits::MAX]</code>. An insert whose entire probe
//! window is held by other keys fails with [`InsertExhausted`] — a
//! recoverable condition the caller handles by choosing different keys, a
//! larger capacity, or a larger probe bound.
//!
//! # Backing storage
//!
//! The slot array comes from a [`BackingAlloc`] capability selected by the
//! [`Params`] type: [`Heap`] for ordinary processes, [`Paged`] for hosts
//! that deal in whole zeroed pages. The engine itself never branches on the
//! execution environment.
//!
//! [`BackingAlloc`]: crate::backing::BackingAlloc
//! [`Heap`]: crate::backing::Heap
//! [`Paged`]: crate::backing::Paged

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod array;
mod error;
mod params;
mod public;
mod registry;
mod slot;
mod stats;
mod table;
mod utils;

pub mod backing;
pub mod hash;

#[cfg(test)]
mod tests;

pub(crate) use crate::utils::alloc;
pub(crate) use crate::utils::cell;
pub(crate) use crate::utils::sync;

pub mod config {
  //! Configuration parameters which can be used to override the default
  //! table settings.

  pub use crate::params::Bits;
  pub use crate::params::ConstParams;
  pub use crate::params::DebugParams;
  pub use crate::params::DefaultParams;
  pub use crate::params::PagedParams;
  pub use crate::params::Params;
  pub use crate::params::ParamsExt;
}

#[doc(inline)]
pub use self::config::Bits;

#[doc(inline)]
pub use self::config::ConstParams;

#[doc(inline)]
pub use self::config::DefaultParams;

#[doc(inline)]
pub use self::config::PagedParams;

#[doc(inline)]
pub use self::config::Params;

pub use self::error::InitError;
pub use self::error::InsertExhausted;

pub use self::hash::HashFn;

pub use self::public::Table;
pub use self::public::TableDef;

pub use self::registry::report;

pub use self::stats::Snapshot;
