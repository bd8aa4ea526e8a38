//! Process-wide table registry and reporting.
//!
//! Live tables register themselves at initialization and deregister at
//! close, solely so [`report`] can enumerate them. The registry is bounded
//! and mutex-guarded; it is never touched by insert/remove/find, so the lock
//! cannot block writers. A full registry or a duplicate registration is
//! logged and otherwise ignored: the table stays fully usable, merely
//! unreported.

use core::fmt::Display;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::Weak;

use log::debug;
use log::warn;

use crate::error::RegistryError;
use crate::stats::Snapshot;

/// The maximum number of simultaneously registered tables.
pub(crate) const CAPACITY: usize = 64;

/// The registry-facing view of a live table.
pub(crate) trait Reportable: Send + Sync {
  fn name(&self) -> &'static str;

  fn nominal(&self) -> usize;

  fn memory(&self) -> usize;

  fn snapshot(&self) -> Snapshot;
}

// -----------------------------------------------------------------------------
// Registry
// -----------------------------------------------------------------------------

static REGISTRY: Mutex<Registry> = Mutex::new(Registry::new());

struct Registry {
  entries: [Option<Weak<dyn Reportable>>; CAPACITY],
}

impl Registry {
  const fn new() -> Self {
    Self {
      entries: [const { None }; CAPACITY],
    }
  }
}

fn lock() -> MutexGuard<'static, Registry> {
  // The registry holds no invariants a panicking thread could break
  // mid-update, so a poisoned lock is still usable.
  REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Adds a table to the registry.
///
/// An entry whose table has already been dropped counts as free and is
/// reclaimed in passing.
pub(crate) fn register(
  table: &Weak<dyn Reportable>,
  name: &'static str,
) -> Result<(), RegistryError> {
  let mut registry: MutexGuard<'_, Registry> = lock();
  let mut vacant: Option<usize> = None;

  for (index, entry) in registry.entries.iter().enumerate() {
    match entry {
      Some(existing) if Weak::ptr_eq(existing, table) => {
        warn!("table {name} is already registered");
        return Err(RegistryError::Duplicate);
      }
      Some(existing) if existing.strong_count() > 0 => {}
      _ if vacant.is_none() => {
        vacant = Some(index);
      }
      _ => {}
    }
  }

  let Some(index) = vacant else {
    warn!("table registry is full; {name} will not be reported");
    return Err(RegistryError::Full);
  };

  debug!("registered table {name}");
  registry.entries[index] = Some(Weak::clone(table));

  Ok(())
}

/// Removes a table from the registry.
///
/// A table that never made it into the registry deregisters as a no-op.
pub(crate) fn deregister(table: &Weak<dyn Reportable>, name: &'static str) {
  let mut registry: MutexGuard<'_, Registry> = lock();

  for entry in &mut registry.entries {
    let found: bool = entry
      .as_ref()
      .is_some_and(|existing| Weak::ptr_eq(existing, table));

    if found {
      debug!("removed table {name} from the registry");
      *entry = None;
    }
  }
}

// -----------------------------------------------------------------------------
// Reporting
// -----------------------------------------------------------------------------

/// Renders a text report of every live table.
///
/// One row per registered table: name, nominal size, backing memory in
/// bytes, the aggregate operation count, then every statistics counter. The
/// registry lock is dropped before any counter is read, and counters are
/// sampled while operations run, so rows are diagnostic snapshots with no
/// cross-counter consistency guarantee.
///
/// # Examples
///
/// ```
/// use lftab::{Bits, Table, TableDef};
///
/// let table: Table<u32> = Table::init(TableDef::new("sessions", Bits::MIN)).unwrap();
///
/// table.insert(7, 700).unwrap();
/// assert!(lftab::report().contains("sessions"));
/// ```
#[must_use]
pub fn report() -> String {
  let live: Vec<Arc<dyn Reportable>> = lock()
    .entries
    .iter()
    .flatten()
    .filter_map(Weak::upgrade)
    .collect();

  Render { tables: &live }.to_string()
}

struct Render<'a> {
  tables: &'a [Arc<dyn Reportable>],
}

impl Display for Render<'_> {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "\n{:<25} {:>12} {:>12} {:>12}", "Name", "Size", "Memory", "Ops")?;

    for name in Snapshot::NAMES {
      write!(f, " {name:>12}")?;
    }

    writeln!(f)?;

    for table in self.tables {
      let stats: Snapshot = table.snapshot();

      write!(
        f,
        "{:<25} {:>12} {:>12} {:>12}",
        table.name(),
        table.nominal(),
        table.memory(),
        stats.ops(),
      )?;

      for (_, value) in stats.iter() {
        write!(f, " {value:>12}")?;
      }

      writeln!(f)?;
    }

    Ok(())
  }
}
