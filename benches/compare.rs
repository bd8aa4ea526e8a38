use std::collections::HashMap;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;
use std::sync::Mutex;

use dashmap::DashMap;
use divan::bench;
use divan::bench_group;
use divan::black_box;
use divan::Bencher;
use lftab::Bits;
use lftab::ConstParams;
use lftab::Table;
use lftab::TableDef;

type LfTab = Table<u64, ConstParams<8>>;

const OPS: &[usize] = &[1 << 8, 1 << 10, 1 << 12];

const THREADS: &[usize] = &[0, 1, 4, 8];

// -----------------------------------------------------------------------------
// Unify APIs for Simplicity
// -----------------------------------------------------------------------------

trait KeyedMap: Sized + Send + Sync + 'static {
  fn new() -> Self;

  fn set(&self, key: u32, value: u64) -> bool;

  fn get(&self, key: u32) -> Option<u64>;

  fn del(&self, key: u32) -> Option<u64>;
}

impl KeyedMap for LfTab {
  fn new() -> Self {
    Table::init(TableDef::new("bench", Bits::new(16))).unwrap()
  }

  fn set(&self, key: u32, value: u64) -> bool {
    self.insert(key, value).is_ok()
  }

  fn get(&self, key: u32) -> Option<u64> {
    self.find(key)
  }

  fn del(&self, key: u32) -> Option<u64> {
    self.remove(key)
  }
}

impl KeyedMap for Mutex<HashMap<u32, u64>> {
  fn new() -> Self {
    Mutex::new(HashMap::new())
  }

  fn set(&self, key: u32, value: u64) -> bool {
    self.lock().unwrap().insert(key, value);
    true
  }

  fn get(&self, key: u32) -> Option<u64> {
    self.lock().unwrap().get(&key).copied()
  }

  fn del(&self, key: u32) -> Option<u64> {
    self.lock().unwrap().remove(&key)
  }
}

impl KeyedMap for DashMap<u32, u64> {
  fn new() -> Self {
    DashMap::new()
  }

  fn set(&self, key: u32, value: u64) -> bool {
    self.insert(key, value);
    true
  }

  fn get(&self, key: u32) -> Option<u64> {
    self.get(&key).map(|entry| *entry)
  }

  fn del(&self, key: u32) -> Option<u64> {
    self.remove(&key).map(|(_, value)| value)
  }
}

// -----------------------------------------------------------------------------
// Actual Benchmarks
// -----------------------------------------------------------------------------

#[bench_group(name = "ReadHot", skip_ext_time, threads = THREADS)]
mod read_hot {
  use super::bench;
  use super::*;

  fn bench<T>(bencher: Bencher<'_, '_>, ops: usize)
  where
    T: KeyedMap,
  {
    let this: T = T::new();

    assert!(this.set(1, 42));

    bencher.counter(ops).bench(move || {
      for _ in 0..ops {
        let item: Option<u64> = black_box(this.get(black_box(1)));
        _ = black_box(item.unwrap());
      }
    });
  }

  #[bench(args = OPS)]
  fn bench_lftab(bencher: Bencher<'_, '_>, ops: usize) {
    bench::<LfTab>(bencher, ops);
  }

  #[bench(args = OPS)]
  fn bench_mutex(bencher: Bencher<'_, '_>, ops: usize) {
    bench::<Mutex<HashMap<u32, u64>>>(bencher, ops);
  }

  #[bench(args = OPS)]
  fn bench_dashmap(bencher: Bencher<'_, '_>, ops: usize) {
    bench::<DashMap<u32, u64>>(bencher, ops);
  }
}

#[bench_group(name = "ReadSeq", skip_ext_time, threads = THREADS)]
mod read_seq {
  use super::bench;
  use super::*;

  fn bench<T>(bencher: Bencher<'_, '_>, ops: usize)
  where
    T: KeyedMap,
  {
    let this: T = T::new();

    let keys: Vec<u32> = (1..=ops as u32)
      .filter(|key| this.set(*key, u64::from(*key)))
      .collect();

    bencher.counter(keys.len()).bench(move || {
      for key in keys.iter() {
        let item: Option<u64> = black_box(this.get(black_box(*key)));
        _ = black_box(item.unwrap());
      }
    });
  }

  #[bench(args = OPS)]
  fn bench_lftab(bencher: Bencher<'_, '_>, ops: usize) {
    bench::<LfTab>(bencher, ops);
  }

  #[bench(args = OPS)]
  fn bench_mutex(bencher: Bencher<'_, '_>, ops: usize) {
    bench::<Mutex<HashMap<u32, u64>>>(bencher, ops);
  }

  #[bench(args = OPS)]
  fn bench_dashmap(bencher: Bencher<'_, '_>, ops: usize) {
    bench::<DashMap<u32, u64>>(bencher, ops);
  }
}

#[bench_group(name = "Churn", skip_ext_time, threads = THREADS)]
mod churn {
  use super::bench;
  use super::*;

  /// Hands every invocation its own key so concurrent benchmark threads
  /// remain the sole owners of the keys they churn.
  static DISPENSER: AtomicU32 = AtomicU32::new(1);

  fn bench<T>(bencher: Bencher<'_, '_>, ops: usize)
  where
    T: KeyedMap,
  {
    let this: T = T::new();

    bencher.counter(ops).bench(move || {
      let key: u32 = DISPENSER.fetch_add(1, Ordering::Relaxed);

      for round in 0..ops {
        let stored: bool = black_box(this.set(key, round as u64));
        let gone: Option<u64> = black_box(this.del(key));
        _ = black_box((stored, gone));
      }
    });
  }

  #[bench(args = OPS)]
  fn bench_lftab(bencher: Bencher<'_, '_>, ops: usize) {
    bench::<LfTab>(bencher, ops);
  }

  #[bench(args = OPS)]
  fn bench_mutex(bencher: Bencher<'_, '_>, ops: usize) {
    bench::<Mutex<HashMap<u32, u64>>>(bencher, ops);
  }

  #[bench(args = OPS)]
  fn bench_dashmap(bencher: Bencher<'_, '_>, ops: usize) {
    bench::<DashMap<u32, u64>>(bencher, ops);
  }
}

// -----------------------------------------------------------------------------
// Main
// -----------------------------------------------------------------------------

fn main() {
  divan::main();
}
