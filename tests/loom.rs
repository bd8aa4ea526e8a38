#![cfg(loom)]

use loom::sync::Arc;
use loom::thread;
use loom::thread::JoinHandle;

use lftab::hash;
use lftab::Bits;
use lftab::ConstParams;
use lftab::InsertExhausted;
use lftab::Table;
use lftab::TableDef;

type LoomTable = Arc<Table<u32, ConstParams<2>>>;

type Insert = JoinHandle<Result<(), InsertExhausted>>;
type Remove = JoinHandle<Option<u32>>;
type Lookup = JoinHandle<Option<u32>>;

/// Keys that all probe from slot zero under the identity hash.
const fn colliding(index: u32) -> u32 {
  16 << index
}

fn model_table(name: &'static str) -> LoomTable {
  Arc::new(Table::init(TableDef::new(name, Bits::MIN).hash(hash::identity)).unwrap())
}

fn spawn_insert(table: &LoomTable, key: u32, value: u32) -> Insert {
  let table: LoomTable = LoomTable::clone(table);
  thread::spawn(move || table.insert(key, value))
}

fn spawn_remove(table: &LoomTable, key: u32) -> Remove {
  let table: LoomTable = LoomTable::clone(table);
  thread::spawn(move || table.remove(key))
}

fn spawn_lookup(table: &LoomTable, key: u32) -> Lookup {
  let table: LoomTable = LoomTable::clone(table);
  thread::spawn(move || table.find(key))
}

#[test]
fn test_claim_race_distinct_keys() {
  loom::model(|| {
    let table: LoomTable = model_table("claim-race");

    let insert_a: Insert = spawn_insert(&table, colliding(0), 1);
    let insert_b: Insert = spawn_insert(&table, colliding(1), 2);

    // Two keys contending for a two-slot window: the slot-claim CAS admits
    // exactly one owner per slot, so both inserts land.
    assert!(insert_a.join().unwrap().is_ok());
    assert!(insert_b.join().unwrap().is_ok());

    assert_eq!(table.find(colliding(0)), Some(1));
    assert_eq!(table.find(colliding(1)), Some(2));
  });
}

#[test]
fn test_claim_race_overflow() {
  loom::model(|| {
    let table: LoomTable = model_table("claim-overflow");

    let inserts: [Insert; 3] = [
      spawn_insert(&table, colliding(0), 1),
      spawn_insert(&table, colliding(1), 2),
      spawn_insert(&table, colliding(2), 3),
    ];

    let mut landed: usize = 0;

    for handle in inserts {
      if handle.join().unwrap().is_ok() {
        landed += 1;
      }
    }

    // Three keys, two slots: a thread only fails once both slots are
    // claimed, and each winner claims exactly one.
    assert_eq!(landed, 2);
  });
}

#[test]
fn test_remove_releases_slot_to_new_key() {
  loom::model(|| {
    let table: LoomTable = model_table("release-acquire");

    table.insert(colliding(0), 1).unwrap();
    table.insert(colliding(1), 2).unwrap();

    // The window is full; a third key can only land by observing the
    // removal's release store with its claiming CAS.
    let remove: Remove = spawn_remove(&table, colliding(0));
    let insert: Insert = spawn_insert(&table, colliding(2), 3);

    assert_eq!(remove.join().unwrap(), Some(1));

    if insert.join().unwrap().is_ok() {
      assert_eq!(table.find(colliding(2)), Some(3));
    }

    assert_eq!(table.find(colliding(0)), None);
    assert_eq!(table.find(colliding(1)), Some(2));
  });
}

#[test]
fn test_lookup_unaffected_by_other_key_removal() {
  loom::model(|| {
    let table: LoomTable = model_table("lookup-other");

    table.insert(colliding(0), 1).unwrap();
    table.insert(colliding(1), 2).unwrap();

    let remove: Remove = spawn_remove(&table, colliding(0));
    let lookup: Lookup = spawn_lookup(&table, colliding(1));

    assert_eq!(remove.join().unwrap(), Some(1));
    assert_eq!(lookup.join().unwrap(), Some(2));
  });
}

#[test]
fn test_lookup_misses_during_foreign_churn() {
  loom::model(|| {
    let table: LoomTable = model_table("lookup-miss");

    table.insert(colliding(0), 1).unwrap();

    let insert: Insert = spawn_insert(&table, colliding(1), 2);
    let lookup: Lookup = spawn_lookup(&table, colliding(2));

    // A key that was never inserted is never reported present, regardless
    // of how the concurrent insert interleaves with the probe.
    assert_eq!(lookup.join().unwrap(), None);
    assert!(insert.join().unwrap().is_ok());
  });
}
