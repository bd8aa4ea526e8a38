use core::alloc::Layout;
use core::mem;
use core::ptr::NonNull;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use crate::array::Array;
use crate::backing::BackingAlloc;
use crate::backing::Heap;
use crate::backing::Paged;

#[test]
fn test_new_initializes_every_element() {
  let array: Array<usize, Heap> = Array::new(64, |index, uninit| {
    uninit.write(index * 3);
  })
  .unwrap();

  assert_eq!(array.len(), 64);

  for (index, value) in array.as_slice().iter().enumerate() {
    assert_eq!(*value, index * 3);
  }
}

#[test]
fn test_zero_length_is_rejected() {
  let array: Option<Array<usize, Heap>> = Array::new(0, |_, uninit| {
    uninit.write(0);
  });

  assert!(array.is_none());
}

#[test]
fn test_memory_matches_layout() {
  let array: Array<u64, Heap> = Array::new(100, |_, uninit| {
    uninit.write(0);
  })
  .unwrap();

  assert_eq!(array.memory(), 100 * mem::size_of::<u64>());
}

#[test]
fn test_paged_backing_rounds_and_zeroes() {
  let layout: Layout = Layout::array::<u64>(3).unwrap();
  let ptr: NonNull<u8> = Paged::alloc(layout).unwrap();

  assert_eq!(ptr.as_ptr() as usize % 4096, 0);

  // SAFETY: The block spans a full page; `Paged` zero-fills it.
  unsafe {
    for offset in 0..4096 {
      assert_eq!(*ptr.as_ptr().add(offset), 0);
    }

    Paged::dealloc(ptr, layout);
  }
}

#[test]
fn test_paged_rejects_oversized_alignment() {
  let layout: Layout = Layout::from_size_align(64, 8192).unwrap();

  assert!(Paged::alloc(layout).is_none());
}

#[test]
fn test_drop_runs_element_destructors() {
  static DROPS: AtomicUsize = AtomicUsize::new(0);

  struct Tracked;

  impl Drop for Tracked {
    fn drop(&mut self) {
      DROPS.fetch_add(1, Ordering::Relaxed);
    }
  }

  let array: Array<Tracked, Heap> = Array::new(16, |_, uninit| {
    uninit.write(Tracked);
  })
  .unwrap();

  assert_eq!(DROPS.load(Ordering::Relaxed), 0);
  drop(array);
  assert_eq!(DROPS.load(Ordering::Relaxed), 16);
}
