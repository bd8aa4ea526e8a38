use core::alloc::Layout;
use core::ptr::NonNull;

use crate::alloc::alloc;
use crate::alloc::dealloc;
use crate::backing::BackingAlloc;

/// Backing storage from the global allocator.
///
/// The ordinary user-space regime: requests go straight to the process heap
/// with the exact layout of the slot array.
#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub struct Heap;

// SAFETY: Blocks come from the global allocator with the requested layout and
// are returned to it with the same layout.
unsafe impl BackingAlloc for Heap {
  #[inline]
  fn alloc(layout: Layout) -> Option<NonNull<u8>> {
    debug_assert!(layout.size() > 0);

    // SAFETY: `layout` has non-zero size, checked by the table's sizing
    // logic before any allocation request is made.
    NonNull::new(unsafe { alloc(layout) })
  }

  #[inline]
  unsafe fn dealloc(ptr: NonNull<u8>, layout: Layout) {
    // SAFETY: Caller contract requires `ptr` to originate from `Self::alloc`
    // with the same `layout`.
    unsafe {
      dealloc(ptr.as_ptr(), layout);
    }
  }
}
