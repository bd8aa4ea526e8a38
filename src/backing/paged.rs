use core::alloc::Layout;
use core::ptr::NonNull;

use crate::alloc::alloc;
use crate::alloc::dealloc;
use crate::backing::BackingAlloc;

/// The page size assumed for page-granular backing requests.
pub const PAGE_SIZE: usize = 4096;

/// Page-granular, zeroed backing storage.
///
/// Models hosts that hand out memory in whole pages: every request is
/// rounded up to a multiple of [`PAGE_SIZE`], aligned to a page boundary,
/// and zero-filled before being returned. Useful when the slot array must
/// be mappable or pinned page-by-page.
#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub struct Paged;

impl Paged {
  /// Rounds `layout` up to whole pages at page alignment.
  ///
  /// Returns [`None`] when the padded size is not representable.
  #[inline]
  fn page_layout(layout: Layout) -> Option<Layout> {
    if layout.align() > PAGE_SIZE {
      return None;
    }

    let size: usize = layout.size().checked_next_multiple_of(PAGE_SIZE)?;

    Layout::from_size_align(size, PAGE_SIZE).ok()
  }
}

// SAFETY: Blocks are page-aligned and at least as large as the requested
// layout; `page_layout` is deterministic, so `dealloc` reconstructs the exact
// layout used at allocation time.
unsafe impl BackingAlloc for Paged {
  #[inline]
  fn alloc(layout: Layout) -> Option<NonNull<u8>> {
    debug_assert!(layout.size() > 0);

    let padded: Layout = Self::page_layout(layout)?;

    // SAFETY: `padded` has non-zero size since `layout` does and the size is
    // only rounded up.
    let raw: *mut u8 = unsafe { alloc(padded) };
    let ptr: NonNull<u8> = NonNull::new(raw)?;

    // SAFETY: The block spans `padded.size()` writable bytes.
    unsafe {
      ptr.write_bytes(0, padded.size());
    }

    Some(ptr)
  }

  #[inline]
  unsafe fn dealloc(ptr: NonNull<u8>, layout: Layout) {
    let Some(padded) = Self::page_layout(layout) else {
      // `alloc` would have rejected this layout, so no block can exist.
      return;
    };

    // SAFETY: Caller contract requires `ptr` to originate from `Self::alloc`
    // with the same `layout`; `page_layout` reproduces the padded layout the
    // block was allocated with.
    unsafe {
      dealloc(ptr.as_ptr(), padded);
    }
  }
}
