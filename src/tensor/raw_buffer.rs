use std::marker::PhantomData;

use super::TensorBuffer;
use crate::device::MemoryLocation;

/// Borrowed pointer view over memory owned elsewhere.
///
/// This is how callers hand foreign storage (a tensor container, a pinned
/// staging area, a raw device allocation) to the copy engine without giving
/// up ownership.
#[derive(Debug)]
pub struct RawBuffer<'a> {
    ptr: *mut u8,
    len: usize,
    location: MemoryLocation,
    _borrow: PhantomData<&'a mut [u8]>,
}

impl<'a> RawBuffer<'a> {
    /// Pageable host memory. Always sound: the slice is host memory.
    pub fn host(bytes: &'a mut [u8]) -> Self {
        Self {
            ptr: bytes.as_mut_ptr(),
            len: bytes.len(),
            location: MemoryLocation::cpu(),
            _borrow: PhantomData,
        }
    }

    /// # Safety
    ///
    /// `ptr` must address `len` bytes of memory of the kind `location`
    /// describes, valid for reads and writes for `'a`.
    pub unsafe fn from_raw_parts(ptr: *mut u8, len: usize, location: MemoryLocation) -> Self {
        Self {
            ptr,
            len,
            location,
            _borrow: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

unsafe impl TensorBuffer for RawBuffer<'_> {
    fn size_in_bytes(&self) -> usize {
        self.len
    }

    fn data_raw(&self) -> *const u8 {
        self.ptr
    }

    fn mutable_data_raw(&mut self) -> *mut u8 {
        self.ptr
    }

    fn location(&self) -> MemoryLocation {
        self.location
    }
}
