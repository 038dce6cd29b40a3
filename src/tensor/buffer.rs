use crate::device::MemoryLocation;

/// Minimal view of a tensor's storage, as consumed by the copy engine.
///
/// The engine never allocates, frees or resizes storage; it only reads these
/// four properties for the duration of one copy call.
///
/// # Safety
///
/// Implementors guarantee that `data_raw` and `mutable_data_raw` point to at
/// least `size_in_bytes` bytes in the memory space described by `location`
/// (device pointers for GPU locations, host pointers otherwise, page-locked
/// for `CudaPinned`). Pointers may be dangling only when the size is zero.
///
/// Implementing the trait says nothing about lifetime past one call. The
/// unsafe `GpuDataTransfer::copy_tensor` is where callers promise to keep
/// storage alive until an async copy's stream has been synchronized.
pub unsafe trait TensorBuffer {
    fn size_in_bytes(&self) -> usize;

    fn data_raw(&self) -> *const u8;

    fn mutable_data_raw(&mut self) -> *mut u8;

    fn location(&self) -> MemoryLocation;
}
