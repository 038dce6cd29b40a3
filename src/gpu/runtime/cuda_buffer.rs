use std::slice;
use std::sync::Arc;

use super::{CudaRuntime, RuntimeError};
use crate::device::MemoryLocation;
use crate::tensor::TensorBuffer;

/// Device or pinned-host allocation owned through the CUDA runtime.
///
/// The copy engine itself never allocates; this exists for callers and probes
/// that need real device-side storage to hand to it.
pub struct CudaBuffer {
    runtime: Arc<CudaRuntime>,
    ptr: *mut u8,
    len: usize,
    location: MemoryLocation,
}

impl CudaBuffer {
    /// Allocate `len` bytes on the current device.
    pub fn device(runtime: &Arc<CudaRuntime>, len: usize) -> Result<Self, RuntimeError> {
        let device_id = runtime.current_device()?;
        let ptr = runtime.malloc_device(len)?;
        Ok(Self {
            runtime: Arc::clone(runtime),
            ptr,
            len,
            location: MemoryLocation::gpu(device_id),
        })
    }

    /// Allocate `len` bytes of page-locked host memory.
    pub fn pinned(runtime: &Arc<CudaRuntime>, len: usize) -> Result<Self, RuntimeError> {
        let ptr = runtime.malloc_pinned(len)?;
        Ok(Self {
            runtime: Arc::clone(runtime),
            ptr,
            len,
            location: MemoryLocation::cuda_pinned(),
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Host view of a pinned allocation; `None` for device memory.
    pub fn host_bytes(&self) -> Option<&[u8]> {
        if !self.location.is_host_pinned() || self.ptr.is_null() {
            return None;
        }
        Some(unsafe { slice::from_raw_parts(self.ptr, self.len) })
    }

    pub fn host_bytes_mut(&mut self) -> Option<&mut [u8]> {
        if !self.location.is_host_pinned() || self.ptr.is_null() {
            return None;
        }
        Some(unsafe { slice::from_raw_parts_mut(self.ptr, self.len) })
    }
}

unsafe impl TensorBuffer for CudaBuffer {
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

impl Drop for CudaBuffer {
    fn drop(&mut self) {
        if self.ptr.is_null() {
            return;
        }
        let res = unsafe {
            if self.location.is_device() {
                self.runtime.free_device(self.ptr)
            } else {
                self.runtime.free_pinned(self.ptr)
            }
        };
        if let Err(err) = res {
            tracing::warn!(location = %self.location, error = %err, "failed to free CUDA buffer");
        }
    }
}
