// Host-memory stand-in for a CUDA device.
//
// "Device" memory is ordinary host memory, so every copy direction is a plain
// byte copy. What is modelled faithfully is ordering: async copies sit in a
// per-stream queue until that stream is synchronized, and a blocking copy
// first drains the legacy default stream, like cudaMemcpy does.

use std::collections::HashMap;
use std::ptr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::error::{CUDA_ERROR_INVALID_DEVICE, CUDA_ERROR_INVALID_RESOURCE_HANDLE};
use super::{DeviceRuntime, MemcpyKind, RuntimeError, StreamHandle};
use crate::device::MemoryLocation;
use crate::tensor::TensorBuffer;

/// One primitive invocation, as recorded by [`SimulatedRuntime::calls`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCall {
    MemcpyAsync {
        kind: MemcpyKind,
        bytes: usize,
        stream: StreamHandle,
    },
    Memcpy {
        kind: MemcpyKind,
        bytes: usize,
    },
    StreamCreate(StreamHandle),
    StreamDestroy(StreamHandle),
    StreamSynchronize(StreamHandle),
}

#[derive(Debug, Clone, Copy)]
struct PendingCopy {
    dst: usize,
    src: usize,
    bytes: usize,
}

impl PendingCopy {
    unsafe fn run(self) {
        unsafe { ptr::copy(self.src as *const u8, self.dst as *mut u8, self.bytes) }
    }
}

#[derive(Debug, Default)]
struct SimState {
    next_stream: usize,
    live_streams: Vec<StreamHandle>,
    pending: HashMap<StreamHandle, Vec<PendingCopy>>,
    calls: Vec<RuntimeCall>,
    copy_failure: Option<RuntimeError>,
    create_failure: Option<(usize, RuntimeError)>,
    destroy_failure: Option<RuntimeError>,
}

impl SimState {
    fn drain(&mut self, stream: StreamHandle) {
        if let Some(queue) = self.pending.remove(&stream) {
            for copy in queue {
                unsafe { copy.run() };
            }
        }
    }

    fn is_known(&self, stream: StreamHandle) -> bool {
        stream.is_default() || self.live_streams.contains(&stream)
    }
}

/// Simulated device runtime with a call log and failure injection.
#[derive(Debug)]
pub struct SimulatedRuntime {
    device_count: usize,
    state: Mutex<SimState>,
}

impl SimulatedRuntime {
    pub fn new(device_count: usize) -> Self {
        Self {
            device_count,
            state: Mutex::new(SimState {
                next_stream: 1,
                ..SimState::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn device_count(&self) -> usize {
        self.device_count
    }

    /// Zero-filled storage at `location`. GPU locations must name an existing
    /// simulated device.
    pub fn alloc(&self, location: MemoryLocation, len: usize) -> Result<SimulatedBuffer, RuntimeError> {
        if location.is_device()
            && (location.device_id < 0 || location.device_id as usize >= self.device_count)
        {
            return Err(RuntimeError::new(CUDA_ERROR_INVALID_DEVICE, "invalid device ordinal"));
        }
        Ok(SimulatedBuffer {
            data: vec![0u8; len].into_boxed_slice(),
            location,
        })
    }

    pub fn alloc_from(&self, location: MemoryLocation, bytes: &[u8]) -> Result<SimulatedBuffer, RuntimeError> {
        let mut buf = self.alloc(location, bytes.len())?;
        buf.data.copy_from_slice(bytes);
        Ok(buf)
    }

    /// Every primitive invoked so far, in order.
    pub fn calls(&self) -> Vec<RuntimeCall> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Streams created and not yet destroyed.
    pub fn live_streams(&self) -> Vec<StreamHandle> {
        self.state().live_streams.clone()
    }

    /// Async copies enqueued on `stream` and not yet executed.
    pub fn pending_copies(&self, stream: StreamHandle) -> usize {
        self.state().pending.get(&stream).map_or(0, Vec::len)
    }

    /// Make the next `memcpy`/`memcpy_async` fail with `error`.
    pub fn fail_next_copy(&self, error: RuntimeError) {
        self.state().copy_failure = Some(error);
    }

    /// Let `skip` stream creations succeed, then fail the next one.
    pub fn fail_stream_create(&self, skip: usize, error: RuntimeError) {
        self.state().create_failure = Some((skip, error));
    }

    /// Make the next stream destruction fail. The stream stays alive.
    pub fn fail_next_stream_destroy(&self, error: RuntimeError) {
        self.state().destroy_failure = Some(error);
    }

    /// Run every queued copy on every stream.
    pub fn synchronize_device(&self) {
        let mut state = self.state();
        let streams: Vec<StreamHandle> = state.pending.keys().copied().collect();
        for stream in streams {
            state.drain(stream);
        }
    }
}

impl Default for SimulatedRuntime {
    fn default() -> Self {
        Self::new(1)
    }
}

impl DeviceRuntime for SimulatedRuntime {
    unsafe fn memcpy_async(
        &self,
        dst: *mut u8,
        src: *const u8,
        bytes: usize,
        kind: MemcpyKind,
        stream: StreamHandle,
    ) -> Result<(), RuntimeError> {
        let mut state = self.state();
        state.calls.push(RuntimeCall::MemcpyAsync { kind, bytes, stream });

        if let Some(err) = state.copy_failure.take() {
            return Err(err);
        }
        if !state.is_known(stream) {
            return Err(RuntimeError::new(
                CUDA_ERROR_INVALID_RESOURCE_HANDLE,
                "invalid resource handle",
            ));
        }

        state.pending.entry(stream).or_default().push(PendingCopy {
            dst: dst as usize,
            src: src as usize,
            bytes,
        });
        Ok(())
    }

    unsafe fn memcpy(
        &self,
        dst: *mut u8,
        src: *const u8,
        bytes: usize,
        kind: MemcpyKind,
    ) -> Result<(), RuntimeError> {
        let mut state = self.state();
        state.calls.push(RuntimeCall::Memcpy { kind, bytes });

        if let Some(err) = state.copy_failure.take() {
            return Err(err);
        }

        state.drain(StreamHandle::DEFAULT);
        unsafe { ptr::copy(src, dst, bytes) };
        Ok(())
    }

    fn stream_create_non_blocking(&self) -> Result<StreamHandle, RuntimeError> {
        let mut state = self.state();

        if let Some((skip, err)) = state.create_failure.take() {
            if skip == 0 {
                return Err(err);
            }
            state.create_failure = Some((skip - 1, err));
        }

        let stream = StreamHandle::from_id(state.next_stream);
        state.next_stream += 1;
        state.live_streams.push(stream);
        state.calls.push(RuntimeCall::StreamCreate(stream));
        Ok(stream)
    }

    fn stream_destroy(&self, stream: StreamHandle) -> Result<(), RuntimeError> {
        let mut state = self.state();
        state.calls.push(RuntimeCall::StreamDestroy(stream));

        if let Some(err) = state.destroy_failure.take() {
            return Err(err);
        }
        let Some(pos) = state.live_streams.iter().position(|s| *s == stream) else {
            return Err(RuntimeError::new(
                CUDA_ERROR_INVALID_RESOURCE_HANDLE,
                "invalid resource handle",
            ));
        };

        // Work already enqueued still completes.
        state.drain(stream);
        state.live_streams.remove(pos);
        Ok(())
    }

    fn stream_synchronize(&self, stream: StreamHandle) -> Result<(), RuntimeError> {
        let mut state = self.state();
        state.calls.push(RuntimeCall::StreamSynchronize(stream));

        if !state.is_known(stream) {
            return Err(RuntimeError::new(
                CUDA_ERROR_INVALID_RESOURCE_HANDLE,
                "invalid resource handle",
            ));
        }
        state.drain(stream);
        Ok(())
    }
}

/// Owned storage tagged with a simulated memory location.
#[derive(Debug, Clone)]
pub struct SimulatedBuffer {
    data: Box<[u8]>,
    location: MemoryLocation,
}

impl SimulatedBuffer {
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// Sound because the simulated runtime treats every location as host memory.
unsafe impl TensorBuffer for SimulatedBuffer {
    fn size_in_bytes(&self) -> usize {
        self.data.len()
    }

    fn data_raw(&self) -> *const u8 {
        self.data.as_ptr()
    }

    fn mutable_data_raw(&mut self) -> *mut u8 {
        self.data.as_mut_ptr()
    }

    fn location(&self) -> MemoryLocation {
        self.location
    }
}
