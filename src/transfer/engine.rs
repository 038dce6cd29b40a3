use std::ptr;
use std::sync::Arc;

use super::strategy::{self, CopyStrategy, StreamChoice};
use super::{StreamRole, StreamTable, TransferError};
use crate::config::TransferConfig;
use crate::device::{Endpoint, MemoryLocation, endpoint_name};
use crate::gpu::runtime::{DeviceRuntime, StreamHandle};
use crate::tensor::TensorBuffer;

/// One entry of a batched copy.
pub struct SrcDstPair<'a> {
    pub src: &'a dyn TensorBuffer,
    pub dst: &'a mut dyn TensorBuffer,
    pub role: StreamRole,
}

/// Moves tensor bytes between host, pinned host and device memory.
///
/// Blocking strategies return once the bytes have landed. Async strategies
/// return once the copy is enqueued; callers that need the result must
/// [`synchronize`](Self::synchronize) the stream the copy was issued on.
pub struct GpuDataTransfer<R: DeviceRuntime + ?Sized> {
    runtime: Arc<R>,
    streams: StreamTable,
}

impl<R: DeviceRuntime + ?Sized> GpuDataTransfer<R> {
    pub fn new(runtime: Arc<R>, config: TransferConfig) -> Result<Self, TransferError> {
        let streams = StreamTable::create(&*runtime, &config)?;
        Ok(Self { runtime, streams })
    }

    pub fn stream(&self, role: StreamRole) -> StreamHandle {
        self.streams.get(role)
    }

    /// True when copy-in/copy-out are streams this engine created.
    pub fn owns_copy_streams(&self) -> bool {
        self.streams.owns_copy_streams()
    }

    pub fn can_copy(&self, src: &MemoryLocation, dst: &MemoryLocation) -> bool {
        strategy::can_copy(src, dst)
    }

    pub fn plan_copy(&self, src: &MemoryLocation, dst: &MemoryLocation) -> CopyStrategy {
        strategy::plan_locations(src, dst)
    }

    /// Copy all of `src` into `dst`.
    ///
    /// `role` selects the stream for pinned-memory copies; every other
    /// strategy ignores it. On error the destination contents are
    /// unspecified.
    ///
    /// # Safety
    ///
    /// Async strategies return before the bytes move. When
    /// [`plan_copy`](Self::plan_copy) is not blocking, the storage behind
    /// `src` and `dst` must stay allocated, and must not be written (or, for
    /// `dst`, read) through any other path, until the stream the copy was
    /// issued on has been synchronized. [`copy_tensor_blocking`] has no such
    /// obligation.
    ///
    /// [`copy_tensor_blocking`]: Self::copy_tensor_blocking
    pub unsafe fn copy_tensor(
        &self,
        src: &dyn TensorBuffer,
        dst: &mut dyn TensorBuffer,
        role: StreamRole,
    ) -> Result<(), TransferError> {
        unsafe { self.issue(src, dst, role) }.map(|_| ())
    }

    /// [`copy_tensor`](Self::copy_tensor), then wait for the stream it was
    /// issued on. Both buffers are free to reuse once this returns.
    pub fn copy_tensor_blocking(
        &self,
        src: &dyn TensorBuffer,
        dst: &mut dyn TensorBuffer,
        role: StreamRole,
    ) -> Result<(), TransferError> {
        // SAFETY: the borrows of `src` and `dst` outlive the synchronize
        // below, which retires the copy before either is released.
        let stream = unsafe { self.issue(src, dst, role)? };
        if let Some(stream) = stream {
            self.runtime.stream_synchronize(stream)?;
        }
        Ok(())
    }

    /// [`copy_tensor`](Self::copy_tensor) on the default stream.
    ///
    /// # Safety
    ///
    /// Same contract as [`copy_tensor`](Self::copy_tensor).
    pub unsafe fn copy_tensor_default(
        &self,
        src: &dyn TensorBuffer,
        dst: &mut dyn TensorBuffer,
    ) -> Result<(), TransferError> {
        unsafe { self.copy_tensor(src, dst, StreamRole::Default) }
    }

    /// Copy each pair in order, stopping at the first failure.
    ///
    /// # Safety
    ///
    /// Every pair is bound by the [`copy_tensor`](Self::copy_tensor)
    /// contract, including the pairs issued before a failure.
    pub unsafe fn copy_tensors(&self, pairs: &mut [SrcDstPair<'_>]) -> Result<(), TransferError> {
        for pair in pairs.iter_mut() {
            unsafe { self.copy_tensor(pair.src, &mut *pair.dst, pair.role)? };
        }
        Ok(())
    }

    /// Issue one copy. Returns the stream it was enqueued on, or `None` when
    /// nothing is left in flight.
    unsafe fn issue(
        &self,
        src: &dyn TensorBuffer,
        dst: &mut dyn TensorBuffer,
        role: StreamRole,
    ) -> Result<Option<StreamHandle>, TransferError> {
        let bytes = src.size_in_bytes();
        let dst_bytes = dst.size_in_bytes();
        if bytes != dst_bytes {
            return Err(TransferError::SizeMismatch {
                src: bytes,
                dst: dst_bytes,
            });
        }

        let src_loc = src.location();
        let dst_loc = dst.location();
        let src_ep = Endpoint::classify(&src_loc);
        let dst_ep = Endpoint::classify(&dst_loc);
        let strategy = strategy::plan(src_ep, dst_ep);

        if bytes == 0 {
            tracing::trace!(strategy = strategy.name(), "empty copy skipped");
            return Ok(None);
        }

        let src_data = src.data_raw();
        let dst_data = dst.mutable_data_raw();

        let stream = match strategy.stream_choice() {
            StreamChoice::Requested => Some(self.streams.get(role)),
            StreamChoice::Default => Some(self.streams.get(StreamRole::Default)),
            StreamChoice::Blocking => None,
        };

        tracing::debug!(
            strategy = strategy.name(),
            bytes,
            src = %src_loc,
            dst = %dst_loc,
            src_class = endpoint_name(src_ep),
            dst_class = endpoint_name(dst_ep),
            stream = ?stream,
            "copying tensor"
        );

        // SAFETY: `TensorBuffer` guarantees both pointers address `bytes`
        // bytes in the memory spaces their locations describe, and the
        // strategy's memcpy kind was derived from those same locations.
        // Keeping them alive past an async enqueue is the caller's contract.
        unsafe {
            match (strategy, stream) {
                (CopyStrategy::DeviceToDevice, _) if ptr::eq(src_data, dst_data as *const u8) => {
                    tracing::trace!("device copy onto itself elided");
                    Ok(None)
                }
                (CopyStrategy::HostToHost, _) => {
                    if !ptr::eq(src_data, dst_data as *const u8) {
                        ptr::copy(src_data, dst_data, bytes);
                    }
                    Ok(None)
                }
                (_, Some(stream)) => {
                    self.runtime
                        .memcpy_async(dst_data, src_data, bytes, strategy.memcpy_kind(), stream)?;
                    Ok(Some(stream))
                }
                (_, None) => {
                    self.runtime
                        .memcpy(dst_data, src_data, bytes, strategy.memcpy_kind())?;
                    Ok(None)
                }
            }
        }
    }

    /// Block until work issued on `role`'s stream has completed.
    pub fn synchronize(&self, role: StreamRole) -> Result<(), TransferError> {
        self.runtime.stream_synchronize(self.streams.get(role))?;
        Ok(())
    }

    /// Drain the default stream and, when owned, both copy streams.
    pub fn synchronize_all(&self) -> Result<(), TransferError> {
        for stream in self.streams.distinct_streams() {
            self.runtime.stream_synchronize(stream)?;
        }
        Ok(())
    }
}

impl<R: DeviceRuntime + ?Sized> Drop for GpuDataTransfer<R> {
    fn drop(&mut self) {
        self.streams.release(&*self.runtime);
    }
}
