use crate::device::{Endpoint, MemoryLocation};
use crate::gpu::runtime::MemcpyKind;

/// The six ways a buffer can be moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyStrategy {
    /// Async host-to-device from page-locked memory, on the requested stream.
    PinnedToDevice,
    /// Async device-to-device on the default stream; elided for aliased
    /// pointers.
    DeviceToDevice,
    /// Blocking host-to-device from pageable memory.
    HostToDevice,
    /// Async device-to-host into page-locked memory, on the requested stream.
    DeviceToPinned,
    /// Blocking device-to-host into pageable memory.
    DeviceToHost,
    /// Plain host memory copy.
    HostToHost,
}

/// Where a strategy's work is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamChoice {
    /// The stream selected by the caller.
    Requested,
    /// Always the default stream.
    Default,
    /// No stream: the copy blocks the caller.
    Blocking,
}

impl CopyStrategy {
    pub const fn stream_choice(self) -> StreamChoice {
        match self {
            CopyStrategy::PinnedToDevice | CopyStrategy::DeviceToPinned => StreamChoice::Requested,
            CopyStrategy::DeviceToDevice => StreamChoice::Default,
            CopyStrategy::HostToDevice | CopyStrategy::DeviceToHost | CopyStrategy::HostToHost => {
                StreamChoice::Blocking
            }
        }
    }

    pub const fn is_blocking(self) -> bool {
        matches!(self.stream_choice(), StreamChoice::Blocking)
    }

    pub const fn memcpy_kind(self) -> MemcpyKind {
        match self {
            CopyStrategy::PinnedToDevice | CopyStrategy::HostToDevice => MemcpyKind::HostToDevice,
            CopyStrategy::DeviceToDevice => MemcpyKind::DeviceToDevice,
            CopyStrategy::DeviceToPinned | CopyStrategy::DeviceToHost => MemcpyKind::DeviceToHost,
            CopyStrategy::HostToHost => MemcpyKind::HostToHost,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            CopyStrategy::PinnedToDevice => "pinned_to_device",
            CopyStrategy::DeviceToDevice => "device_to_device",
            CopyStrategy::HostToDevice => "host_to_device",
            CopyStrategy::DeviceToPinned => "device_to_pinned",
            CopyStrategy::DeviceToHost => "device_to_host",
            CopyStrategy::HostToHost => "host_to_host",
        }
    }
}

/// Pick the copy strategy for a classified (source, destination) pair.
pub const fn plan(src: Endpoint, dst: Endpoint) -> CopyStrategy {
    use Endpoint::{Device, HostDefault, HostPinned};

    match (src, dst) {
        (HostPinned, Device) => CopyStrategy::PinnedToDevice,
        (Device, Device) => CopyStrategy::DeviceToDevice,
        (HostDefault, Device) => CopyStrategy::HostToDevice,
        (Device, HostPinned) => CopyStrategy::DeviceToPinned,
        (Device, HostDefault) => CopyStrategy::DeviceToHost,
        (HostDefault | HostPinned, HostDefault | HostPinned) => CopyStrategy::HostToHost,
    }
}

pub const fn plan_locations(src: &MemoryLocation, dst: &MemoryLocation) -> CopyStrategy {
    plan(Endpoint::classify(src), Endpoint::classify(dst))
}

/// Whether the copy engine is responsible for this pair: at least one side
/// is device or pinned memory. Pageable-to-pageable is not, although
/// `copy_tensor` still performs it.
pub const fn can_copy(src: &MemoryLocation, dst: &MemoryLocation) -> bool {
    src.is_device() || src.is_host_pinned() || dst.is_device() || dst.is_host_pinned()
}
