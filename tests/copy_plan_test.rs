use gpu_transfer::device::{Endpoint, MemoryLocation};
use gpu_transfer::gpu::runtime::MemcpyKind;
use gpu_transfer::transfer::{CopyStrategy, StreamChoice, can_copy, plan, plan_locations};

const ENDPOINTS: [Endpoint; 3] = [Endpoint::HostDefault, Endpoint::HostPinned, Endpoint::Device];

fn location_of(endpoint: Endpoint) -> MemoryLocation {
    match endpoint {
        Endpoint::HostDefault => MemoryLocation::cpu(),
        Endpoint::HostPinned => MemoryLocation::cuda_pinned(),
        Endpoint::Device => MemoryLocation::gpu(0),
    }
}

#[test]
fn dispatch_table_covers_every_pair() {
    use CopyStrategy::*;
    use Endpoint::*;

    let expected = [
        (HostPinned, Device, PinnedToDevice),
        (Device, Device, DeviceToDevice),
        (HostDefault, Device, HostToDevice),
        (Device, HostPinned, DeviceToPinned),
        (Device, HostDefault, DeviceToHost),
        (HostDefault, HostDefault, HostToHost),
        (HostDefault, HostPinned, HostToHost),
        (HostPinned, HostDefault, HostToHost),
        (HostPinned, HostPinned, HostToHost),
    ];

    assert_eq!(expected.len(), ENDPOINTS.len() * ENDPOINTS.len());
    for (src, dst, strategy) in expected {
        assert_eq!(plan(src, dst), strategy, "{src:?} -> {dst:?}");
        assert_eq!(plan_locations(&location_of(src), &location_of(dst)), strategy);
    }
}

#[test]
fn can_copy_iff_one_side_is_device_or_pinned() {
    for src in ENDPOINTS {
        for dst in ENDPOINTS {
            let expected = src.touches_device() || dst.touches_device();
            assert_eq!(
                can_copy(&location_of(src), &location_of(dst)),
                expected,
                "{src:?} -> {dst:?}"
            );
        }
    }

    assert!(!can_copy(&MemoryLocation::cpu(), &MemoryLocation::cpu()));
}

#[test]
fn only_pinned_strategies_use_the_requested_stream() {
    assert_eq!(CopyStrategy::PinnedToDevice.stream_choice(), StreamChoice::Requested);
    assert_eq!(CopyStrategy::DeviceToPinned.stream_choice(), StreamChoice::Requested);
    assert_eq!(CopyStrategy::DeviceToDevice.stream_choice(), StreamChoice::Default);

    for blocking in [CopyStrategy::HostToDevice, CopyStrategy::DeviceToHost, CopyStrategy::HostToHost] {
        assert!(blocking.is_blocking(), "{} should block", blocking.name());
    }
    assert!(!CopyStrategy::PinnedToDevice.is_blocking());
    assert!(!CopyStrategy::DeviceToDevice.is_blocking());
}

#[test]
fn memcpy_kinds_follow_direction() {
    assert_eq!(CopyStrategy::PinnedToDevice.memcpy_kind(), MemcpyKind::HostToDevice);
    assert_eq!(CopyStrategy::HostToDevice.memcpy_kind(), MemcpyKind::HostToDevice);
    assert_eq!(CopyStrategy::DeviceToPinned.memcpy_kind(), MemcpyKind::DeviceToHost);
    assert_eq!(CopyStrategy::DeviceToHost.memcpy_kind(), MemcpyKind::DeviceToHost);
    assert_eq!(CopyStrategy::DeviceToDevice.memcpy_kind(), MemcpyKind::DeviceToDevice);
    assert_eq!(CopyStrategy::HostToHost.memcpy_kind(), MemcpyKind::HostToHost);
    assert_eq!(MemcpyKind::DeviceToDevice as i32, 3);
}
