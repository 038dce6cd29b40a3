use gpu_transfer::device::{DeviceKind, Endpoint, MemType, MemoryLocation, endpoint_name};

fn all_locations() -> Vec<MemoryLocation> {
    vec![
        MemoryLocation::cpu(),
        MemoryLocation::cuda_pinned(),
        MemoryLocation::gpu(0),
        MemoryLocation::gpu(3),
        // A GPU location tagged pinned is still device memory.
        MemoryLocation::new(DeviceKind::Gpu, MemType::CudaPinned, 1),
    ]
}

#[test]
fn predicates_are_mutually_exclusive_and_exhaustive() {
    for loc in all_locations() {
        let hits = [loc.is_device(), loc.is_host_default(), loc.is_host_pinned()]
            .iter()
            .filter(|b| **b)
            .count();
        assert_eq!(hits, 1, "location {loc} matched {hits} predicates");
    }
}

#[test]
fn classify_matches_predicates() {
    assert_eq!(Endpoint::classify(&MemoryLocation::cpu()), Endpoint::HostDefault);
    assert_eq!(Endpoint::classify(&MemoryLocation::cuda_pinned()), Endpoint::HostPinned);
    assert_eq!(Endpoint::classify(&MemoryLocation::gpu(0)), Endpoint::Device);
    assert_eq!(
        Endpoint::classify(&MemoryLocation::new(DeviceKind::Gpu, MemType::CudaPinned, 2)),
        Endpoint::Device
    );
}

#[test]
fn only_pinned_and_device_touch_the_device() {
    assert!(!Endpoint::HostDefault.touches_device());
    assert!(Endpoint::HostPinned.touches_device());
    assert!(Endpoint::Device.touches_device());
}

#[test]
fn display_and_names() {
    assert_eq!(MemoryLocation::cpu().to_string(), "Cpu");
    assert_eq!(MemoryLocation::cuda_pinned().to_string(), "CudaPinned");
    assert_eq!(MemoryLocation::gpu(7).to_string(), "Gpu:7");

    assert_eq!(endpoint_name(Endpoint::HostDefault), "host");
    assert_eq!(endpoint_name(Endpoint::HostPinned), "pinned");
    assert_eq!(endpoint_name(Endpoint::Device), "device");
}

#[test]
fn default_location_is_pageable_host() {
    assert_eq!(MemoryLocation::default(), MemoryLocation::cpu());
    assert_eq!(Endpoint::from(&MemoryLocation::default()), Endpoint::HostDefault);
}
