use gpu_transfer::device::MemoryLocation;
use gpu_transfer::tensor::{RawBuffer, TensorBuffer};

#[test]
fn host_view_reports_pageable_location() {
    let mut bytes = vec![1u8, 2, 3];
    let ptr = bytes.as_ptr();
    let mut view = RawBuffer::host(&mut bytes);

    assert_eq!(view.size_in_bytes(), 3);
    assert_eq!(view.len(), 3);
    assert!(!view.is_empty());
    assert_eq!(view.location(), MemoryLocation::cpu());
    assert_eq!(view.data_raw(), ptr);
    assert_eq!(view.mutable_data_raw() as *const u8, ptr);
}

#[test]
fn raw_parts_keep_the_given_location() {
    let mut bytes = [0u8; 8];
    let view = unsafe { RawBuffer::from_raw_parts(bytes.as_mut_ptr(), 8, MemoryLocation::gpu(2)) };

    assert_eq!(view.location(), MemoryLocation::gpu(2));
    assert!(view.location().is_device());
}

#[test]
fn empty_view() {
    let mut bytes: Vec<u8> = Vec::new();
    let view = RawBuffer::host(&mut bytes);
    assert!(view.is_empty());
    assert_eq!(view.size_in_bytes(), 0);
}
