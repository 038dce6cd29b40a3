//! Memory-location descriptors and the pure predicates the copy dispatcher is
//! built on.

pub mod classify;
pub mod location;

pub use classify::{Endpoint, endpoint_name};
pub use location::{DeviceKind, MemType, MemoryLocation};
