//! Cross-device tensor copy engine.
//!
//! Both endpoints of a copy are classified as pageable host, pinned host or
//! device memory, and the pair picks one of six strategies:
//!
//! | src     | dst     | strategy             | stream    |
//! |---------|---------|----------------------|-----------|
//! | pinned  | device  | async host-to-device | requested |
//! | device  | device  | async device-to-device, skipped when aliased | default |
//! | host    | device  | blocking host-to-device | none   |
//! | device  | pinned  | async device-to-host | requested |
//! | device  | host    | blocking device-to-host | none   |
//! | host    | host    | host memory copy     | none      |

pub mod engine;
pub mod error;
pub mod stream_table;
pub mod strategy;

pub use engine::{GpuDataTransfer, SrcDstPair};
pub use error::TransferError;
pub use stream_table::StreamRole;
pub(crate) use stream_table::StreamTable;
pub use strategy::{CopyStrategy, StreamChoice, can_copy, plan, plan_locations};
