use std::fmt;

/// Physical device family a buffer lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Cpu,
    Gpu,
}

/// Memory sub-type. `CudaPinned` marks page-locked host memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemType {
    #[default]
    Default,
    CudaPinned,
}

/// Where a buffer lives: device kind, memory sub-type and device index.
///
/// `device_id` only carries meaning for [`DeviceKind::Gpu`]; host locations
/// conventionally use `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryLocation {
    pub kind: DeviceKind,
    pub mem_type: MemType,
    pub device_id: i16,
}

impl MemoryLocation {
    pub const fn new(kind: DeviceKind, mem_type: MemType, device_id: i16) -> Self {
        Self {
            kind,
            mem_type,
            device_id,
        }
    }

    /// Ordinary pageable host memory.
    pub const fn cpu() -> Self {
        Self::new(DeviceKind::Cpu, MemType::Default, 0)
    }

    /// Page-locked host memory registered with the CUDA runtime.
    pub const fn cuda_pinned() -> Self {
        Self::new(DeviceKind::Cpu, MemType::CudaPinned, 0)
    }

    /// Device memory on accelerator `device_id`.
    pub const fn gpu(device_id: i16) -> Self {
        Self::new(DeviceKind::Gpu, MemType::Default, device_id)
    }

    pub const fn is_device(&self) -> bool {
        matches!(self.kind, DeviceKind::Gpu)
    }

    pub const fn is_host_pinned(&self) -> bool {
        matches!(self.kind, DeviceKind::Cpu) && matches!(self.mem_type, MemType::CudaPinned)
    }

    pub const fn is_host_default(&self) -> bool {
        matches!(self.kind, DeviceKind::Cpu) && matches!(self.mem_type, MemType::Default)
    }
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::cpu()
    }
}

impl fmt::Display for MemoryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.mem_type) {
            (DeviceKind::Cpu, MemType::Default) => write!(f, "Cpu"),
            (DeviceKind::Cpu, MemType::CudaPinned) => write!(f, "CudaPinned"),
            (DeviceKind::Gpu, _) => write!(f, "Gpu:{}", self.device_id),
        }
    }
}
