use super::MemoryLocation;

/// Memory class of one side of a copy, as seen by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    HostDefault,
    HostPinned,
    Device,
}

impl Endpoint {
    /// Device memory wins over the sub-type: a GPU location is always `Device`.
    pub const fn classify(location: &MemoryLocation) -> Self {
        if location.is_device() {
            Endpoint::Device
        } else if location.is_host_pinned() {
            Endpoint::HostPinned
        } else {
            Endpoint::HostDefault
        }
    }

    /// True for the two classes the CUDA runtime participates in.
    pub const fn touches_device(self) -> bool {
        matches!(self, Endpoint::Device | Endpoint::HostPinned)
    }
}

impl From<&MemoryLocation> for Endpoint {
    fn from(location: &MemoryLocation) -> Self {
        Endpoint::classify(location)
    }
}

pub fn endpoint_name(endpoint: Endpoint) -> &'static str {
    match endpoint {
        Endpoint::HostDefault => "host",
        Endpoint::HostPinned => "pinned",
        Endpoint::Device => "device",
    }
}
