//! Device classification.
//!
//! Maps a host/device identity string to the coarse category used to select
//! a threshold profile.

/// Coarse device classification used to select a threshold profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceCategory {
    Mobile,
    Desktop,
    Unknown,
}

/// Map a host/device identity string to its category.
///
/// Lookup is case-insensitive and exact; unmatched strings classify as
/// `Unknown` rather than failing.
pub fn classify(device: &str) -> DeviceCategory {
    match device.to_lowercase().as_str() {
        // Mobile devices the agent has been validated on
        "google sdk_gphone64_x86_64" => DeviceCategory::Mobile,
        // Operating systems the agent has been validated on
        "windows" | "mac" | "x86_64-conda-linux-gnu" | "linux" => DeviceCategory::Desktop,
        _ => DeviceCategory::Unknown,
    }
}
