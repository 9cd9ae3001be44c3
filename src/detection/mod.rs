//! Host detection.
//!
//! - [`distribution`] - Distribution id/release and forked-distro reconciliation
//! - [`deprecation`] - End-of-life release table
//! - [`platform`] - `uname` facts (architecture, WSL, macOS)

pub mod deprecation;
pub mod distribution;
pub mod platform;

pub use deprecation::{deprecation_notice, is_deprecated};
pub use distribution::{
    map_debian_numeric, Distribution, DistributionDetector, DistributionReport, DistroFamily,
};
pub use platform::Platform;
