//! Configuration types for the Rowtrail engine.

mod capture;
mod tracking;

pub use capture::CaptureConfig;
pub use tracking::TrackingConfig;
