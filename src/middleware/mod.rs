pub mod tracking;

pub use tracking::RequestTracking;
