pub mod capture;
pub mod direct;
mod pump;

pub use capture::CaptureRelay;
pub use direct::DirectRelay;
pub use pump::DEFAULT_BUFFER_SIZE;
