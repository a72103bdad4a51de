// Edge capture, blob extraction, and sample consensus for rfpulse.

pub mod buffer;
pub mod capture;
pub mod consensus;
pub mod extract;

pub use buffer::CaptureBuffer;
pub use capture::{CaptureEvent, EdgeCapture};
pub use consensus::{SampleCollector, Verdict};
pub use extract::extract;
